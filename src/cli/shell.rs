//! Line-oriented front end: a rustyline editor for people, stdin for scripts.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::debug;

use crate::cli::commands::CommandRegistry;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

/// Set to any value to read commands from stdin without prompts or colors.
pub const SCRIPT_ENV: &str = "DOJO_ADMIN_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };
    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Script => run_script(&mut context),
        CliMode::Interactive => run_interactive(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CompletionHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CompletionHelper::from_registry(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    match &context.config.studio_name {
        Some(studio) => cli_io::print_info(format!("Welcome back to {studio}.")),
        None => cli_io::print_info("Dojo Admin shell."),
    }
    cli_io::print_hint("Type `help` to list commands; `?` completes the current word.");

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.trim());
        if let LoopControl::Exit = run_line(context, &line)? {
            break;
        }
    }
    cli_io::print_info("Goodbye.");
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        debug!(line = index + 1, command = line.trim(), "script line");
        if let LoopControl::Exit = run_line(context, &line)? {
            break;
        }
    }
    Ok(())
}

/// Runs one line and reports command errors; only shell-level failures escape.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    if line.trim_start().starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(format!("Could not parse command: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// First-word completion over command names and aliases; second-word
/// completion over the subcommands listed in each command's usage line.
struct CompletionHelper {
    subcommands: BTreeMap<String, Vec<String>>,
}

impl CompletionHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut primary: Vec<String> = registry.names().map(str::to_string).collect();
        primary.sort();
        let mut subcommands = BTreeMap::new();
        for definition in registry.iter() {
            let words = if definition.name == "help" {
                primary.clone()
            } else {
                subcommands_from_usage(definition.usage)
            };
            subcommands.insert(definition.name.to_string(), words.clone());
            for alias in definition.aliases {
                subcommands.insert(alias.to_string(), words.clone());
            }
        }
        Self { subcommands }
    }

    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        let start = line.rfind(char::is_whitespace).map_or(0, |index| index + 1);
        let needle = line[start..].to_ascii_lowercase();
        let previous: Vec<&str> = line[..start].split_whitespace().collect();
        let words: Vec<String> = match previous.as_slice() {
            [] => self.subcommands.keys().cloned().collect(),
            [command] => self
                .subcommands
                .get(&command.to_ascii_lowercase())
                .cloned()
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let matches = words
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .collect();
        (start, matches)
    }
}

/// Subcommand keywords from the first bracketed group of a usage line, e.g.
/// `classes [list|add|edit <id>]` gives `list`, `add` and `edit`. Nested
/// `<a|b>` placeholders are not split.
fn subcommands_from_usage(usage: &str) -> Vec<String> {
    let Some(open) = usage.find(['[', '<']) else {
        return Vec::new();
    };
    let mut depth = 0usize;
    let mut alternatives = vec![String::new()];
    for ch in usage[open..].chars() {
        match ch {
            '[' | '<' => {
                depth += 1;
                if depth == 1 {
                    continue;
                }
            }
            ']' | '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            '|' if depth == 1 => {
                alternatives.push(String::new());
                continue;
            }
            _ => {}
        }
        if let Some(current) = alternatives.last_mut() {
            current.push(ch);
        }
    }
    if alternatives.len() < 2 {
        return Vec::new();
    }
    alternatives
        .iter()
        .filter_map(|alternative| alternative.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

impl Helper for CompletionHelper {}

impl Completer for CompletionHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CompletionHelper {
    type Hint = String;
}

impl Highlighter for CompletionHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CompletionHelper {}
