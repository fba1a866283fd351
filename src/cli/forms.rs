//! Step-by-step driver that runs a wizard [`Sequencer`] through a prompt
//! surface.
//!
//! Each step is filled by its form (see [`crate::cli::steps`]), gated by the
//! sequencer's validity rules, and the last data-entry step commits through a
//! [`CatalogClient`]. Prompts go through [`StepInteraction`], so the same loop
//! drives dialoguer in the shell and scripted answers in tests.

use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::cli::output;
use crate::domain::lookup::ReferenceTables;
use crate::wizard::{
    CatalogClient, CommitContext, Committable, Created, Sequencer, TouchedFields,
};

/// Typed in place of a value to revisit the previous step.
pub const BACK_TOKEN: &str = ":back";
/// Typed in place of a value to abandon the wizard.
pub const CANCEL_TOKEN: &str = ":cancel";

#[derive(Debug, Clone, PartialEq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Answer to a single prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse<T> {
    Value(T),
    /// Keep the current value.
    Keep,
    Back,
    Cancel,
}

/// What the user is being asked, and where in the wizard they are.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub step_title: &'a str,
    pub label: &'a str,
    pub current: Option<String>,
    pub index: usize,
    pub total: usize,
}

/// Prompt surface the wizard driver talks to.
pub trait StepInteraction {
    fn text(&mut self, context: &PromptContext<'_>) -> PromptResponse<String>;

    /// Index of the chosen option.
    fn choose(&mut self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse<usize>;

    /// Indices of every chosen option; `selected` marks the current picks.
    fn choose_many(
        &mut self,
        context: &PromptContext<'_>,
        options: &[String],
        selected: &[bool],
    ) -> PromptResponse<Vec<usize>>;

    fn confirm(&mut self, context: &PromptContext<'_>, default: bool) -> PromptResponse<bool>;

    /// Informational lines such as field issues.
    fn show(&mut self, lines: &[String]);

    fn step_header(&mut self, title: &str) {
        self.show(&[title.to_string()]);
    }

    fn error_banner(&mut self, message: &str) {
        self.show(&[format!("ERROR: {message}")]);
    }
}

/// Why a form stopped before filling its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Back,
    Cancel,
}

pub type Flow<T> = Result<T, Interrupt>;

/// Read-only collaborators the step forms need.
pub struct FormEnv<'a> {
    pub references: &'a ReferenceTables,
    pub currency_symbol: &'a str,
    pub default_color: Option<&'a str>,
}

impl<'a> FormEnv<'a> {
    pub fn commit_context(&self) -> CommitContext<'a> {
        CommitContext {
            references: self.references,
            currency_symbol: self.currency_symbol,
        }
    }
}

/// Flows that know how to prompt for each of their steps.
pub trait StepForms: Committable {
    fn fill(
        wizard: &mut Sequencer<Self>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        touched: &mut TouchedFields,
    ) -> Flow<()>;
}

/// Prompt helper bound to one step: carries the step header into every
/// prompt and turns back/cancel answers into [`Interrupt`]s.
pub struct FieldPrompter<'a> {
    io: &'a mut dyn StepInteraction,
    step_title: &'static str,
    index: usize,
    total: usize,
}

impl<'a> FieldPrompter<'a> {
    pub fn new(
        io: &'a mut dyn StepInteraction,
        step_title: &'static str,
        index: usize,
        total: usize,
    ) -> Self {
        Self {
            io,
            step_title,
            index,
            total,
        }
    }

    fn context<'c>(&self, label: &'c str, current: Option<String>) -> PromptContext<'c> {
        PromptContext {
            step_title: self.step_title,
            label,
            current,
            index: self.index,
            total: self.total,
        }
    }

    pub fn show(&mut self, lines: &[String]) {
        self.io.show(lines);
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.io.show(&[message.into()]);
    }

    /// Free text; keeping returns `current`.
    pub fn text(&mut self, label: &str, current: &str) -> Flow<String> {
        let current_value = (!current.is_empty()).then(|| current.to_string());
        let context = self.context(label, current_value);
        match self.io.text(&context) {
            PromptResponse::Value(value) => Ok(value.trim().to_string()),
            PromptResponse::Keep => Ok(current.to_string()),
            PromptResponse::Back => Err(Interrupt::Back),
            PromptResponse::Cancel => Err(Interrupt::Cancel),
        }
    }

    /// Optional parsed value. A blank answer clears it; unparseable input is
    /// reported and asked again.
    pub fn parsed<T, P>(
        &mut self,
        label: &str,
        current: Option<T>,
        render: fn(&T) -> String,
        parse: P,
    ) -> Flow<Option<T>>
    where
        P: Fn(&str) -> Result<T, String>,
    {
        loop {
            let context = self.context(label, current.as_ref().map(render));
            match self.io.text(&context) {
                PromptResponse::Value(value) if value.trim().is_empty() => return Ok(None),
                PromptResponse::Value(value) => match parse(value.trim()) {
                    Ok(parsed) => return Ok(Some(parsed)),
                    Err(message) => self.notice(message),
                },
                PromptResponse::Keep => return Ok(current),
                PromptResponse::Back => return Err(Interrupt::Back),
                PromptResponse::Cancel => return Err(Interrupt::Cancel),
            }
        }
    }

    pub fn choose(&mut self, label: &str, options: &[String], current: Option<usize>) -> Flow<usize> {
        loop {
            let context = self.context(label, current.and_then(|index| options.get(index).cloned()));
            match self.io.choose(&context, options) {
                PromptResponse::Value(index) if index < options.len() => return Ok(index),
                PromptResponse::Value(_) | PromptResponse::Keep => match current {
                    Some(index) => return Ok(index),
                    None => self.notice("Choose one of the options."),
                },
                PromptResponse::Back => return Err(Interrupt::Back),
                PromptResponse::Cancel => return Err(Interrupt::Cancel),
            }
        }
    }

    pub fn choose_many(&mut self, label: &str, options: &[String], selected: &[bool]) -> Flow<Vec<usize>> {
        let context = self.context(label, None);
        match self.io.choose_many(&context, options, selected) {
            PromptResponse::Value(indices) => Ok(indices
                .into_iter()
                .filter(|index| *index < options.len())
                .collect()),
            PromptResponse::Keep => Ok(selected
                .iter()
                .enumerate()
                .filter_map(|(index, picked)| picked.then_some(index))
                .collect()),
            PromptResponse::Back => Err(Interrupt::Back),
            PromptResponse::Cancel => Err(Interrupt::Cancel),
        }
    }

    pub fn yes_no(&mut self, label: &str, current: bool) -> Flow<bool> {
        let context = self.context(label, Some(if current { "yes" } else { "no" }.to_string()));
        match self.io.confirm(&context, current) {
            PromptResponse::Value(value) => Ok(value),
            PromptResponse::Keep => Ok(current),
            PromptResponse::Back => Err(Interrupt::Back),
            PromptResponse::Cancel => Err(Interrupt::Cancel),
        }
    }
}

/// Runs `wizard` to completion or cancellation.
///
/// A step that fails its gate stays current: every failing field is marked
/// touched and its message shown. On the last data-entry step the user is
/// asked to save; a failed save shows the error banner and the step is
/// offered again.
pub fn run_wizard<S, C>(
    wizard: &mut Sequencer<S>,
    io: &mut dyn StepInteraction,
    client: &mut C,
    env: &FormEnv<'_>,
) -> FormResult<Created<S::Record>>
where
    S: StepForms,
    C: CatalogClient + ?Sized,
{
    let mut touched = TouchedFields::new();
    loop {
        let step = wizard.step();
        let path = wizard.path();
        let index = wizard.path_position().unwrap_or(0);
        // The success step is not a data-entry step.
        let total = path.iter().filter(|candidate| **candidate != S::SUCCESS).count().max(1);
        io.step_header(&format!("Step {} / {}: {}", index + 1, total, step.title()));
        if let Some(error) = wizard.error() {
            io.error_banner(error);
        }

        let filled = {
            let mut prompter = FieldPrompter::new(io, step.title(), index, total);
            S::fill(wizard, &mut prompter, env, &mut touched)
        };
        match filled {
            Ok(()) => {}
            Err(Interrupt::Back) => {
                if index == 0 {
                    if confirm_cancel(io) {
                        wizard.cancel();
                        return FormResult::Cancelled;
                    }
                } else {
                    wizard.previous_step();
                }
                continue;
            }
            Err(Interrupt::Cancel) => {
                if wizard.cancel() {
                    return FormResult::Cancelled;
                }
                continue;
            }
        }

        let issues = wizard.current_issues();
        if !issues.is_empty() {
            touched.touch_all(&issues);
            let lines: Vec<String> = touched
                .visible_issues(&issues)
                .map(|issue| format!("- {issue}"))
                .collect();
            io.show(&lines);
            continue;
        }

        if !wizard.is_final_entry_step() {
            wizard.next_step();
            continue;
        }

        let save_context = PromptContext {
            step_title: step.title(),
            label: "Save now?",
            current: None,
            index,
            total,
        };
        match io.confirm(&save_context, true) {
            PromptResponse::Value(true) | PromptResponse::Keep => {}
            PromptResponse::Value(false) | PromptResponse::Back => continue,
            PromptResponse::Cancel => {
                if wizard.cancel() {
                    return FormResult::Cancelled;
                }
                continue;
            }
        }

        let commit = env.commit_context();
        match wizard.handle_final_step(client, &commit, None) {
            Ok(created) => return FormResult::Completed(created),
            Err(err) => {
                tracing::debug!(error = %err, "wizard save failed; offering the step again");
            }
        }
    }
}

fn confirm_cancel(io: &mut dyn StepInteraction) -> bool {
    let context = PromptContext {
        step_title: "Cancel",
        label: "Discard this draft?",
        current: None,
        index: 0,
        total: 1,
    };
    matches!(
        io.confirm(&context, false),
        PromptResponse::Value(true) | PromptResponse::Cancel
    )
}

/// Prompts on the terminal with dialoguer. Text prompts accept
/// [`BACK_TOKEN`] and [`CANCEL_TOKEN`]; select prompts list "Back" last.
pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl StepInteraction for DialoguerInteraction {
    fn text(&mut self, context: &PromptContext<'_>) -> PromptResponse<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(context.label)
            .allow_empty(true);
        if let Some(current) = &context.current {
            input = input.default(current.clone()).show_default(true);
        }
        match input.interact_text() {
            Ok(value) => {
                let trimmed = value.trim();
                if trimmed.eq_ignore_ascii_case(BACK_TOKEN) {
                    PromptResponse::Back
                } else if trimmed.eq_ignore_ascii_case(CANCEL_TOKEN) {
                    PromptResponse::Cancel
                } else if context.current.as_deref() == Some(trimmed) {
                    PromptResponse::Keep
                } else {
                    PromptResponse::Value(trimmed.to_string())
                }
            }
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn choose(&mut self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse<usize> {
        let mut items = options.to_vec();
        items.push("← Back".into());
        let default = context
            .current
            .as_ref()
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);
        match Select::with_theme(&self.theme)
            .with_prompt(context.label)
            .items(&items)
            .default(default)
            .interact_opt()
        {
            Ok(Some(index)) if index == options.len() => PromptResponse::Back,
            Ok(Some(index)) => PromptResponse::Value(index),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn choose_many(
        &mut self,
        context: &PromptContext<'_>,
        options: &[String],
        selected: &[bool],
    ) -> PromptResponse<Vec<usize>> {
        match MultiSelect::with_theme(&self.theme)
            .with_prompt(format!("{} (space toggles, enter confirms)", context.label))
            .items(options)
            .defaults(selected)
            .interact_opt()
        {
            Ok(Some(indices)) => PromptResponse::Value(indices),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn confirm(&mut self, context: &PromptContext<'_>, default: bool) -> PromptResponse<bool> {
        match Confirm::with_theme(&self.theme)
            .with_prompt(context.label)
            .default(default)
            .interact_opt()
        {
            Ok(Some(value)) => PromptResponse::Value(value),
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }

    fn show(&mut self, lines: &[String]) {
        for line in lines {
            output::info(line);
        }
    }

    fn step_header(&mut self, title: &str) {
        output::section(title);
    }

    fn error_banner(&mut self, message: &str) {
        output::error(message);
    }
}
