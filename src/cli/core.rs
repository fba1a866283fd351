//! Shell context, dispatch, and the error types shared by CLI commands.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    catalog::CatalogFilter,
    config::{Config, ConfigManager},
    domain::{catalog::CatalogItem, transaction::FinanceTransaction},
    errors::DojoError,
    finances::FinancesTable,
    storage::{JsonStore, ListCache, Stored},
    wizard::{ClientError, CommitError, ItemRecord, MembershipRecord},
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;
use super::output::{self, OutputPreferences};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] DojoError),
    #[error("input error: {0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("`{0}` is only available in interactive mode")]
    InteractiveOnly(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] DojoError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: JsonStore,
    pub config: Config,
    pub transactions: ListCache<FinanceTransaction>,
    pub finances: FinancesTable,
    pub catalog: ListCache<CatalogItem>,
    pub catalog_filter: CatalogFilter,
    pub items: ListCache<Stored<ItemRecord>>,
    pub memberships: ListCache<Stored<MembershipRecord>>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let store = JsonStore::new_default()?;
        Self::with_parts(mode, config, store)
    }

    pub fn with_parts(mode: CliMode, config: Config, store: JsonStore) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script,
            quiet_mode: false,
        });
        let page_size = config.page_size;
        let mut context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            store,
            config,
            transactions: ListCache::new(),
            finances: FinancesTable::with_page_size(Vec::new(), page_size),
            catalog: ListCache::new(),
            catalog_filter: CatalogFilter::default(),
            items: ListCache::new(),
            memberships: ListCache::new(),
            running: true,
        };
        context.refresh_all();
        Ok(context)
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.config.studio_name {
            Some(name) => format!("{name}> "),
            None => "dojo-admin> ".to_string(),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Refetches every list from the store.
    pub(crate) fn refresh_all(&mut self) {
        self.refresh_transactions();
        self.refresh_catalog();
        self.refresh_items();
        self.refresh_memberships();
    }

    pub(crate) fn refresh_transactions(&mut self) {
        let store = &self.store;
        self.transactions.revalidate(|| store.load_transactions());
        self.finances
            .replace_transactions(self.transactions.items().to_vec());
        self.report_cache_error("transactions", self.transactions.error());
    }

    pub(crate) fn refresh_catalog(&mut self) {
        let store = &self.store;
        self.catalog.revalidate(|| store.load_catalog());
        self.report_cache_error("catalog", self.catalog.error());
    }

    pub(crate) fn refresh_items(&mut self) {
        let store = &self.store;
        self.items.revalidate(|| store.load_items());
        self.report_cache_error("classes", self.items.error());
    }

    pub(crate) fn refresh_memberships(&mut self) {
        let store = &self.store;
        self.memberships.revalidate(|| store.load_memberships());
        self.report_cache_error("memberships", self.memberships.error());
    }

    fn report_cache_error(&self, list: &str, error: Option<&str>) {
        if let Some(message) = error {
            cli_io::print_warning(format!("Could not load {list}: {message}"));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|definition| definition.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn require_interactive(&self, command: &'static str) -> CommandResult {
        if self.mode == CliMode::Interactive {
            Ok(())
        } else {
            Err(CommandError::InteractiveOnly(command))
        }
    }
}

/// Rejects extra arguments for commands that take none.
pub(crate) fn expect_no_args(args: &[&str], usage: &str) -> CommandResult {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {usage}")))
    }
}
