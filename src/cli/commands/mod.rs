use std::collections::HashMap;

pub mod catalog;
pub mod config;
pub mod finances;
pub mod records;
pub mod system;

use crate::cli::core::{CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(config::definitions());
    commands.extend(finances::definitions());
    commands.extend(catalog::definitions());
    commands.extend(records::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Heading a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Lists,
    Records,
    Shell,
}

impl CommandGroup {
    pub const ORDER: [CommandGroup; 3] = [CommandGroup::Lists, CommandGroup::Records, CommandGroup::Shell];

    pub fn title(&self) -> &'static str {
        match self {
            CommandGroup::Lists => "Lists",
            CommandGroup::Records => "Classes, events and memberships",
            CommandGroup::Shell => "Shell",
        }
    }
}

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub group: CommandGroup,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        group: CommandGroup,
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            group,
            description,
            usage,
            handler,
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Commands in registration order, looked up by name or alias.
pub struct CommandRegistry {
    definitions: Vec<CommandDefinition>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut lookup = HashMap::new();
        for (index, definition) in definitions.iter().enumerate() {
            lookup.insert(definition.name, index);
            for alias in definition.aliases {
                lookup.entry(*alias).or_insert(index);
            }
        }
        Self { definitions, lookup }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.lookup
            .get(name)
            .and_then(|index| self.definitions.get(*index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.definitions.iter()
    }

    pub fn in_group(&self, group: CommandGroup) -> impl Iterator<Item = &CommandDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.group == group)
    }

    /// Primary names only; aliases resolve through [`CommandRegistry::get`].
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|definition| definition.name)
    }
}
