use crate::cli::commands::{CommandDefinition, CommandGroup, CommandRegistry};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for group in CommandGroup::ORDER {
        let mut commands = registry.in_group(group).peekable();
        if commands.peek().is_none() {
            continue;
        }
        io::print_info(format!("{}:", group.title()));
        for definition in commands {
            io::print_info(format!("  {:<12} {}", definition.name, definition.description));
        }
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(definition: &CommandDefinition) {
    output_section(format!("Help: {}", definition.name));
    io::print_info(format!("  Description: {}", definition.description));
    io::print_info(format!("  Usage: {}", definition.usage));
    if !definition.aliases.is_empty() {
        io::print_info(format!("  Aliases: {}", definition.aliases.join(", ")));
    }
}
