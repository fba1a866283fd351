use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::config::{Config, ConfigManager};
use crate::domain::common::non_blank;
use crate::finances::FinancesTable;

use super::{CommandDefinition, CommandGroup};

const SET_USAGE: &str =
    "usage: config set <locale|currency|page_size|calendar_color|studio_name> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        CommandGroup::Shell,
        "config",
        "View and change studio preferences",
        "config [show|set <key> <value>|reset]",
        cmd_config,
    )
    .with_aliases(&["prefs"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(&context.config);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(SET_USAGE.into()));
            }
            let value = args[2..].join(" ");
            let mut updated = context.config.clone();
            apply_setting(&mut updated, args[1], value.trim())?;
            persist(context, updated)?;
            io::print_success(format!("Updated `{}`.", args[1]));
            Ok(())
        }
        "reset" => {
            persist(context, Config::default())?;
            io::print_success("Preferences restored to defaults.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn show_config(config: &Config) {
    output_section("Preferences");
    io::print_info(format!("  Locale         : {}", config.locale));
    io::print_info(format!("  Currency       : {}", config.currency_symbol));
    io::print_info(format!("  Page size      : {}", config.page_size));
    io::print_info(format!(
        "  Calendar color : {}",
        config.default_calendar_color.as_deref().unwrap_or("(none)")
    ));
    io::print_info(format!(
        "  Studio name    : {}",
        config.studio_name.as_deref().unwrap_or("(none)")
    ));
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> CommandResult {
    match key.to_lowercase().replace('-', "_").as_str() {
        "locale" => config.locale = required(value, key)?,
        "currency" | "currency_symbol" => config.currency_symbol = required(value, key)?,
        "page_size" => {
            config.page_size = value
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("page_size must be a positive number".into())
                })?;
        }
        "calendar_color" | "default_calendar_color" => {
            config.default_calendar_color = non_blank(value)
        }
        "studio_name" | "studio" => config.studio_name = non_blank(value),
        _ => return Err(CommandError::InvalidArguments(SET_USAGE.into())),
    }
    Ok(())
}

fn required(value: &str, key: &str) -> Result<String, CommandError> {
    non_blank(value).ok_or_else(|| CommandError::InvalidArguments(format!("`{key}` cannot be blank")))
}

fn persist(context: &mut ShellContext, config: Config) -> CommandResult {
    let manager = ConfigManager::with_base_dir(context.store.base_dir().to_path_buf())?;
    manager.save(&config)?;
    if config.page_size != context.config.page_size {
        context.finances =
            FinancesTable::with_page_size(context.transactions.items().to_vec(), config.page_size);
    }
    context.config = config;
    Ok(())
}
