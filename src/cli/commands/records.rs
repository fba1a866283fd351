use std::sync::Arc;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{run_wizard, DialoguerInteraction, FormEnv, FormResult};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::ui::{Table, TableColumn};
use crate::domain::common::OptionSet;
use crate::domain::ids::UuidIds;
use crate::domain::item::ItemDraft;
use crate::domain::membership::MembershipDraft;
use crate::wizard::{CatalogClient, ItemWizard, MembershipWizard, RecordKind};

use super::{CommandDefinition, CommandGroup};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            CommandGroup::Records,
            "classes",
            "List and manage classes and events",
            "classes [list|add|edit <id>|remove <id>]",
            cmd_classes,
        )
        .with_aliases(&["events"]),
        CommandDefinition::new(
            CommandGroup::Records,
            "class",
            "Create or edit a class or event with the wizard",
            "class <add|edit <id>>",
            cmd_class,
        )
        .with_aliases(&["event"]),
        CommandDefinition::new(
            CommandGroup::Records,
            "memberships",
            "List and manage membership plans",
            "memberships [list|add|edit <id>|remove <id>]",
            cmd_memberships,
        )
        .with_aliases(&["plans"]),
        CommandDefinition::new(
            CommandGroup::Records,
            "membership",
            "Create or edit a membership plan with the wizard",
            "membership <add|edit <id>>",
            cmd_membership,
        )
        .with_aliases(&["plan"]),
    ]
}

fn cmd_classes(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => list_items(context),
        [sub] if sub.eq_ignore_ascii_case("list") => list_items(context),
        [sub, id] if sub.eq_ignore_ascii_case("remove") => {
            remove_record(context, RecordKind::Item, id)?;
            context.refresh_items();
            Ok(())
        }
        _ => cmd_class(context, args),
    }
}

fn cmd_class(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [sub] if sub.eq_ignore_ascii_case("add") => item_wizard(context, None),
        [sub, id] if sub.eq_ignore_ascii_case("edit") => item_wizard(context, Some(*id)),
        _ => Err(CommandError::InvalidArguments(
            "usage: class <add|edit <id>>".into(),
        )),
    }
}

fn cmd_memberships(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => list_memberships(context),
        [sub] if sub.eq_ignore_ascii_case("list") => list_memberships(context),
        [sub, id] if sub.eq_ignore_ascii_case("remove") => {
            remove_record(context, RecordKind::Membership, id)?;
            context.refresh_memberships();
            Ok(())
        }
        _ => cmd_membership(context, args),
    }
}

fn cmd_membership(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [sub] if sub.eq_ignore_ascii_case("add") => membership_wizard(context, None),
        [sub, id] if sub.eq_ignore_ascii_case("edit") => membership_wizard(context, Some(*id)),
        _ => Err(CommandError::InvalidArguments(
            "usage: membership <add|edit <id>>".into(),
        )),
    }
}

fn list_items(context: &mut ShellContext) -> CommandResult {
    output_section("Classes and events");
    let items = context.items.items();
    if items.is_empty() {
        io::print_info("No classes or events yet.");
        if context.mode() == CliMode::Interactive {
            io::print_hint("Use `class add` to create one.");
        }
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Kind"),
        TableColumn::left("Name").max_width(28),
        TableColumn::left("Summary").max_width(48),
    ]);
    for stored in items {
        table.push_row(vec![
            stored.id.clone(),
            stored.record.kind_label().to_string(),
            stored.record.name().to_string(),
            stored.record.summary(),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn list_memberships(context: &mut ShellContext) -> CommandResult {
    output_section("Membership plans");
    let plans = context.memberships.items();
    if plans.is_empty() {
        io::print_info("No membership plans yet.");
        if context.mode() == CliMode::Interactive {
            io::print_hint("Use `membership add` to create one.");
        }
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Name").max_width(28),
        TableColumn::left("Type"),
        TableColumn::left("Status"),
        TableColumn::left("Price").max_width(40),
        TableColumn::left("Contract").max_width(40),
    ]);
    for stored in plans {
        let plan = &stored.record;
        table.push_row(vec![
            stored.id.clone(),
            plan.name().to_string(),
            plan.draft
                .membership_type
                .map(|kind| kind.label().to_string())
                .unwrap_or_default(),
            plan.draft.status.label().to_string(),
            plan.price_summary.clone(),
            plan.contract_summary.clone(),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

pub(crate) fn remove_record(context: &mut ShellContext, kind: RecordKind, id: &str) -> CommandResult {
    if context.mode() == CliMode::Interactive {
        if !io::confirm(&context.theme, format!("Remove {kind} {id}?"), false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }
    context.store.remove(kind, id)?;
    io::print_success(format!("Removed {kind} {id}."));
    Ok(())
}

fn item_wizard(context: &mut ShellContext, edit_id: Option<&str>) -> CommandResult {
    context.require_interactive(if edit_id.is_some() { "class edit" } else { "class add" })?;
    let ids = Arc::new(UuidIds);
    let mut wizard = match edit_id {
        None => ItemWizard::new(ids),
        Some(id) => {
            let stored = context
                .items
                .items()
                .iter()
                .find(|stored| stored.id == id)
                .ok_or_else(|| CommandError::Message(format!("no class or event with id `{id}`")))?;
            ItemWizard::for_edit(id, ItemDraft::from_record(&stored.record), ids)
        }
    };

    let references = context.store.reference_tables()?;
    let env = FormEnv {
        references: &references,
        currency_symbol: &context.config.currency_symbol,
        default_color: context.config.default_calendar_color.as_deref(),
    };
    let mut interaction = DialoguerInteraction::new();
    match run_wizard(&mut wizard, &mut interaction, &mut context.store, &env) {
        FormResult::Completed(created) => io::print_success(format!(
            "Saved {} `{}` ({}).",
            created.record.kind_label().to_lowercase(),
            created.record.name(),
            created.id
        )),
        FormResult::Cancelled => io::print_info("Draft discarded."),
    }
    context.refresh_items();
    Ok(())
}

fn membership_wizard(context: &mut ShellContext, edit_id: Option<&str>) -> CommandResult {
    context.require_interactive(if edit_id.is_some() {
        "membership edit"
    } else {
        "membership add"
    })?;
    let ids = Arc::new(UuidIds);
    let mut wizard = match edit_id {
        None => MembershipWizard::new(ids),
        Some(id) => {
            let stored = context
                .memberships
                .items()
                .iter()
                .find(|stored| stored.id == id)
                .ok_or_else(|| CommandError::Message(format!("no membership plan with id `{id}`")))?;
            MembershipWizard::for_edit(id, MembershipDraft::from_record(&stored.record), ids)
        }
    };

    let references = context.store.reference_tables()?;
    let env = FormEnv {
        references: &references,
        currency_symbol: &context.config.currency_symbol,
        default_color: None,
    };
    let mut interaction = DialoguerInteraction::new();
    match run_wizard(&mut wizard, &mut interaction, &mut context.store, &env) {
        FormResult::Completed(created) => io::print_success(format!(
            "Saved membership plan `{}` ({}).",
            created.record.name(),
            created.id
        )),
        FormResult::Cancelled => io::print_info("Draft discarded."),
    }
    context.refresh_memberships();
    Ok(())
}
