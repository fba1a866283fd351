use crate::cli::core::{expect_no_args, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::ui::{Table, TableColumn};
use crate::finances::{FinancesTable, PurposeFilter, SortDirection, SortField};

use super::{CommandDefinition, CommandGroup};

const USAGE: &str = "finances [show|search <term>|purpose <name|all>|purposes|sort <field>|page <n>|next|prev|reset]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        CommandGroup::Lists,
        "finances",
        "Browse, filter and sort transactions",
        USAGE,
        cmd_finances,
    )
    .with_aliases(&["transactions"])]
}

fn cmd_finances(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        render(&context.finances);
        return Ok(());
    };

    match subcommand.to_lowercase().as_str() {
        "show" => {
            expect_no_args(rest, "finances show")?;
            context.refresh_transactions();
        }
        "search" => context.finances.set_search(rest.join(" ")),
        "purpose" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: finances purpose <name|all>".into(),
                ));
            }
            let filter = PurposeFilter::parse(&rest.join(" "));
            if let PurposeFilter::Exact(name) = &filter {
                if !context.finances.available_purposes().contains(name) {
                    io::print_warning(format!("No transactions have the purpose `{name}`."));
                }
            }
            context.finances.set_purpose(filter);
        }
        "purposes" => {
            expect_no_args(rest, "finances purposes")?;
            list_purposes(&context.finances);
            return Ok(());
        }
        "sort" => {
            let [field] = rest else {
                return Err(CommandError::InvalidArguments(
                    "usage: finances sort <date|amount|purpose|method|payment-id>".into(),
                ));
            };
            let field: SortField = field.parse()?;
            context.finances.toggle_sort(field);
        }
        "page" => {
            let page = rest
                .first()
                .and_then(|value| value.parse::<usize>().ok())
                .filter(|page| *page > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("usage: finances page <n> (n >= 1)".into())
                })?;
            context.finances.set_page(page - 1);
        }
        "next" => {
            if !context.finances.next_page() {
                io::print_info("Already on the last page.");
                return Ok(());
            }
        }
        "prev" | "previous" => {
            if !context.finances.previous_page() {
                io::print_info("Already on the first page.");
                return Ok(());
            }
        }
        "reset" | "clear" => context.finances.clear_filters(),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown finances subcommand `{other}`"
            )))
        }
    }

    render(&context.finances);
    Ok(())
}

fn list_purposes(table: &FinancesTable) {
    output_section("Purposes");
    if table.available_purposes().is_empty() {
        io::print_info("No purposes recorded yet.");
        return;
    }
    for purpose in table.available_purposes() {
        io::print_info(format!("  {purpose}"));
    }
}

fn render(table: &FinancesTable) {
    let page = table.current_page();
    output_section("Finances");
    print_filters(table);

    if let Some(empty) = page.empty {
        io::print_info(empty.message());
        if table.transactions().is_empty() {
            io::print_hint("Payments appear here once they are recorded.");
        } else {
            io::print_hint("Use `finances reset` to clear the filters.");
        }
        return;
    }

    let mut rendered = Table::new(vec![
        TableColumn::left(header(table, SortField::Date, "Date")),
        TableColumn::right(header(table, SortField::Amount, "Amount")),
        TableColumn::left(header(table, SortField::Purpose, "Purpose")).max_width(24),
        TableColumn::left(header(table, SortField::Method, "Method")),
        TableColumn::left(header(table, SortField::PaymentId, "Payment ID")),
        TableColumn::left("Notes").max_width(30),
    ]);
    for tx in &page.rows {
        rendered.push_row(vec![
            tx.date.clone(),
            tx.amount.clone(),
            tx.purpose.clone(),
            tx.method.clone(),
            tx.payment_id.clone(),
            tx.notes.clone().unwrap_or_default(),
        ]);
    }
    output::plain(rendered.render());
    io::print_info(format!(
        "Page {} of {} ({} matching)",
        page.page + 1,
        page.page_count,
        page.total_matches
    ));
}

fn print_filters(table: &FinancesTable) {
    let mut active = Vec::new();
    if !table.search().trim().is_empty() {
        active.push(format!("search \"{}\"", table.search().trim()));
    }
    if let PurposeFilter::Exact(purpose) = table.purpose() {
        active.push(format!("purpose {purpose}"));
    }
    if let Some(sort) = table.sort() {
        let direction = match sort.direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        };
        active.push(format!("sorted by {} {direction}", sort.field));
    }
    if !active.is_empty() {
        io::print_info(format!("Filters: {}", active.join(", ")));
    }
}

fn header(table: &FinancesTable, field: SortField, label: &'static str) -> &'static str {
    match table.sort() {
        Some(sort) if sort.field == field => match (field, sort.direction) {
            (SortField::Date, SortDirection::Ascending) => "Date ▲",
            (SortField::Date, SortDirection::Descending) => "Date ▼",
            (SortField::Amount, SortDirection::Ascending) => "Amount ▲",
            (SortField::Amount, SortDirection::Descending) => "Amount ▼",
            (SortField::Purpose, SortDirection::Ascending) => "Purpose ▲",
            (SortField::Purpose, SortDirection::Descending) => "Purpose ▼",
            (SortField::Method, SortDirection::Ascending) => "Method ▲",
            (SortField::Method, SortDirection::Descending) => "Method ▼",
            (SortField::PaymentId, SortDirection::Ascending) => "Payment ID ▲",
            (SortField::PaymentId, SortDirection::Descending) => "Payment ID ▼",
        },
        _ => label,
    }
}
