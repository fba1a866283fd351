use crate::catalog::CatalogFilter;
use crate::cli::core::{expect_no_args, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::cli::ui::{Table, TableColumn};
use crate::domain::catalog::{CatalogItem, CatalogItemType, StockState};
use crate::domain::common::{format_amount, non_blank};
use crate::wizard::{CatalogClient, RecordKind, RecordPayload};

use super::{CommandDefinition, CommandGroup};

const USAGE: &str = "catalog [show|search <term>|type <merchandise|event-access|all>|category <name|all>|stock <in|out|all>|clear|add <name> <type> <price> [category]|remove <id>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        CommandGroup::Lists,
        "catalog",
        "Filter and manage catalog products",
        USAGE,
        cmd_catalog,
    )
    .with_aliases(&["products"])]
}

fn cmd_catalog(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        render(context);
        return Ok(());
    };

    match subcommand.to_lowercase().as_str() {
        "show" => {
            expect_no_args(rest, "catalog show")?;
            context.refresh_catalog();
        }
        "search" => context.catalog_filter.search = rest.join(" "),
        "type" => {
            let value = single(rest, "catalog type <merchandise|event-access|all>")?;
            context.catalog_filter.item_type = parse_item_type_filter(value)?;
        }
        "category" => {
            if rest.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: catalog category <name|all>".into(),
                ));
            }
            let value = rest.join(" ");
            context.catalog_filter.category = if value.trim().eq_ignore_ascii_case("all") {
                None
            } else {
                non_blank(&value)
            };
        }
        "stock" => {
            let value = single(rest, "catalog stock <in|out|all>")?;
            context.catalog_filter.stock = parse_stock_filter(value)?;
        }
        "clear" | "reset" => context.catalog_filter.clear(),
        "add" => {
            add_product(context, rest)?;
            context.refresh_catalog();
        }
        "remove" => {
            let id = single(rest, "catalog remove <id>")?;
            super::records::remove_record(context, RecordKind::Product, id)?;
            context.refresh_catalog();
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown catalog subcommand `{other}`"
            )))
        }
    }

    render(context);
    Ok(())
}

fn single<'a>(rest: &[&'a str], usage: &str) -> Result<&'a str, CommandError> {
    match rest {
        [value] => Ok(*value),
        _ => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

fn parse_item_type(value: &str) -> Option<CatalogItemType> {
    match value.trim().to_lowercase().replace('_', "-").as_str() {
        "merchandise" | "merch" => Some(CatalogItemType::Merchandise),
        "event-access" | "event" => Some(CatalogItemType::EventAccess),
        _ => None,
    }
}

fn parse_item_type_filter(value: &str) -> Result<Option<CatalogItemType>, CommandError> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    parse_item_type(value).map(Some).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown item type `{value}` (expected merchandise, event-access, or all)"
        ))
    })
}

fn parse_stock_filter(value: &str) -> Result<Option<StockState>, CommandError> {
    match value.to_lowercase().as_str() {
        "all" => Ok(None),
        "in" | "in-stock" => Ok(Some(StockState::InStock)),
        "out" | "out-of-stock" => Ok(Some(StockState::OutOfStock)),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown stock state `{other}` (expected in, out, or all)"
        ))),
    }
}

fn add_product(context: &mut ShellContext, rest: &[&str]) -> CommandResult {
    let (name, item_type, price, category) = match rest {
        [name, item_type, price] => (*name, *item_type, *price, None),
        [name, item_type, price, category @ ..] => {
            (*name, *item_type, *price, non_blank(&category.join(" ")))
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: catalog add <name> <merchandise|event-access> <price> [category]".into(),
            ))
        }
    };
    let name = non_blank(name)
        .ok_or_else(|| CommandError::InvalidArguments("product name cannot be blank".into()))?;
    let item_type = parse_item_type(item_type).ok_or_else(|| {
        CommandError::InvalidArguments(format!("unknown item type `{item_type}`"))
    })?;
    let price = price
        .trim_start_matches(context.config.currency_symbol.as_str())
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid price `{price}`"))
        })?;

    let mut product = CatalogItem::new(String::new(), name, item_type);
    product.price = price;
    product.category = category;
    let created = context.store.create(&RecordPayload::Product(product))?;
    io::print_success(format!("Added product {}.", created.id));
    Ok(())
}

fn render(context: &ShellContext) {
    let items = context.catalog.items();
    let filter = &context.catalog_filter;
    output_section("Catalog");
    print_options(filter, items);

    if items.is_empty() {
        io::print_info("No products yet.");
        io::print_hint("Use `catalog add <name> <type> <price>` to create one.");
        return;
    }
    let visible = filter.apply(items);
    if visible.is_empty() {
        io::print_info("No products match the current filters.");
        io::print_hint("Use `catalog clear` to reset the filters.");
        return;
    }

    let symbol = &context.config.currency_symbol;
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Name").max_width(28),
        TableColumn::left("Type"),
        TableColumn::left("Category").max_width(18),
        TableColumn::right("Price"),
        TableColumn::left("Stock"),
    ]);
    for item in &visible {
        table.push_row(vec![
            item.id.clone(),
            item.name.clone(),
            item.item_type.to_string(),
            item.category.clone().unwrap_or_default(),
            format_amount(symbol, item.price),
            stock_label(item),
        ]);
    }
    output::plain(table.render());
    io::print_info(format!("{} of {} products shown", visible.len(), items.len()));
}

fn stock_label(item: &CatalogItem) -> String {
    if item.track_inventory {
        format!("{} ({})", item.stock_state(), item.total_stock.max(0))
    } else {
        item.stock_state().to_string()
    }
}

fn print_options(filter: &CatalogFilter, items: &[CatalogItem]) {
    let options = filter.available_options(items);
    let types: Vec<String> = options.item_types.iter().map(ToString::to_string).collect();
    let stock: Vec<String> = options
        .stock_states
        .iter()
        .map(ToString::to_string)
        .collect();
    io::print_info(format!("Types: {}", or_none(&types)));
    io::print_info(format!("Categories: {}", or_none(&options.categories)));
    io::print_info(format!("Stock: {}", or_none(&stock)));
}

fn or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".into()
    } else {
        values.join(", ")
    }
}
