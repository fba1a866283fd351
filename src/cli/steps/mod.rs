//! Per-step prompt forms for the item and membership wizards.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::cli::forms::{FieldPrompter, Flow};
use crate::domain::common::OptionSet;
use crate::domain::lookup::Lookup;
use crate::domain::schedule::{SessionDuration, TimeOfDay};
use crate::domain::transaction::parse_display_date;

mod item;
mod membership;

const NONE_LABEL: &str = "(none)";

pub(crate) fn choose_option<O: OptionSet>(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: Option<O>,
) -> Flow<O> {
    let index = prompter.choose(label, &O::labels(), current.and_then(|option| option.position()))?;
    Ok(O::ALL[index])
}

/// Options for a lookup-backed field: every known entry plus any selected id
/// the table does not know, shown raw.
fn lookup_options<'a, I>(lookup: &dyn Lookup, selected: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut options: Vec<(String, String)> = lookup
        .entries()
        .into_iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();
    for id in selected {
        if !id.trim().is_empty() && options.iter().all(|(known, _)| known != id) {
            options.push((id.to_string(), id.to_string()));
        }
    }
    options
}

/// Single pick from a lookup table. With `optional`, a "(none)" entry clears
/// the value.
pub(crate) fn choose_lookup(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    lookup: &dyn Lookup,
    current: Option<&str>,
    optional: bool,
) -> Flow<Option<String>> {
    let options = lookup_options(lookup, current);
    if options.is_empty() {
        prompter.notice(format!("No {} options are configured.", label.to_lowercase()));
        return Ok(current.map(str::to_string));
    }
    let mut labels: Vec<String> = options.iter().map(|(_, name)| name.clone()).collect();
    if optional {
        labels.push(NONE_LABEL.to_string());
    }
    let position = match current {
        Some(id) => options.iter().position(|(known, _)| known == id),
        None if optional => Some(options.len()),
        None => None,
    };
    let index = prompter.choose(label, &labels, position)?;
    Ok(options.get(index).map(|(id, _)| id.clone()))
}

pub(crate) fn choose_lookup_many(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    lookup: &dyn Lookup,
    current: &BTreeSet<String>,
) -> Flow<BTreeSet<String>> {
    let options = lookup_options(lookup, current.iter().map(String::as_str));
    if options.is_empty() {
        prompter.notice(format!("No {} are configured.", label.to_lowercase()));
        return Ok(current.clone());
    }
    let labels: Vec<String> = options.iter().map(|(_, name)| name.clone()).collect();
    let selected: Vec<bool> = options.iter().map(|(id, _)| current.contains(id)).collect();
    let picked = prompter.choose_many(label, &labels, &selected)?;
    Ok(picked
        .into_iter()
        .filter_map(|index| options.get(index).map(|(id, _)| id.clone()))
        .collect())
}

pub(crate) fn money(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: Option<f64>,
) -> Flow<Option<f64>> {
    prompter.parsed(label, current, |value| format!("{value:.2}"), parse_money)
}

pub(crate) fn count(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: Option<u32>,
) -> Flow<Option<u32>> {
    prompter.parsed(label, current, u32::to_string, |value| {
        value
            .parse::<u32>()
            .map_err(|_| format!("`{value}` is not a whole number"))
    })
}

pub(crate) fn date(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: Option<NaiveDate>,
) -> Flow<Option<NaiveDate>> {
    prompter.parsed(
        label,
        current,
        |value| value.format("%Y-%m-%d").to_string(),
        |value| parse_display_date(value).ok_or_else(|| format!("`{value}` is not a date (use YYYY-MM-DD)")),
    )
}

/// Required clock time; a blank answer keeps `current`.
pub(crate) fn time(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: TimeOfDay,
) -> Flow<TimeOfDay> {
    let parsed = prompter.parsed(label, Some(current), TimeOfDay::to_string, |value| {
        value.parse::<TimeOfDay>().map_err(|err| err.to_string())
    })?;
    Ok(parsed.unwrap_or(current))
}

/// Required duration; a blank answer keeps `current`.
pub(crate) fn duration(
    prompter: &mut FieldPrompter<'_>,
    label: &str,
    current: SessionDuration,
) -> Flow<SessionDuration> {
    let parsed = prompter.parsed(label, Some(current), SessionDuration::to_string, |value| {
        value.parse::<SessionDuration>().map_err(|err| err.to_string())
    })?;
    Ok(parsed.unwrap_or(current))
}

/// Accepts `45`, `45.50`, `$1,250` and similar.
pub(crate) fn parse_money(value: &str) -> Result<f64, String> {
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| format!("`{value}` is not an amount"))
}
