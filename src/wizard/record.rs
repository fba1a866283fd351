//! Output records built from finished drafts.
//!
//! A record keeps the draft fields it came from (so it can seed an edit
//! wizard later) alongside the display strings the rest of the app shows:
//! resolved names, schedule lines with computed end times, price summaries.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::common::{format_amount, OptionSet};
use crate::domain::item::{
    ClassDetails, DiscountKind, EventBilling, EventDetails, ItemDetails, ItemDraft, TagSelection,
};
use crate::domain::lookup::{Lookup, ReferenceTables};
use crate::domain::membership::{MembershipDraft, MembershipType};
use crate::domain::schedule::{
    weekday_name, EventSession, ScheduleInstance, SessionDuration, TimeOfDay,
};
use crate::errors::{DojoError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub details: ClassDetails,
    pub tags: TagSelection,
    pub program_name: Option<String>,
    pub tag_names: Vec<String>,
    pub schedule_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub details: EventDetails,
    pub tags: TagSelection,
    pub event_type: Option<String>,
    pub tag_names: Vec<String>,
    pub date_range: String,
    pub session_lines: Vec<String>,
    pub price_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRecord {
    Class(ClassRecord),
    Event(EventRecord),
}

impl ItemRecord {
    pub fn from_draft(
        draft: &ItemDraft,
        references: &ReferenceTables,
        currency_symbol: &str,
    ) -> Result<Self> {
        let tag_names = resolve_all(references.tags.as_ref(), &draft.tags.tag_ids);
        match &draft.details {
            ItemDetails::Unset => Err(DojoError::InvalidInput(
                "choose a class or an event before saving".into(),
            )),
            ItemDetails::Class(class) => Ok(ItemRecord::Class(ClassRecord {
                details: class.clone(),
                tags: draft.tags.clone(),
                program_name: class
                    .program_id
                    .as_deref()
                    .map(|id| references.programs.resolve(id)),
                tag_names,
                schedule_lines: class
                    .schedule
                    .iter()
                    .map(|entry| instance_line(entry, references))
                    .collect(),
            })),
            ItemDetails::Event(event) => Ok(ItemRecord::Event(EventRecord {
                details: event.clone(),
                tags: draft.tags.clone(),
                event_type: event.event_type.map(|kind| kind.label().to_string()),
                tag_names,
                date_range: date_range(event.schedule.start_date(), event.schedule.end_date()),
                session_lines: event
                    .schedule
                    .sessions
                    .iter()
                    .map(|session| session_line(session, references))
                    .collect(),
                price_summary: event_price_summary(&event.billing, currency_symbol),
            })),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ItemRecord::Class(class) => &class.details.name,
            ItemRecord::Event(event) => &event.details.name,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ItemRecord::Class(_) => "Class",
            ItemRecord::Event(_) => "Event",
        }
    }

    /// One-line summary for list views.
    pub fn summary(&self) -> String {
        match self {
            ItemRecord::Class(class) => {
                let program = class.program_name.as_deref().unwrap_or("No program");
                format!("{program}; {} weekly session(s)", class.schedule_lines.len())
            }
            ItemRecord::Event(event) => format!("{}; {}", event.date_range, event.price_summary),
        }
    }
}

impl ItemDraft {
    /// Draft used to seed an edit wizard for a stored record.
    pub fn from_record(record: &ItemRecord) -> Self {
        match record {
            ItemRecord::Class(class) => ItemDraft {
                details: ItemDetails::Class(class.details.clone()),
                tags: class.tags.clone(),
            },
            ItemRecord::Event(event) => ItemDraft {
                details: ItemDetails::Event(event.details.clone()),
                tags: event.tags.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub draft: MembershipDraft,
    pub class_names: Vec<String>,
    pub price_summary: String,
    pub contract_summary: String,
}

impl MembershipRecord {
    pub fn from_draft(
        draft: &MembershipDraft,
        references: &ReferenceTables,
        currency_symbol: &str,
    ) -> Result<Self> {
        if draft.membership_type.is_none() {
            return Err(DojoError::InvalidInput(
                "select a membership type before saving".into(),
            ));
        }
        Ok(Self {
            draft: draft.clone(),
            class_names: resolve_all(references.classes.as_ref(), &draft.class_access.class_ids),
            price_summary: membership_price_summary(draft, currency_symbol),
            contract_summary: contract_summary(draft, currency_symbol),
        })
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }
}

impl MembershipDraft {
    pub fn from_record(record: &MembershipRecord) -> Self {
        record.draft.clone()
    }
}

fn resolve_all<'a, I>(lookup: &dyn Lookup, ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    ids.into_iter().map(|id| lookup.resolve(id)).collect()
}

/// `"Monday 6:00 PM - 7:30 PM (Coach Ana Rivera)"`.
pub fn instance_line(entry: &ScheduleInstance, references: &ReferenceTables) -> String {
    weekly_line(
        entry.weekday,
        entry.start,
        entry.duration,
        &staff_label(references, &entry.staff_id, entry.assistant_id.as_deref()),
    )
}

pub fn session_line(session: &EventSession, references: &ReferenceTables) -> String {
    dated_line(
        session.date,
        session.start,
        session.duration,
        &staff_label(references, &session.staff_id, session.assistant_id.as_deref()),
    )
}

fn staff_label(references: &ReferenceTables, staff_id: &str, assistant_id: Option<&str>) -> String {
    if staff_id.trim().is_empty() {
        return "no instructor".to_string();
    }
    let lead = references.staff.resolve(staff_id);
    match assistant_id.filter(|id| !id.trim().is_empty()) {
        Some(assistant) => format!("{lead} with {}", references.staff.resolve(assistant)),
        None => lead,
    }
}

/// `"6:00 PM - 7:30 PM"`, marking sessions that run past midnight.
pub fn time_range(start: TimeOfDay, duration: SessionDuration) -> String {
    let (end, days) = start.advance(duration);
    match days {
        0 => format!("{start} - {end}"),
        1 => format!("{start} - {end} (+1 day)"),
        n => format!("{start} - {end} (+{n} days)"),
    }
}

fn weekly_line(day: Weekday, start: TimeOfDay, duration: SessionDuration, staff: &str) -> String {
    format!("{} {} ({staff})", weekday_name(day), time_range(start, duration))
}

fn dated_line(
    date: Option<NaiveDate>,
    start: TimeOfDay,
    duration: SessionDuration,
    staff: &str,
) -> String {
    let day = date
        .map(format_date)
        .unwrap_or_else(|| "Date TBD".to_string());
    format!("{day} {} ({staff})", time_range(start, duration))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (None, _) => "Dates TBD".to_string(),
        (Some(start), Some(end)) if end != start => {
            format!("{} to {}", format_date(start), format_date(end))
        }
        (Some(start), _) => format_date(start),
    }
}

fn event_price_summary(billing: &EventBilling, symbol: &str) -> String {
    let price = match billing.price.filter(|_| billing.has_fee) {
        Some(price) => price,
        None => return "Free".to_string(),
    };
    let mut summary = format_amount(symbol, price);
    if let Some(early) = &billing.early_bird {
        if let Some(early_price) = early.price {
            match early.deadline {
                Some(deadline) => summary.push_str(&format!(
                    " (early bird {} until {})",
                    format_amount(symbol, early_price),
                    deadline.format("%b %-d, %Y")
                )),
                None => summary.push_str(&format!(
                    " (early bird {})",
                    format_amount(symbol, early_price)
                )),
            }
        }
    }
    if let Some(discount) = &billing.member_discount {
        if let Some(amount) = discount.amount {
            let saving = match discount.kind {
                DiscountKind::Percentage => format!("{amount}%"),
                DiscountKind::FixedAmount => format_amount(symbol, amount),
            };
            summary.push_str(&format!("; members save {saving}"));
        }
    }
    summary
}

fn membership_price_summary(draft: &MembershipDraft, symbol: &str) -> String {
    let fees = &draft.fees;
    let mut summary = match draft.membership_type {
        Some(MembershipType::Trial) => match fees.monthly_fee.filter(|fee| *fee > 0.0) {
            Some(fee) => format!("{} trial", format_amount(symbol, fee)),
            None => "Free trial".to_string(),
        },
        Some(MembershipType::Punchcard) => format!(
            "{} for {} classes",
            format_amount(symbol, fees.punchcard_price.unwrap_or_default()),
            fees.classes_included.unwrap_or_default()
        ),
        Some(MembershipType::Standard) | None => format!(
            "{} per {}",
            format_amount(symbol, fees.monthly_fee.unwrap_or_default()),
            fees.billing_frequency.unit()
        ),
    };
    if let Some(signup) = fees.signup_fee.filter(|fee| *fee > 0.0) {
        summary.push_str(&format!(
            " + {} signup fee ({})",
            format_amount(symbol, signup),
            fees.signup_fee_timing.label().to_lowercase()
        ));
    }
    summary
}

fn contract_summary(draft: &MembershipDraft, symbol: &str) -> String {
    let contract = &draft.contract;
    let mut summary = format!(
        "{}; {}",
        contract.length.label(),
        contract.auto_renewal.label().to_lowercase()
    );
    if let Some(fee) = contract.cancellation_fee.filter(|fee| *fee > 0.0) {
        summary.push_str(&format!("; {} to cancel", format_amount(symbol, fee)));
    }
    if let Some(holds) = contract.holds_per_year {
        summary.push_str(&format!("; {holds} hold(s) per year"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{EarlyBird, ItemType, MemberDiscount};
    use crate::domain::lookup::ReferenceData;
    use crate::domain::membership::BillingFrequency;
    use crate::domain::schedule::{Meridiem, ScheduleInstance};

    fn references() -> ReferenceTables {
        ReferenceData::demo().into()
    }

    #[test]
    fn class_record_resolves_names_and_end_times() {
        let mut draft = ItemDraft::default();
        draft.select_type(ItemType::Class);
        let class = draft.class_mut().unwrap();
        class.name = "Fundamentals".into();
        class.program_id = Some("bjj-adult".into());
        let mut instance = ScheduleInstance::new("instance-1");
        instance.weekday = Weekday::Mon;
        instance.start = TimeOfDay::new(6, 0, Meridiem::Pm).unwrap();
        instance.duration = SessionDuration::new(1, 30);
        instance.staff_id = "staff-1".into();
        class.schedule.append(instance).unwrap();
        draft.tags.tag_ids.insert("tag-gi".into());

        let record = ItemRecord::from_draft(&draft, &references(), "$").unwrap();
        let ItemRecord::Class(class) = record else {
            panic!("expected a class record");
        };
        assert_eq!(class.program_name.as_deref(), Some("Adult Brazilian Jiu-Jitsu"));
        assert_eq!(class.tag_names, vec!["Gi".to_string()]);
        assert_eq!(
            class.schedule_lines,
            vec!["Monday 6:00 PM - 7:30 PM (Coach Ana Rivera)".to_string()]
        );
    }

    #[test]
    fn unknown_ids_fall_back_to_raw_id() {
        let mut draft = ItemDraft::default();
        draft.select_type(ItemType::Class);
        let class = draft.class_mut().unwrap();
        class.program_id = Some("capoeira".into());
        let mut instance = ScheduleInstance::new("instance-1");
        instance.staff_id = "staff-99".into();
        class.schedule.append(instance).unwrap();

        let record = ItemRecord::from_draft(&draft, &references(), "$").unwrap();
        let ItemRecord::Class(class) = record else {
            panic!("expected a class record");
        };
        assert_eq!(class.program_name.as_deref(), Some("capoeira"));
        assert!(class.schedule_lines[0].ends_with("(staff-99)"));
    }

    #[test]
    fn late_sessions_roll_over_midnight() {
        let start = TimeOfDay::new(11, 30, Meridiem::Pm).unwrap();
        assert_eq!(
            time_range(start, SessionDuration::new(1, 0)),
            "11:30 PM - 12:30 AM (+1 day)"
        );
        let noon = TimeOfDay::new(11, 0, Meridiem::Am).unwrap();
        assert_eq!(time_range(noon, SessionDuration::new(2, 0)), "11:00 AM - 1:00 PM");
    }

    #[test]
    fn event_price_summary_mentions_options() {
        let billing = EventBilling {
            has_fee: true,
            price: Some(60.0),
            early_bird: Some(EarlyBird {
                price: Some(45.0),
                deadline: NaiveDate::from_ymd_opt(2025, 4, 1),
            }),
            member_discount: Some(MemberDiscount {
                kind: DiscountKind::Percentage,
                amount: Some(10.0),
            }),
        };
        assert_eq!(
            event_price_summary(&billing, "$"),
            "$60 (early bird $45 until Apr 1, 2025); members save 10%"
        );
        assert_eq!(event_price_summary(&EventBilling::default(), "$"), "Free");
    }

    #[test]
    fn unset_draft_cannot_become_a_record() {
        assert!(ItemRecord::from_draft(&ItemDraft::default(), &references(), "$").is_err());
    }

    #[test]
    fn membership_record_round_trips_to_draft() {
        let mut draft = MembershipDraft {
            name: "Adult Unlimited".into(),
            membership_type: Some(MembershipType::Standard),
            ..MembershipDraft::default()
        };
        draft.fees.monthly_fee = Some(150.0);
        draft.fees.billing_frequency = BillingFrequency::Monthly;
        draft.class_access.class_ids.insert("class-advanced".into());

        let record = MembershipRecord::from_draft(&draft, &references(), "$").unwrap();
        assert_eq!(record.price_summary, "$150 per month");
        assert_eq!(record.class_names, vec!["Advanced".to_string()]);
        assert_eq!(MembershipDraft::from_record(&record), draft);
    }
}
