//! Draft record for the class/event wizard.
//!
//! The class and event field groups are mutually exclusive, so the draft
//! holds them as a tagged union. Tag/color selection applies to both branches
//! and lives beside the union.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::OptionSet;
use crate::domain::entry_list::EntryList;
use crate::domain::schedule::{EventSession, ScheduleInstance};
use crate::errors::{DojoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Class,
    Event,
}

impl OptionSet for ItemType {
    const ALL: &'static [Self] = &[ItemType::Class, ItemType::Event];

    fn label(&self) -> &'static str {
        match self {
            ItemType::Class => "Class",
            ItemType::Event => "Event",
        }
    }
}

pub type ClassSchedule = EntryList<ScheduleInstance>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDetails {
    pub name: String,
    pub program_id: Option<String>,
    #[serde(default)]
    pub capacity: CapacityBounds,
    pub description: String,
    #[serde(default)]
    pub schedule: ClassSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Seminar,
    Workshop,
    Tournament,
    BeltTest,
    OpenMat,
    Camp,
    Social,
}

impl OptionSet for EventType {
    const ALL: &'static [Self] = &[
        EventType::Seminar,
        EventType::Workshop,
        EventType::Tournament,
        EventType::BeltTest,
        EventType::OpenMat,
        EventType::Camp,
        EventType::Social,
    ];

    fn label(&self) -> &'static str {
        match self {
            EventType::Seminar => "Seminar",
            EventType::Workshop => "Workshop",
            EventType::Tournament => "Tournament",
            EventType::BeltTest => "Belt test",
            EventType::OpenMat => "Open mat",
            EventType::Camp => "Camp",
            EventType::Social => "Social",
        }
    }
}

/// Date range plus sessions. In single-day mode the end date always mirrors
/// the start date; fields are private so that rule cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSchedule {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_multi_day: bool,
    #[serde(default)]
    pub sessions: EntryList<EventSession>,
}

impl EventSchedule {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn is_multi_day(&self) -> bool {
        self.is_multi_day
    }

    /// In multi-day mode an end date before the new start is pulled forward
    /// to the start.
    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        if !self.is_multi_day {
            self.end_date = date;
        } else if let (Some(start), Some(end)) = (date, self.end_date) {
            if end < start {
                self.end_date = Some(start);
            }
        }
    }

    pub fn has_reversed_range(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if end < start)
    }

    pub fn set_multi_day(&mut self, multi_day: bool) {
        self.is_multi_day = multi_day;
        if !multi_day {
            self.end_date = self.start_date;
        }
    }

    /// Only meaningful in multi-day mode; the end may not precede the start.
    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        if !self.is_multi_day {
            return Err(DojoError::InvalidInput(
                "end date follows the start date for single-day events".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, date) {
            if end < start {
                return Err(DojoError::InvalidInput(format!(
                    "end date {end} is before start date {start}"
                )));
            }
        }
        self.end_date = date;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl OptionSet for DiscountKind {
    const ALL: &'static [Self] = &[DiscountKind::Percentage, DiscountKind::FixedAmount];

    fn label(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "Percentage",
            DiscountKind::FixedAmount => "Fixed amount",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EarlyBird {
    pub price: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberDiscount {
    pub kind: DiscountKind,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBilling {
    pub has_fee: bool,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_bird: Option<EarlyBird>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_discount: Option<MemberDiscount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: String,
    pub event_type: Option<EventType>,
    pub description: String,
    #[serde(default)]
    pub schedule: EventSchedule,
    #[serde(default)]
    pub billing: EventBilling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagSelection {
    pub color: Option<String>,
    #[serde(default)]
    pub tag_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    #[default]
    Unset,
    Class(ClassDetails),
    Event(EventDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub details: ItemDetails,
    #[serde(default)]
    pub tags: TagSelection,
}

impl ItemDraft {
    pub fn item_type(&self) -> Option<ItemType> {
        match self.details {
            ItemDetails::Unset => None,
            ItemDetails::Class(_) => Some(ItemType::Class),
            ItemDetails::Event(_) => Some(ItemType::Event),
        }
    }

    /// Switches the active branch. Re-selecting the current type keeps its
    /// fields; picking the other type starts that branch from defaults.
    pub fn select_type(&mut self, item_type: ItemType) {
        if self.item_type() == Some(item_type) {
            return;
        }
        self.details = match item_type {
            ItemType::Class => ItemDetails::Class(ClassDetails::default()),
            ItemType::Event => ItemDetails::Event(EventDetails::default()),
        };
    }

    pub fn class(&self) -> Option<&ClassDetails> {
        match &self.details {
            ItemDetails::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn class_mut(&mut self) -> Option<&mut ClassDetails> {
        match &mut self.details {
            ItemDetails::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn event(&self) -> Option<&EventDetails> {
        match &self.details {
            ItemDetails::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn event_mut(&mut self) -> Option<&mut EventDetails> {
        match &mut self.details {
            ItemDetails::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match &self.details {
            ItemDetails::Unset => "",
            ItemDetails::Class(class) => &class.name,
            ItemDetails::Event(event) => &event.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn single_day_mode_mirrors_start_date() {
        let mut schedule = EventSchedule::default();
        schedule.set_start_date(Some(date(8)));
        assert_eq!(schedule.end_date(), Some(date(8)));
        schedule.set_start_date(Some(date(9)));
        assert_eq!(schedule.end_date(), Some(date(9)));
    }

    #[test]
    fn multi_day_mode_decouples_dates() {
        let mut schedule = EventSchedule::default();
        schedule.set_start_date(Some(date(8)));
        schedule.set_multi_day(true);
        schedule.set_end_date(Some(date(10))).unwrap();
        schedule.set_start_date(Some(date(9)));
        assert_eq!(schedule.end_date(), Some(date(10)));

        schedule.set_multi_day(false);
        assert_eq!(schedule.end_date(), Some(date(9)));
    }

    #[test]
    fn end_date_cannot_precede_start() {
        let mut schedule = EventSchedule::default();
        schedule.set_multi_day(true);
        schedule.set_start_date(Some(date(8)));
        assert!(schedule.set_end_date(Some(date(7))).is_err());
        assert_eq!(schedule.end_date(), None);
    }

    #[test]
    fn moving_start_past_end_pulls_end_forward() {
        let mut schedule = EventSchedule::default();
        schedule.set_start_date(Some(date(10)));
        schedule.set_multi_day(true);
        schedule.set_end_date(Some(date(12))).unwrap();

        schedule.set_start_date(Some(date(20)));
        assert_eq!(schedule.start_date(), Some(date(20)));
        assert_eq!(schedule.end_date(), Some(date(20)));
        assert!(!schedule.has_reversed_range());

        schedule.set_start_date(Some(date(11)));
        assert_eq!(schedule.end_date(), Some(date(20)));
    }

    #[test]
    fn reversed_range_from_storage_is_detected() {
        let schedule: EventSchedule = serde_json::from_str(
            r#"{"start_date":"2025-03-20","end_date":"2025-03-12","is_multi_day":true}"#,
        )
        .unwrap();
        assert!(schedule.has_reversed_range());
    }

    #[test]
    fn end_date_is_locked_in_single_day_mode() {
        let mut schedule = EventSchedule::default();
        schedule.set_start_date(Some(date(8)));
        assert!(schedule.set_end_date(Some(date(12))).is_err());
        assert_eq!(schedule.end_date(), Some(date(8)));
    }

    #[test]
    fn selecting_same_type_keeps_fields() {
        let mut draft = ItemDraft::default();
        draft.select_type(ItemType::Class);
        draft.class_mut().unwrap().name = "Fundamentals".into();
        draft.select_type(ItemType::Class);
        assert_eq!(draft.name(), "Fundamentals");

        draft.select_type(ItemType::Event);
        assert_eq!(draft.item_type(), Some(ItemType::Event));
        assert_eq!(draft.name(), "");
        assert!(draft.class().is_none());
    }
}
