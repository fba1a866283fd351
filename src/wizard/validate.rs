//! Step completeness predicates and field-level issues.
//!
//! Predicates are pure functions of the draft. The basics and schedule
//! families are written once against small traits so class, event, and
//! membership steps share them.

use std::fmt;

use crate::domain::entry_list::EntryList;
use crate::domain::item::{
    ClassDetails, ClassSchedule, EventBilling, EventDetails, EventSchedule, ItemDraft,
};
use crate::domain::membership::{
    ClassAccess, ContractTerms, LimitType, MembershipDraft, MembershipType,
};
use crate::domain::schedule::ScheduleEntry;
use crate::wizard::step::{ItemStep, MembershipStep};

/// Fields that can carry an inline validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ItemType,
    Name,
    Selection,
    Description,
    Entries,
    StartDate,
    EndDate,
    Price,
    LimitCount,
    Classes,
    MembershipType,
    MonthlyFee,
    ClassesIncluded,
    PunchcardPrice,
    CancellationFee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: Field,
    pub message: &'static str,
}

impl FieldIssue {
    const fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Name/selection/description triple shared by every basics step.
pub trait BasicsSlice {
    fn name(&self) -> &str;
    fn has_selection(&self) -> bool;
    fn description(&self) -> &str;
    fn selection_message(&self) -> &'static str;
}

impl BasicsSlice for ClassDetails {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_selection(&self) -> bool {
        self.program_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn selection_message(&self) -> &'static str {
        "Select a program"
    }
}

impl BasicsSlice for EventDetails {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_selection(&self) -> bool {
        self.event_type.is_some()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn selection_message(&self) -> &'static str {
        "Select an event type"
    }
}

impl BasicsSlice for MembershipDraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_selection(&self) -> bool {
        self.membership_type.is_some()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn selection_message(&self) -> &'static str {
        "Select a membership type"
    }
}

pub fn basics_valid<B: BasicsSlice + ?Sized>(basics: &B) -> bool {
    basics_issues(basics).is_empty()
}

pub fn basics_issues<B: BasicsSlice + ?Sized>(basics: &B) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if basics.name().trim().is_empty() {
        issues.push(FieldIssue::new(Field::Name, "Name is required"));
    }
    if !basics.has_selection() {
        issues.push(FieldIssue::new(Field::Selection, basics.selection_message()));
    }
    if basics.description().trim().is_empty() {
        issues.push(FieldIssue::new(Field::Description, "Description is required"));
    }
    issues
}

/// Non-empty, and every entry has a staff member and a non-zero duration.
pub fn entry_list_valid<E: ScheduleEntry>(entries: &EntryList<E>) -> bool {
    !entries.is_empty() && entries.all_complete()
}

fn entry_list_issues<E: ScheduleEntry>(entries: &EntryList<E>) -> Vec<FieldIssue> {
    if entries.is_empty() {
        vec![FieldIssue::new(Field::Entries, "Add at least one session")]
    } else if !entries.all_complete() {
        vec![FieldIssue::new(
            Field::Entries,
            "Every session needs a staff member and a duration",
        )]
    } else {
        Vec::new()
    }
}

pub fn class_schedule_valid(schedule: &ClassSchedule) -> bool {
    entry_list_valid(schedule)
}

pub fn event_schedule_valid(schedule: &EventSchedule) -> bool {
    event_schedule_issues(schedule).is_empty()
}

fn event_schedule_issues(schedule: &EventSchedule) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if schedule.start_date().is_none() {
        issues.push(FieldIssue::new(Field::StartDate, "Start date is required"));
    }
    if schedule.has_reversed_range() {
        issues.push(FieldIssue::new(Field::EndDate, "End date cannot be before the start date"));
    }
    issues.extend(entry_list_issues(&schedule.sessions));
    if schedule.sessions.iter().any(|session| session.date.is_none()) {
        issues.push(FieldIssue::new(Field::Entries, "Every session needs a date"));
    }
    issues
}

/// Optional early-bird and member-discount blocks never block advancing.
pub fn event_billing_valid(billing: &EventBilling) -> bool {
    !billing.has_fee || billing.price.is_some_and(|price| price > 0.0)
}

fn event_billing_issues(billing: &EventBilling) -> Vec<FieldIssue> {
    if event_billing_valid(billing) {
        Vec::new()
    } else {
        vec![FieldIssue::new(Field::Price, "Enter a price greater than zero")]
    }
}

pub fn class_access_valid(access: &ClassAccess) -> bool {
    class_access_issues(access).is_empty()
}

fn class_access_issues(access: &ClassAccess) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    let limit_ok = match access.limit_type {
        LimitType::Unlimited => true,
        LimitType::Limited => access.limit_count.is_some_and(|count| count > 0),
    };
    if !limit_ok {
        issues.push(FieldIssue::new(
            Field::LimitCount,
            "Enter how many classes are included",
        ));
    }
    if access.class_ids.is_empty() {
        issues.push(FieldIssue::new(Field::Classes, "Select at least one class"));
    }
    issues
}

pub fn payment_valid(draft: &MembershipDraft) -> bool {
    payment_issues(draft).is_empty()
}

fn payment_issues(draft: &MembershipDraft) -> Vec<FieldIssue> {
    let fees = &draft.fees;
    match draft.membership_type {
        None => vec![FieldIssue::new(
            Field::MembershipType,
            "Select a membership type first",
        )],
        Some(MembershipType::Trial) => Vec::new(),
        Some(MembershipType::Punchcard) => {
            let mut issues = Vec::new();
            if !fees.classes_included.is_some_and(|count| count >= 1) {
                issues.push(FieldIssue::new(
                    Field::ClassesIncluded,
                    "A punchcard must include at least one class",
                ));
            }
            if fees.punchcard_price.is_none() {
                issues.push(FieldIssue::new(
                    Field::PunchcardPrice,
                    "Punchcard price is required",
                ));
            }
            issues
        }
        Some(MembershipType::Standard) => {
            if fees.monthly_fee.is_some_and(|fee| fee >= 0.0) {
                Vec::new()
            } else {
                vec![FieldIssue::new(Field::MonthlyFee, "Recurring fee is required")]
            }
        }
    }
}

pub fn contract_valid(contract: &ContractTerms) -> bool {
    contract_issues(contract).is_empty()
}

fn contract_issues(contract: &ContractTerms) -> Vec<FieldIssue> {
    if contract.cancellation_fee.is_some_and(|fee| fee < 0.0) {
        vec![FieldIssue::new(
            Field::CancellationFee,
            "Cancellation fee cannot be negative",
        )]
    } else {
        Vec::new()
    }
}

pub fn item_step_valid(step: ItemStep, draft: &ItemDraft) -> bool {
    item_step_issues(step, draft).is_empty()
}

/// Every unmet condition of `step`, independent of touched state.
pub fn item_step_issues(step: ItemStep, draft: &ItemDraft) -> Vec<FieldIssue> {
    match step {
        ItemStep::TypeSelection => {
            if draft.item_type().is_some() {
                Vec::new()
            } else {
                vec![FieldIssue::new(Field::ItemType, "Choose a class or an event")]
            }
        }
        ItemStep::ClassBasics => branch_issues(draft.class().map(basics_issues)),
        ItemStep::ClassSchedule => {
            branch_issues(draft.class().map(|class| entry_list_issues(&class.schedule)))
        }
        ItemStep::EventBasics => branch_issues(draft.event().map(basics_issues)),
        ItemStep::EventSchedule => {
            branch_issues(draft.event().map(|event| event_schedule_issues(&event.schedule)))
        }
        ItemStep::EventBilling => {
            branch_issues(draft.event().map(|event| event_billing_issues(&event.billing)))
        }
        ItemStep::Tags | ItemStep::Success => Vec::new(),
    }
}

// A step whose branch is not active cannot be completed.
fn branch_issues(issues: Option<Vec<FieldIssue>>) -> Vec<FieldIssue> {
    issues.unwrap_or_else(|| {
        vec![FieldIssue::new(Field::ItemType, "Choose a class or an event")]
    })
}

pub fn membership_step_valid(step: MembershipStep, draft: &MembershipDraft) -> bool {
    membership_step_issues(step, draft).is_empty()
}

pub fn membership_step_issues(step: MembershipStep, draft: &MembershipDraft) -> Vec<FieldIssue> {
    match step {
        MembershipStep::Basics => basics_issues(draft),
        MembershipStep::ClassAccess => class_access_issues(&draft.class_access),
        MembershipStep::Payment => payment_issues(draft),
        MembershipStep::Contract => contract_issues(&draft.contract),
        MembershipStep::Success => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemType;
    use crate::domain::schedule::{EventSession, ScheduleInstance, SessionDuration};
    use chrono::NaiveDate;

    fn class_draft() -> ItemDraft {
        let mut draft = ItemDraft::default();
        draft.select_type(ItemType::Class);
        draft
    }

    #[test]
    fn basics_need_all_three_fields() {
        let mut draft = class_draft();
        assert!(!item_step_valid(ItemStep::ClassBasics, &draft));
        let class = draft.class_mut().unwrap();
        class.name = "Fundamentals".into();
        class.program_id = Some("bjj-adult".into());
        assert!(!item_step_valid(ItemStep::ClassBasics, &draft));
        draft.class_mut().unwrap().description = "Core techniques".into();
        assert!(item_step_valid(ItemStep::ClassBasics, &draft));
    }

    #[test]
    fn whitespace_name_is_not_a_name() {
        let class = ClassDetails {
            name: "   ".into(),
            program_id: Some("judo".into()),
            description: "Throws".into(),
            ..ClassDetails::default()
        };
        let issues = basics_issues(&class);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, Field::Name);
    }

    #[test]
    fn class_schedule_requires_complete_entries() {
        let mut draft = class_draft();
        assert!(!item_step_valid(ItemStep::ClassSchedule, &draft));
        let schedule = &mut draft.class_mut().unwrap().schedule;
        schedule.append(ScheduleInstance::new("instance-1")).unwrap();
        assert!(!item_step_valid(ItemStep::ClassSchedule, &draft));
        draft
            .class_mut()
            .unwrap()
            .schedule
            .update("instance-1", |entry| entry.staff_id = "staff-1".into());
        assert!(item_step_valid(ItemStep::ClassSchedule, &draft));
        draft
            .class_mut()
            .unwrap()
            .schedule
            .update("instance-1", |entry| entry.duration = SessionDuration::new(0, 0));
        assert!(!item_step_valid(ItemStep::ClassSchedule, &draft));
    }

    #[test]
    fn event_schedule_requires_start_and_session_dates() {
        let mut schedule = EventSchedule::default();
        let mut session = EventSession::new("session-1", None);
        session.staff_id = "staff-2".into();
        schedule.sessions.append(session).unwrap();
        assert!(!event_schedule_valid(&schedule));

        schedule.set_start_date(NaiveDate::from_ymd_opt(2025, 5, 3));
        assert!(!event_schedule_valid(&schedule));

        schedule
            .sessions
            .update("session-1", |s| s.date = NaiveDate::from_ymd_opt(2025, 5, 3));
        assert!(event_schedule_valid(&schedule));
    }

    #[test]
    fn reversed_event_range_blocks_the_schedule_step() {
        let mut schedule: EventSchedule = serde_json::from_str(
            r#"{"start_date":"2025-06-20","end_date":"2025-06-12","is_multi_day":true}"#,
        )
        .unwrap();
        let mut session = EventSession::new("session-1", NaiveDate::from_ymd_opt(2025, 6, 20));
        session.staff_id = "staff-2".into();
        schedule.sessions.append(session).unwrap();

        let issues = event_schedule_issues(&schedule);
        assert!(issues.iter().any(|issue| issue.field == Field::EndDate));
        assert!(!event_schedule_valid(&schedule));

        schedule.set_start_date(NaiveDate::from_ymd_opt(2025, 6, 20));
        assert_eq!(schedule.end_date(), NaiveDate::from_ymd_opt(2025, 6, 20));
        assert!(event_schedule_valid(&schedule));
    }

    #[test]
    fn billing_only_checks_price_when_fee_is_on() {
        let mut billing = EventBilling::default();
        assert!(event_billing_valid(&billing));
        billing.has_fee = true;
        assert!(!event_billing_valid(&billing));
        billing.price = Some(0.0);
        assert!(!event_billing_valid(&billing));
        billing.price = Some(45.0);
        assert!(event_billing_valid(&billing));
    }

    #[test]
    fn class_access_rules() {
        let mut access = ClassAccess::default();
        assert!(!class_access_valid(&access));
        access.class_ids.insert("class-fundamentals".into());
        assert!(class_access_valid(&access));
        access.limit_type = LimitType::Limited;
        assert!(!class_access_valid(&access));
        access.limit_count = Some(0);
        assert!(!class_access_valid(&access));
        access.limit_count = Some(8);
        assert!(class_access_valid(&access));
    }

    #[test]
    fn payment_rules_per_membership_type() {
        let mut draft = MembershipDraft::default();
        assert!(!payment_valid(&draft));

        draft.membership_type = Some(MembershipType::Trial);
        assert!(payment_valid(&draft));

        draft.membership_type = Some(MembershipType::Standard);
        assert!(!payment_valid(&draft));
        draft.fees.monthly_fee = Some(0.0);
        assert!(payment_valid(&draft));

        draft.membership_type = Some(MembershipType::Punchcard);
        assert!(!payment_valid(&draft));
        draft.fees.classes_included = Some(10);
        assert!(!payment_valid(&draft));
        draft.fees.punchcard_price = Some(120.0);
        assert!(payment_valid(&draft));
    }

    #[test]
    fn inactive_branch_steps_are_never_valid() {
        let draft = class_draft();
        assert!(!item_step_valid(ItemStep::EventBilling, &draft));
        assert!(item_step_valid(ItemStep::Tags, &draft));
    }

    #[test]
    fn negative_cancellation_fee_blocks_contract() {
        let mut contract = ContractTerms::default();
        assert!(contract_valid(&contract));
        contract.cancellation_fee = Some(-5.0);
        assert!(!contract_valid(&contract));
    }
}
