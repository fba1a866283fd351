//! Property checks for step gating: "Next" is enabled exactly when the
//! current step's rules hold, nothing is in flight, and the wizard has not
//! reached its terminal step.
//!
//! The expected answers are computed here from the generated inputs, not by
//! calling the crate's validators.

use chrono::{Duration, NaiveDate};
use dojo_admin::domain::common::OptionSet;
use dojo_admin::domain::entry_list::EntryList;
use dojo_admin::domain::item::{EventType, ItemDraft, ItemType};
use dojo_admin::domain::membership::{LimitType, MembershipDraft, MembershipType};
use dojo_admin::domain::schedule::{EventSession, ScheduleInstance, SessionDuration};
use dojo_admin::wizard::{ItemStep, ItemWizard, MembershipStep, MembershipWizard};
use proptest::prelude::*;

const MEMBERSHIP_STEPS: [MembershipStep; 4] = [
    MembershipStep::Basics,
    MembershipStep::ClassAccess,
    MembershipStep::Payment,
    MembershipStep::Contract,
];

const ITEM_STEPS: [ItemStep; 7] = [
    ItemStep::TypeSelection,
    ItemStep::ClassBasics,
    ItemStep::ClassSchedule,
    ItemStep::EventBasics,
    ItemStep::EventSchedule,
    ItemStep::EventBilling,
    ItemStep::Tags,
];

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + Duration::days(i64::from(offset))
}

#[derive(Debug, Clone)]
struct EntryCase {
    staff: String,
    hours: u8,
    minutes: u8,
    date: Option<u32>,
}

impl EntryCase {
    fn complete(&self) -> bool {
        !blank(&self.staff) && (self.hours > 0 || self.minutes > 0)
    }
}

fn entry_case() -> impl Strategy<Value = EntryCase> {
    (
        "[ a-z]{0,2}",
        0u8..2,
        prop::sample::select(vec![0u8, 30]),
        prop::option::of(0u32..20),
    )
        .prop_map(|(staff, hours, minutes, date)| EntryCase {
            staff,
            hours,
            minutes,
            date,
        })
}

#[derive(Debug, Clone)]
struct ItemCase {
    kind: usize,
    name: String,
    description: String,
    program: Option<String>,
    event_type: Option<usize>,
    entries: Vec<EntryCase>,
    start: Option<u32>,
    multi_day: bool,
    end_offset: Option<u32>,
    has_fee: bool,
    price: Option<f64>,
}

prop_compose! {
    fn item_case()(
        kind in 0usize..3,
        (name, description) in ("[ a-z]{0,4}", "[ a-z]{0,4}"),
        program in prop::option::of("[ a-z]{0,3}"),
        event_type in prop::option::of(0usize..7),
        entries in prop::collection::vec(entry_case(), 0..3),
        start in prop::option::of(0u32..20),
        (multi_day, end_offset) in (any::<bool>(), prop::option::of(0u32..5)),
        (has_fee, price) in (any::<bool>(), prop::option::of(-10.0f64..100.0)),
    ) -> ItemCase {
        ItemCase {
            kind, name, description, program, event_type, entries, start,
            multi_day, end_offset, has_fee, price,
        }
    }
}

impl ItemCase {
    fn draft(&self) -> ItemDraft {
        let mut draft = ItemDraft::default();
        match self.kind {
            1 => {
                draft.select_type(ItemType::Class);
                if let Some(class) = draft.class_mut() {
                    class.name = self.name.clone();
                    class.description = self.description.clone();
                    class.program_id = self.program.clone();
                    class.schedule = EntryList::from_entries(
                        self.entries
                            .iter()
                            .enumerate()
                            .map(|(index, case)| {
                                let mut instance = ScheduleInstance::new(format!("instance-{index}"));
                                instance.staff_id = case.staff.clone();
                                instance.duration = SessionDuration::new(case.hours, case.minutes);
                                instance
                            })
                            .collect(),
                    );
                }
            }
            2 => {
                draft.select_type(ItemType::Event);
                if let Some(event) = draft.event_mut() {
                    event.name = self.name.clone();
                    event.description = self.description.clone();
                    event.event_type = self
                        .event_type
                        .and_then(|index| EventType::ALL.get(index).copied());
                    event.schedule.set_multi_day(self.multi_day);
                    event.schedule.set_start_date(self.start.map(day));
                    if let (true, Some(start), Some(offset)) =
                        (self.multi_day, self.start, self.end_offset)
                    {
                        event
                            .schedule
                            .set_end_date(Some(day(start + offset)))
                            .unwrap();
                    }
                    event.schedule.sessions = EntryList::from_entries(
                        self.entries
                            .iter()
                            .enumerate()
                            .map(|(index, case)| {
                                let mut session =
                                    EventSession::new(format!("session-{index}"), case.date.map(day));
                                session.staff_id = case.staff.clone();
                                session.duration = SessionDuration::new(case.hours, case.minutes);
                                session
                            })
                            .collect(),
                    );
                    event.billing.has_fee = self.has_fee;
                    event.billing.price = self.price;
                }
            }
            _ => {}
        }
        draft
    }

    fn entries_ok(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(EntryCase::complete)
    }

    fn basics_ok(&self, has_selection: bool) -> bool {
        !blank(&self.name) && has_selection && !blank(&self.description)
    }

    fn expected(&self, step: ItemStep) -> bool {
        let is_class = self.kind == 1;
        let is_event = self.kind == 2;
        match step {
            ItemStep::TypeSelection => is_class || is_event,
            ItemStep::ClassBasics => {
                is_class && self.basics_ok(self.program.as_deref().is_some_and(|id| !blank(id)))
            }
            ItemStep::ClassSchedule => is_class && self.entries_ok(),
            ItemStep::EventBasics => is_event && self.basics_ok(self.event_type.is_some()),
            ItemStep::EventSchedule => {
                is_event
                    && self.start.is_some()
                    && self.entries_ok()
                    && self.entries.iter().all(|case| case.date.is_some())
            }
            ItemStep::EventBilling => {
                is_event && (!self.has_fee || self.price.is_some_and(|price| price > 0.0))
            }
            ItemStep::Tags => true,
            ItemStep::Success => false,
        }
    }
}

prop_compose! {
    fn membership_draft()(
        name in "[ a-z]{0,6}",
        description in "[ a-z]{0,6}",
        type_index in 0usize..4,
        limited in any::<bool>(),
        limit_count in prop::option::of(0u32..12),
        class_ids in prop::collection::btree_set("class-[a-c]", 0..3),
        monthly_fee in prop::option::of(-20.0f64..200.0),
        classes_included in prop::option::of(0u32..20),
        punchcard_price in prop::option::of(-20.0f64..200.0),
        cancellation_fee in prop::option::of(-20.0f64..200.0),
    ) -> MembershipDraft {
        let mut draft = MembershipDraft {
            name,
            description,
            membership_type: MembershipType::ALL.get(type_index).copied(),
            ..MembershipDraft::default()
        };
        draft.class_access.limit_type = if limited { LimitType::Limited } else { LimitType::Unlimited };
        draft.class_access.limit_count = limit_count;
        draft.class_access.class_ids = class_ids;
        draft.fees.monthly_fee = monthly_fee;
        draft.fees.classes_included = classes_included;
        draft.fees.punchcard_price = punchcard_price;
        draft.contract.cancellation_fee = cancellation_fee;
        draft
    }
}

fn expected_membership(step: MembershipStep, draft: &MembershipDraft) -> bool {
    match step {
        MembershipStep::Basics => {
            !blank(&draft.name) && draft.membership_type.is_some() && !blank(&draft.description)
        }
        MembershipStep::ClassAccess => {
            let access = &draft.class_access;
            let limit_ok = access.limit_type == LimitType::Unlimited
                || access.limit_count.is_some_and(|count| count > 0);
            limit_ok && !access.class_ids.is_empty()
        }
        MembershipStep::Payment => match draft.membership_type {
            None => false,
            Some(MembershipType::Trial) => true,
            Some(MembershipType::Punchcard) => {
                draft.fees.classes_included.is_some_and(|count| count >= 1)
                    && draft.fees.punchcard_price.is_some()
            }
            Some(MembershipType::Standard) => draft.fees.monthly_fee.is_some_and(|fee| fee >= 0.0),
        },
        MembershipStep::Contract => !draft.contract.cancellation_fee.is_some_and(|fee| fee < 0.0),
        MembershipStep::Success => false,
    }
}

proptest! {
    #[test]
    fn item_next_matches_the_step_rules(case in item_case(), step_index in 0usize..7) {
        let step = ITEM_STEPS[step_index];
        let mut wizard = ItemWizard::default();
        let draft = case.draft();
        wizard.update_data(|current| *current = draft);
        wizard.set_step(step);

        let expected = case.expected(step);
        prop_assert_eq!(wizard.can_advance(), expected);
        prop_assert_eq!(wizard.current_issues().is_empty(), expected);

        wizard.set_is_loading(true);
        prop_assert!(!wizard.can_advance());
    }

    #[test]
    fn membership_next_matches_the_step_rules(
        draft in membership_draft(),
        step_index in 0usize..4,
    ) {
        let step = MEMBERSHIP_STEPS[step_index];
        let expected = expected_membership(step, &draft);
        let mut wizard = MembershipWizard::default();
        wizard.update_data(|current| *current = draft);
        wizard.set_step(step);

        prop_assert_eq!(wizard.can_advance(), expected);
        prop_assert_eq!(wizard.current_issues().is_empty(), expected);

        wizard.set_is_loading(true);
        prop_assert!(!wizard.can_advance());
    }

    #[test]
    fn contract_gate_only_reads_contract_terms(
        draft in membership_draft(),
        other in membership_draft(),
    ) {
        let mut mixed = other;
        mixed.contract = draft.contract;
        let mut wizard = MembershipWizard::default();
        wizard.set_step(MembershipStep::Contract);
        wizard.update_data(|current| *current = mixed);
        prop_assert_eq!(
            wizard.can_advance(),
            expected_membership(MembershipStep::Contract, &draft)
        );
    }
}

#[test]
fn terminal_step_never_advances() {
    let mut wizard = MembershipWizard::default();
    wizard.set_step(MembershipStep::Success);
    assert!(!wizard.can_advance());
    assert!(wizard.is_complete());

    let mut wizard = ItemWizard::default();
    wizard.set_step(ItemStep::Success);
    assert!(!wizard.can_advance());
}
