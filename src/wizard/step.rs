//! Step identifiers and the paths through each wizard.

use std::fmt;

use crate::domain::item::{ItemDraft, ItemType};
use crate::domain::membership::MembershipDraft;
use crate::wizard::validate::{self, FieldIssue};

/// Contract between a step enum and the generic sequencer.
///
/// A flow names its first and terminal steps, derives the ordered path from
/// the current draft (so branching is a function of the data), and answers
/// whether a step is complete.
pub trait WizardFlow: Copy + Eq + fmt::Debug + 'static {
    type Draft: Clone + Default + PartialEq + fmt::Debug;

    const FIRST: Self;
    const SUCCESS: Self;

    fn path(draft: &Self::Draft) -> &'static [Self];

    /// Unmet conditions of this step; empty exactly when the step is complete.
    fn issues(self, draft: &Self::Draft) -> Vec<FieldIssue>;

    fn is_valid(self, draft: &Self::Draft) -> bool {
        self.issues(draft).is_empty()
    }

    fn title(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStep {
    TypeSelection,
    ClassBasics,
    ClassSchedule,
    EventBasics,
    EventSchedule,
    EventBilling,
    Tags,
    Success,
}

const UNSET_PATH: &[ItemStep] = &[ItemStep::TypeSelection];

const CLASS_PATH: &[ItemStep] = &[
    ItemStep::TypeSelection,
    ItemStep::ClassBasics,
    ItemStep::ClassSchedule,
    ItemStep::Tags,
    ItemStep::Success,
];

const EVENT_PATH: &[ItemStep] = &[
    ItemStep::TypeSelection,
    ItemStep::EventBasics,
    ItemStep::EventSchedule,
    ItemStep::EventBilling,
    ItemStep::Tags,
    ItemStep::Success,
];

impl WizardFlow for ItemStep {
    type Draft = ItemDraft;

    const FIRST: Self = ItemStep::TypeSelection;
    const SUCCESS: Self = ItemStep::Success;

    fn path(draft: &ItemDraft) -> &'static [Self] {
        match draft.item_type() {
            None => UNSET_PATH,
            Some(ItemType::Class) => CLASS_PATH,
            Some(ItemType::Event) => EVENT_PATH,
        }
    }

    fn issues(self, draft: &ItemDraft) -> Vec<FieldIssue> {
        validate::item_step_issues(self, draft)
    }

    fn title(self) -> &'static str {
        match self {
            ItemStep::TypeSelection => "Choose what to add",
            ItemStep::ClassBasics => "Class details",
            ItemStep::ClassSchedule => "Class schedule",
            ItemStep::EventBasics => "Event details",
            ItemStep::EventSchedule => "Event schedule",
            ItemStep::EventBilling => "Event pricing",
            ItemStep::Tags => "Tags and color",
            ItemStep::Success => "Saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipStep {
    Basics,
    ClassAccess,
    Payment,
    Contract,
    Success,
}

const MEMBERSHIP_PATH: &[MembershipStep] = &[
    MembershipStep::Basics,
    MembershipStep::ClassAccess,
    MembershipStep::Payment,
    MembershipStep::Contract,
    MembershipStep::Success,
];

impl WizardFlow for MembershipStep {
    type Draft = MembershipDraft;

    const FIRST: Self = MembershipStep::Basics;
    const SUCCESS: Self = MembershipStep::Success;

    fn path(_draft: &MembershipDraft) -> &'static [Self] {
        MEMBERSHIP_PATH
    }

    fn issues(self, draft: &MembershipDraft) -> Vec<FieldIssue> {
        validate::membership_step_issues(self, draft)
    }

    fn title(self) -> &'static str {
        match self {
            MembershipStep::Basics => "Membership details",
            MembershipStep::ClassAccess => "Class access",
            MembershipStep::Payment => "Pricing",
            MembershipStep::Contract => "Contract terms",
            MembershipStep::Success => "Saved",
        }
    }
}
