//! Draft record for the membership-plan wizard.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::common::OptionSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    #[default]
    Active,
    Inactive,
}

impl OptionSet for PlanStatus {
    const ALL: &'static [Self] = &[PlanStatus::Active, PlanStatus::Inactive];

    fn label(&self) -> &'static str {
        match self {
            PlanStatus::Active => "Active",
            PlanStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    Standard,
    Trial,
    Punchcard,
}

impl OptionSet for MembershipType {
    const ALL: &'static [Self] = &[
        MembershipType::Standard,
        MembershipType::Trial,
        MembershipType::Punchcard,
    ];

    fn label(&self) -> &'static str {
        match self {
            MembershipType::Standard => "Standard",
            MembershipType::Trial => "Trial",
            MembershipType::Punchcard => "Punchcard",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitType {
    #[default]
    Unlimited,
    Limited,
}

impl OptionSet for LimitType {
    const ALL: &'static [Self] = &[LimitType::Unlimited, LimitType::Limited];

    fn label(&self) -> &'static str {
        match self {
            LimitType::Unlimited => "Unlimited classes",
            LimitType::Limited => "Limited classes",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAccess {
    pub limit_type: LimitType,
    pub limit_count: Option<u32>,
    #[serde(default)]
    pub class_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeTiming {
    #[default]
    AtSignup,
    WithFirstPayment,
}

impl OptionSet for ChargeTiming {
    const ALL: &'static [Self] = &[ChargeTiming::AtSignup, ChargeTiming::WithFirstPayment];

    fn label(&self) -> &'static str {
        match self {
            ChargeTiming::AtSignup => "At signup",
            ChargeTiming::WithFirstPayment => "With first payment",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingFrequency {
    /// Unit used in price summaries, e.g. `$150 / month`.
    pub fn unit(&self) -> &'static str {
        match self {
            BillingFrequency::Weekly => "week",
            BillingFrequency::Monthly => "month",
            BillingFrequency::Quarterly => "quarter",
            BillingFrequency::Yearly => "year",
        }
    }
}

impl OptionSet for BillingFrequency {
    const ALL: &'static [Self] = &[
        BillingFrequency::Weekly,
        BillingFrequency::Monthly,
        BillingFrequency::Quarterly,
        BillingFrequency::Yearly,
    ];

    fn label(&self) -> &'static str {
        match self {
            BillingFrequency::Weekly => "Weekly",
            BillingFrequency::Monthly => "Monthly",
            BillingFrequency::Quarterly => "Quarterly",
            BillingFrequency::Yearly => "Yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipFees {
    pub signup_fee: Option<f64>,
    #[serde(default)]
    pub signup_fee_timing: ChargeTiming,
    pub monthly_fee: Option<f64>,
    #[serde(default)]
    pub billing_frequency: BillingFrequency,
    pub classes_included: Option<u32>,
    pub punchcard_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartDatePolicy {
    #[default]
    PurchaseDate,
    FirstClass,
    MemberChooses,
}

impl OptionSet for StartDatePolicy {
    const ALL: &'static [Self] = &[
        StartDatePolicy::PurchaseDate,
        StartDatePolicy::FirstClass,
        StartDatePolicy::MemberChooses,
    ];

    fn label(&self) -> &'static str {
        match self {
            StartDatePolicy::PurchaseDate => "On purchase date",
            StartDatePolicy::FirstClass => "On first class attended",
            StartDatePolicy::MemberChooses => "Member chooses",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractLength {
    #[default]
    MonthToMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl OptionSet for ContractLength {
    const ALL: &'static [Self] = &[
        ContractLength::MonthToMonth,
        ContractLength::ThreeMonths,
        ContractLength::SixMonths,
        ContractLength::TwelveMonths,
    ];

    fn label(&self) -> &'static str {
        match self {
            ContractLength::MonthToMonth => "Month to month",
            ContractLength::ThreeMonths => "3 months",
            ContractLength::SixMonths => "6 months",
            ContractLength::TwelveMonths => "12 months",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRenewal {
    #[default]
    MonthToMonth,
    SameTerm,
    NoRenewal,
}

impl OptionSet for AutoRenewal {
    const ALL: &'static [Self] = &[
        AutoRenewal::MonthToMonth,
        AutoRenewal::SameTerm,
        AutoRenewal::NoRenewal,
    ];

    fn label(&self) -> &'static str {
        match self {
            AutoRenewal::MonthToMonth => "Renew month to month",
            AutoRenewal::SameTerm => "Renew for the same term",
            AutoRenewal::NoRenewal => "Do not renew",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub length: ContractLength,
    pub auto_renewal: AutoRenewal,
    pub cancellation_fee: Option<f64>,
    pub holds_per_year: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipDraft {
    pub name: String,
    #[serde(default)]
    pub status: PlanStatus,
    pub membership_type: Option<MembershipType>,
    pub description: String,
    #[serde(default)]
    pub class_access: ClassAccess,
    #[serde(default)]
    pub fees: MembershipFees,
    #[serde(default)]
    pub start_date_policy: StartDatePolicy,
    #[serde(default)]
    pub prorate: bool,
    #[serde(default)]
    pub contract: ContractTerms,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_active_and_unlimited() {
        let draft = MembershipDraft::default();
        assert_eq!(draft.status, PlanStatus::Active);
        assert_eq!(draft.class_access.limit_type, LimitType::Unlimited);
        assert_eq!(draft.fees.billing_frequency, BillingFrequency::Monthly);
        assert!(draft.membership_type.is_none());
    }

    #[test]
    fn option_labels_follow_declaration_order() {
        assert_eq!(
            MembershipType::labels(),
            vec!["Standard", "Trial", "Punchcard"]
        );
        assert_eq!(MembershipType::Punchcard.position(), Some(2));
    }
}
