use crate::cli::forms::{FieldPrompter, Flow, FormEnv, StepForms};
use crate::domain::membership::{
    AutoRenewal, BillingFrequency, ChargeTiming, ContractLength, LimitType, MembershipType,
    PlanStatus, StartDatePolicy,
};
use crate::wizard::{Field, MembershipStep, Sequencer, TouchedFields};

use super::{choose_lookup_many, choose_option, count, money};

impl StepForms for MembershipStep {
    fn fill(
        wizard: &mut Sequencer<Self>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        touched: &mut TouchedFields,
    ) -> Flow<()> {
        let mut draft = wizard.data().clone();
        match wizard.step() {
            MembershipStep::Basics => {
                draft.name = prompter.text("Plan name", &draft.name)?;
                touched.touch(Field::Name);
                let previous = draft.membership_type;
                draft.membership_type = Some(choose_option::<MembershipType>(
                    prompter,
                    "Membership type",
                    previous,
                )?);
                touched.touch(Field::Selection);
                if previous.is_some() && previous != draft.membership_type {
                    prompter.notice("Membership type changed; review the pricing step.");
                }
                draft.status = choose_option::<PlanStatus>(prompter, "Status", Some(draft.status))?;
                draft.description = prompter.text("Description", &draft.description)?;
                touched.touch(Field::Description);
            }
            MembershipStep::ClassAccess => {
                let access = &mut draft.class_access;
                access.limit_type =
                    choose_option::<LimitType>(prompter, "Class limit", Some(access.limit_type))?;
                access.limit_count = match access.limit_type {
                    LimitType::Unlimited => None,
                    LimitType::Limited => {
                        touched.touch(Field::LimitCount);
                        count(prompter, "Classes per billing period", access.limit_count)?
                    }
                };
                access.class_ids = choose_lookup_many(
                    prompter,
                    "Included classes",
                    env.references.classes.as_ref(),
                    &access.class_ids,
                )?;
                touched.touch(Field::Classes);
            }
            MembershipStep::Payment => {
                let fees = &mut draft.fees;
                match draft.membership_type {
                    None => {
                        touched.touch(Field::MembershipType);
                        prompter.notice("Choose a membership type on the first step.");
                        return Ok(());
                    }
                    Some(MembershipType::Standard) => {
                        fees.monthly_fee = money(prompter, "Recurring fee", fees.monthly_fee)?;
                        touched.touch(Field::MonthlyFee);
                        fees.billing_frequency = choose_option::<BillingFrequency>(
                            prompter,
                            "Billing frequency",
                            Some(fees.billing_frequency),
                        )?;
                        draft.prorate =
                            prompter.yes_no("Prorate the first payment?", draft.prorate)?;
                    }
                    Some(MembershipType::Punchcard) => {
                        fees.classes_included =
                            count(prompter, "Classes included", fees.classes_included)?;
                        touched.touch(Field::ClassesIncluded);
                        fees.punchcard_price =
                            money(prompter, "Punchcard price", fees.punchcard_price)?;
                        touched.touch(Field::PunchcardPrice);
                    }
                    Some(MembershipType::Trial) => {
                        prompter.notice("Trial memberships are free.");
                    }
                }
                fees.signup_fee = money(prompter, "Signup fee (blank for none)", fees.signup_fee)?;
                if fees.signup_fee.is_some() {
                    fees.signup_fee_timing = choose_option::<ChargeTiming>(
                        prompter,
                        "Charge the signup fee",
                        Some(fees.signup_fee_timing),
                    )?;
                }
                draft.start_date_policy = choose_option::<StartDatePolicy>(
                    prompter,
                    "Membership starts",
                    Some(draft.start_date_policy),
                )?;
            }
            MembershipStep::Contract => {
                let contract = &mut draft.contract;
                contract.length =
                    choose_option::<ContractLength>(prompter, "Contract length", Some(contract.length))?;
                contract.auto_renewal = choose_option::<AutoRenewal>(
                    prompter,
                    "At the end of the term",
                    Some(contract.auto_renewal),
                )?;
                contract.cancellation_fee = money(
                    prompter,
                    "Cancellation fee (blank for none)",
                    contract.cancellation_fee,
                )?;
                touched.touch(Field::CancellationFee);
                contract.holds_per_year =
                    count(prompter, "Holds per year (blank for none)", contract.holds_per_year)?;
            }
            MembershipStep::Success => return Ok(()),
        }
        wizard.update_data(|current| *current = draft);
        Ok(())
    }
}
