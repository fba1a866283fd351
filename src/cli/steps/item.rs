use crate::cli::forms::{FieldPrompter, Flow, FormEnv, StepForms};
use crate::domain::common::{non_blank, Identifiable};
use crate::domain::item::{DiscountKind, EarlyBird, EventType, ItemType, MemberDiscount};
use crate::domain::schedule::{weekday_name, EventSession, ScheduleEntry, ScheduleInstance, WEEKDAYS};
use crate::errors::Result;
use crate::wizard::record::{instance_line, session_line};
use crate::wizard::{Field, ItemStep, Sequencer, TouchedFields};

use super::{
    choose_lookup, choose_lookup_many, choose_option, count, date, duration, money, parse_money,
    time,
};

impl StepForms for ItemStep {
    fn fill(
        wizard: &mut Sequencer<Self>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        touched: &mut TouchedFields,
    ) -> Flow<()> {
        match wizard.step() {
            ItemStep::TypeSelection => {
                let current = wizard.data().item_type();
                let choice = choose_option::<ItemType>(prompter, "What are you adding?", current)?;
                touched.touch(Field::ItemType);
                wizard.select_type(choice);
                Ok(())
            }
            ItemStep::ClassBasics => class_basics(wizard, prompter, env, touched),
            ItemStep::ClassSchedule => entry_menu::<WeeklyInstances>(wizard, prompter, env, touched),
            ItemStep::EventBasics => event_basics(wizard, prompter, touched),
            ItemStep::EventSchedule => {
                event_dates(wizard, prompter, touched)?;
                entry_menu::<EventSessions>(wizard, prompter, env, touched)
            }
            ItemStep::EventBilling => event_billing(wizard, prompter, touched),
            ItemStep::Tags => tags(wizard, prompter, env),
            ItemStep::Success => Ok(()),
        }
    }
}

fn class_basics(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    env: &FormEnv<'_>,
    touched: &mut TouchedFields,
) -> Flow<()> {
    let Some(mut class) = wizard.data().class().cloned() else {
        return Ok(());
    };
    class.name = prompter.text("Class name", &class.name)?;
    touched.touch(Field::Name);
    class.program_id = choose_lookup(
        prompter,
        "Program",
        env.references.programs.as_ref(),
        class.program_id.as_deref(),
        false,
    )?;
    touched.touch(Field::Selection);
    class.capacity.min = count(prompter, "Minimum students (blank for none)", class.capacity.min)?;
    class.capacity.max = count(prompter, "Maximum students (blank for none)", class.capacity.max)?;
    if let (Some(min), Some(max)) = (class.capacity.min, class.capacity.max) {
        if min > max {
            prompter.notice("The minimum is above the maximum; check the capacity.");
        }
    }
    class.description = prompter.text("Description", &class.description)?;
    touched.touch(Field::Description);

    wizard.update_data(|draft| {
        if let Some(current) = draft.class_mut() {
            *current = class;
        }
    });
    Ok(())
}

fn event_basics(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    touched: &mut TouchedFields,
) -> Flow<()> {
    let Some(mut event) = wizard.data().event().cloned() else {
        return Ok(());
    };
    event.name = prompter.text("Event name", &event.name)?;
    touched.touch(Field::Name);
    event.event_type = Some(choose_option::<EventType>(prompter, "Event type", event.event_type)?);
    touched.touch(Field::Selection);
    event.description = prompter.text("Description", &event.description)?;
    touched.touch(Field::Description);

    wizard.update_data(|draft| {
        if let Some(current) = draft.event_mut() {
            *current = event;
        }
    });
    Ok(())
}

fn event_dates(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    touched: &mut TouchedFields,
) -> Flow<()> {
    let Some(schedule) = wizard.data().event().map(|event| event.schedule.clone()) else {
        return Ok(());
    };
    let start = date(prompter, "Start date (YYYY-MM-DD)", schedule.start_date())?;
    touched.touch(Field::StartDate);
    wizard.update_event_schedule(|current| current.set_start_date(start));

    let multi_day = prompter.yes_no("Does the event run over several days?", schedule.is_multi_day())?;
    wizard.update_event_schedule(|current| current.set_multi_day(multi_day));
    if !multi_day {
        return Ok(());
    }

    let mut end = wizard
        .data()
        .event()
        .and_then(|event| event.schedule.end_date())
        .or(start);
    loop {
        end = date(prompter, "End date (YYYY-MM-DD)", end)?;
        let mut outcome = Ok(());
        wizard.update_event_schedule(|current| outcome = current.set_end_date(end));
        match outcome {
            Ok(()) => {
                touched.touch(Field::EndDate);
                return Ok(());
            }
            Err(err) => prompter.notice(err.to_string()),
        }
    }
}

fn event_billing(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    touched: &mut TouchedFields,
) -> Flow<()> {
    let Some(mut billing) = wizard.data().event().map(|event| event.billing) else {
        return Ok(());
    };
    billing.has_fee = prompter.yes_no("Charge a fee for this event?", billing.has_fee)?;
    if billing.has_fee {
        billing.price = money(prompter, "Price", billing.price)?;
        touched.touch(Field::Price);

        let early_bird = prompter.yes_no("Offer an early-bird price?", billing.early_bird.is_some())?;
        billing.early_bird = if early_bird {
            let current = billing.early_bird.unwrap_or_default();
            Some(EarlyBird {
                price: money(prompter, "Early-bird price", current.price)?,
                deadline: date(prompter, "Early-bird deadline (YYYY-MM-DD)", current.deadline)?,
            })
        } else {
            None
        };

        let discount = prompter.yes_no("Offer a member discount?", billing.member_discount.is_some())?;
        billing.member_discount = if discount {
            let current = billing.member_discount;
            let kind = choose_option::<DiscountKind>(
                prompter,
                "Discount type",
                current.map(|discount| discount.kind),
            )?;
            let label = match kind {
                DiscountKind::Percentage => "Discount (%)",
                DiscountKind::FixedAmount => "Discount amount",
            };
            let amount = prompter.parsed(
                label,
                current.and_then(|discount| discount.amount),
                |value| format!("{value}"),
                parse_money,
            )?;
            Some(MemberDiscount { kind, amount })
        } else {
            None
        };
    }

    wizard.update_event_billing(|current| *current = billing);
    Ok(())
}

fn tags(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    env: &FormEnv<'_>,
) -> Flow<()> {
    let mut tags = wizard.data().tags.clone();
    let color = tags
        .color
        .clone()
        .or_else(|| env.default_color.map(str::to_string))
        .unwrap_or_default();
    tags.color = non_blank(&prompter.text("Calendar color (e.g. #1E88E5)", &color)?);
    tags.tag_ids = choose_lookup_many(prompter, "Tags", env.references.tags.as_ref(), &tags.tag_ids)?;
    wizard.update_data(|draft| draft.tags = tags);
    Ok(())
}

/// Weekly class instances or dated event sessions, as edited from the
/// schedule menu.
trait EntryOps {
    type Entry: ScheduleEntry + Clone;
    const NOUN: &'static str;

    fn entries(wizard: &Sequencer<ItemStep>) -> Vec<Self::Entry>;
    fn can_add(wizard: &Sequencer<ItemStep>) -> bool;
    fn add(wizard: &mut Sequencer<ItemStep>) -> Result<String>;
    fn remove(wizard: &mut Sequencer<ItemStep>, id: &str) -> bool;
    fn describe(entry: &Self::Entry, env: &FormEnv<'_>) -> String;
    fn edit(
        wizard: &mut Sequencer<ItemStep>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        id: &str,
    ) -> Flow<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuAction {
    Add,
    Edit(String),
    Remove(String),
    Done,
}

/// Menu order: add (when allowed), edit and remove per entry, then done.
fn entry_actions<E: Identifiable>(entries: &[E], can_add: bool) -> Vec<MenuAction> {
    let mut actions = Vec::with_capacity(entries.len() * 2 + 2);
    if can_add {
        actions.push(MenuAction::Add);
    }
    for entry in entries {
        actions.push(MenuAction::Edit(entry.id().to_string()));
        actions.push(MenuAction::Remove(entry.id().to_string()));
    }
    actions.push(MenuAction::Done);
    actions
}

fn entry_menu<O: EntryOps>(
    wizard: &mut Sequencer<ItemStep>,
    prompter: &mut FieldPrompter<'_>,
    env: &FormEnv<'_>,
    touched: &mut TouchedFields,
) -> Flow<()> {
    loop {
        let entries = O::entries(wizard);
        let lines: Vec<String> = if entries.is_empty() {
            vec![format!("No {}s yet.", O::NOUN)]
        } else {
            entries
                .iter()
                .map(|entry| format!("  {}", O::describe(entry, env)))
                .collect()
        };
        prompter.show(&lines);

        let can_add = O::can_add(wizard);
        if !can_add && !entries.is_empty() {
            prompter.notice(format!(
                "Finish the incomplete {} before adding another.",
                O::NOUN
            ));
        }
        let actions = entry_actions(&entries, can_add);
        let labels: Vec<String> = actions
            .iter()
            .map(|action| match action {
                MenuAction::Add => format!("Add a {}", O::NOUN),
                MenuAction::Edit(id) | MenuAction::Remove(id) => {
                    let verb = if matches!(action, MenuAction::Edit(_)) { "Edit" } else { "Remove" };
                    let line = entries
                        .iter()
                        .find(|entry| entry.id() == id)
                        .map(|entry| O::describe(entry, env))
                        .unwrap_or_default();
                    format!("{verb} {line}")
                }
                MenuAction::Done => "Done".to_string(),
            })
            .collect();

        let done = labels.len() - 1;
        let choice = prompter.choose("Schedule", &labels, Some(done))?;
        match actions.get(choice).unwrap_or(&MenuAction::Done) {
            MenuAction::Add => match O::add(wizard) {
                Ok(id) => O::edit(wizard, prompter, env, &id)?,
                Err(err) => prompter.notice(err.to_string()),
            },
            MenuAction::Edit(id) => O::edit(wizard, prompter, env, id)?,
            MenuAction::Remove(id) => {
                O::remove(wizard, id);
            }
            MenuAction::Done => {
                touched.touch(Field::Entries);
                return Ok(());
            }
        }
    }
}

struct WeeklyInstances;

impl EntryOps for WeeklyInstances {
    type Entry = ScheduleInstance;
    const NOUN: &'static str = "weekly session";

    fn entries(wizard: &Sequencer<ItemStep>) -> Vec<ScheduleInstance> {
        wizard
            .data()
            .class()
            .map(|class| class.schedule.as_slice().to_vec())
            .unwrap_or_default()
    }

    fn can_add(wizard: &Sequencer<ItemStep>) -> bool {
        wizard.can_add_schedule_instance()
    }

    fn add(wizard: &mut Sequencer<ItemStep>) -> Result<String> {
        wizard.add_schedule_instance()
    }

    fn remove(wizard: &mut Sequencer<ItemStep>, id: &str) -> bool {
        wizard.remove_schedule_instance(id)
    }

    fn describe(entry: &ScheduleInstance, env: &FormEnv<'_>) -> String {
        instance_line(entry, env.references)
    }

    fn edit(
        wizard: &mut Sequencer<ItemStep>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        id: &str,
    ) -> Flow<()> {
        let Some(mut entry) = wizard
            .data()
            .class()
            .and_then(|class| class.schedule.get(id))
            .cloned()
        else {
            return Ok(());
        };
        let days: Vec<String> = WEEKDAYS.iter().map(|day| weekday_name(*day).to_string()).collect();
        let day = prompter.choose(
            "Day",
            &days,
            WEEKDAYS.iter().position(|day| *day == entry.weekday),
        )?;
        entry.weekday = WEEKDAYS[day];
        entry.start = time(prompter, "Start time (e.g. 6:30 PM)", entry.start)?;
        entry.duration = duration(prompter, "Duration (e.g. 1h 30m)", entry.duration)?;
        entry.staff_id = choose_lookup(
            prompter,
            "Instructor",
            env.references.staff.as_ref(),
            non_blank(&entry.staff_id).as_deref(),
            false,
        )?
        .unwrap_or_default();
        entry.assistant_id = choose_lookup(
            prompter,
            "Assistant",
            env.references.staff.as_ref(),
            entry.assistant_id.as_deref(),
            true,
        )?;
        wizard.update_schedule(|schedule| {
            schedule.update(id, |current| *current = entry);
        });
        Ok(())
    }
}

struct EventSessions;

impl EntryOps for EventSessions {
    type Entry = EventSession;
    const NOUN: &'static str = "session";

    fn entries(wizard: &Sequencer<ItemStep>) -> Vec<EventSession> {
        wizard
            .data()
            .event()
            .map(|event| event.schedule.sessions.as_slice().to_vec())
            .unwrap_or_default()
    }

    fn can_add(wizard: &Sequencer<ItemStep>) -> bool {
        wizard.can_add_event_session()
    }

    fn add(wizard: &mut Sequencer<ItemStep>) -> Result<String> {
        wizard.add_event_session()
    }

    fn remove(wizard: &mut Sequencer<ItemStep>, id: &str) -> bool {
        wizard.remove_event_session(id)
    }

    fn describe(entry: &EventSession, env: &FormEnv<'_>) -> String {
        session_line(entry, env.references)
    }

    fn edit(
        wizard: &mut Sequencer<ItemStep>,
        prompter: &mut FieldPrompter<'_>,
        env: &FormEnv<'_>,
        id: &str,
    ) -> Flow<()> {
        let Some(mut entry) = wizard
            .data()
            .event()
            .and_then(|event| event.schedule.sessions.get(id))
            .cloned()
        else {
            return Ok(());
        };
        entry.date = date(prompter, "Session date (YYYY-MM-DD)", entry.date)?;
        entry.start = time(prompter, "Start time (e.g. 10:00 AM)", entry.start)?;
        entry.duration = duration(prompter, "Duration (e.g. 2h)", entry.duration)?;
        entry.staff_id = choose_lookup(
            prompter,
            "Instructor",
            env.references.staff.as_ref(),
            non_blank(&entry.staff_id).as_deref(),
            false,
        )?
        .unwrap_or_default();
        entry.assistant_id = choose_lookup(
            prompter,
            "Assistant",
            env.references.staff.as_ref(),
            entry.assistant_id.as_deref(),
            true,
        )?;
        wizard.update_event_schedule(|schedule| {
            schedule.sessions.update(id, |current| *current = entry);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_menu_lists_each_entry_by_id() {
        let entries = vec![ScheduleInstance::new("mon-am"), ScheduleInstance::new("wed-pm")];

        assert_eq!(
            entry_actions(&entries, true),
            vec![
                MenuAction::Add,
                MenuAction::Edit("mon-am".to_string()),
                MenuAction::Remove("mon-am".to_string()),
                MenuAction::Edit("wed-pm".to_string()),
                MenuAction::Remove("wed-pm".to_string()),
                MenuAction::Done,
            ]
        );

        let sessions = vec![EventSession::new("day-1", None)];
        let actions = entry_actions(&sessions, false);
        assert_eq!(actions.first(), Some(&MenuAction::Edit("day-1".to_string())));
        assert_eq!(actions.last(), Some(&MenuAction::Done));
    }
}
