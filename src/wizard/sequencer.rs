//! Step sequencer: owns the current step, the draft, and the commit status
//! slots. Every draft mutation goes through a merge operation here.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::entry_list::EntryList;
use crate::domain::ids::{IdProvider, SequentialIds};
use crate::domain::item::{ClassSchedule, EventBilling, EventSchedule, ItemType};
use crate::domain::schedule::{EventSession, ScheduleInstance};
use crate::errors::{DojoError, Result};
use crate::wizard::step::{ItemStep, WizardFlow};
use crate::wizard::validate::FieldIssue;

/// Whether the wizard creates a new record or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { id: String },
}

pub struct Sequencer<S: WizardFlow> {
    step: S,
    data: S::Draft,
    initial: S::Draft,
    mode: WizardMode,
    is_loading: bool,
    error: Option<String>,
    ids: Arc<dyn IdProvider>,
}

impl<S: WizardFlow> fmt::Debug for Sequencer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("step", &self.step)
            .field("data", &self.data)
            .field("mode", &self.mode)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}

impl<S: WizardFlow> Default for Sequencer<S> {
    fn default() -> Self {
        Self::new(Arc::new(SequentialIds::new()))
    }
}

impl<S: WizardFlow> Sequencer<S> {
    /// Fresh wizard for adding a record, starting from default draft values.
    pub fn new(ids: Arc<dyn IdProvider>) -> Self {
        Self::seeded(S::Draft::default(), WizardMode::Create, ids)
    }

    /// Wizard seeded from a stored record; `reset` returns to this seed.
    pub fn for_edit(id: impl Into<String>, draft: S::Draft, ids: Arc<dyn IdProvider>) -> Self {
        Self::seeded(draft, WizardMode::Edit { id: id.into() }, ids)
    }

    fn seeded(draft: S::Draft, mode: WizardMode, ids: Arc<dyn IdProvider>) -> Self {
        Self {
            step: S::FIRST,
            initial: draft.clone(),
            data: draft,
            mode,
            is_loading: false,
            error: None,
            ids,
        }
    }

    pub fn step(&self) -> S {
        self.step
    }

    pub fn data(&self) -> &S::Draft {
        &self.data
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn ids(&self) -> &Arc<dyn IdProvider> {
        &self.ids
    }

    /// Merges changes into the draft. No validation happens here.
    pub fn update_data<F>(&mut self, merge: F)
    where
        F: FnOnce(&mut S::Draft),
    {
        merge(&mut self.data);
    }

    pub fn path(&self) -> &'static [S] {
        S::path(&self.data)
    }

    /// Index of the current step in the active path.
    pub fn path_position(&self) -> Option<usize> {
        self.path().iter().position(|step| *step == self.step)
    }

    /// Moves to the next step of the active path. Callers gate this with
    /// [`Sequencer::can_advance`].
    pub fn next_step(&mut self) {
        let path = self.path();
        if let Some(next) = self.path_position().and_then(|index| path.get(index + 1)) {
            debug!(from = ?self.step, to = ?next, "wizard advanced");
            self.step = *next;
        }
    }

    /// Moves back along the active path. The draft is untouched; the first
    /// step and the terminal step have nowhere to go back to.
    pub fn previous_step(&mut self) {
        if self.step == S::SUCCESS {
            return;
        }
        let path = self.path();
        if let Some(index) = self.path_position().filter(|index| *index > 0) {
            debug!(from = ?self.step, to = ?path[index - 1], "wizard went back");
            self.step = path[index - 1];
        }
    }

    pub fn set_step(&mut self, step: S) {
        debug!(from = ?self.step, to = ?step, "wizard jumped");
        self.step = step;
    }

    /// Restores the seeded draft and the first step, clearing commit state.
    pub fn reset(&mut self) {
        self.data = self.initial.clone();
        self.step = S::FIRST;
        self.is_loading = false;
        self.error = None;
        debug!("wizard reset");
    }

    pub fn set_is_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn current_issues(&self) -> Vec<FieldIssue> {
        self.step.issues(&self.data)
    }

    pub fn is_step_valid(&self) -> bool {
        self.step.is_valid(&self.data)
    }

    /// Enabled state of the "Next" control.
    pub fn can_advance(&self) -> bool {
        !self.is_loading && self.step != S::SUCCESS && self.is_step_valid()
    }

    /// True on the last data-entry step, where "Next" commits.
    pub fn is_final_entry_step(&self) -> bool {
        let path = self.path();
        path.len() >= 2 && path[path.len() - 1] == S::SUCCESS && self.path_position() == Some(path.len() - 2)
    }

    pub fn is_complete(&self) -> bool {
        self.step == S::SUCCESS
    }

    /// Cancel is unavailable while a commit is in flight.
    pub fn can_cancel(&self) -> bool {
        !self.is_loading
    }

    /// Discards the draft; returns false when refused.
    pub fn cancel(&mut self) -> bool {
        if !self.can_cancel() {
            debug!("cancel ignored while a commit is in flight");
            return false;
        }
        self.reset();
        true
    }
}

impl Sequencer<ItemStep> {
    pub fn select_type(&mut self, item_type: ItemType) {
        self.update_data(|draft| draft.select_type(item_type));
    }

    /// Merges into the class schedule; false when the class branch is not active.
    pub fn update_schedule<F>(&mut self, merge: F) -> bool
    where
        F: FnOnce(&mut ClassSchedule),
    {
        match self.data.class_mut() {
            Some(class) => {
                merge(&mut class.schedule);
                true
            }
            None => false,
        }
    }

    pub fn update_event_schedule<F>(&mut self, merge: F) -> bool
    where
        F: FnOnce(&mut EventSchedule),
    {
        match self.data.event_mut() {
            Some(event) => {
                merge(&mut event.schedule);
                true
            }
            None => false,
        }
    }

    pub fn update_event_billing<F>(&mut self, merge: F) -> bool
    where
        F: FnOnce(&mut EventBilling),
    {
        match self.data.event_mut() {
            Some(event) => {
                merge(&mut event.billing);
                true
            }
            None => false,
        }
    }

    pub fn can_add_schedule_instance(&self) -> bool {
        self.data
            .class()
            .is_some_and(|class| class.schedule.can_append())
    }

    pub fn can_add_event_session(&self) -> bool {
        self.data
            .event()
            .is_some_and(|event| event.schedule.sessions.can_append())
    }

    /// Appends a default weekly instance and returns its id.
    pub fn add_schedule_instance(&mut self) -> Result<String> {
        let id = self.ids.next_id("instance");
        let class = self
            .data
            .class_mut()
            .ok_or_else(|| DojoError::InvalidInput("no class is being edited".into()))?;
        append_entry(&mut class.schedule, ScheduleInstance::new(id))
    }

    /// Appends a session dated on the event start date and returns its id.
    pub fn add_event_session(&mut self) -> Result<String> {
        let id = self.ids.next_id("session");
        let event = self
            .data
            .event_mut()
            .ok_or_else(|| DojoError::InvalidInput("no event is being edited".into()))?;
        let date = event.schedule.start_date();
        append_entry(&mut event.schedule.sessions, EventSession::new(id, date))
    }

    pub fn remove_schedule_instance(&mut self, id: &str) -> bool {
        self.data
            .class_mut()
            .is_some_and(|class| class.schedule.remove(id).is_some())
    }

    pub fn remove_event_session(&mut self, id: &str) -> bool {
        self.data
            .event_mut()
            .is_some_and(|event| event.schedule.sessions.remove(id).is_some())
    }
}

fn append_entry<E>(list: &mut EntryList<E>, entry: E) -> Result<String>
where
    E: crate::domain::schedule::ScheduleEntry,
{
    let appended = list.append(entry)?;
    let id = appended.id().to_string();
    debug!(%id, "schedule entry added");
    Ok(id)
}
