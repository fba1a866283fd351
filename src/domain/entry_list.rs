use serde::{Deserialize, Serialize};

use crate::domain::schedule::ScheduleEntry;
use crate::errors::{DojoError, Result};

/// Ordered schedule entries. A new entry may only be appended once every
/// existing entry is complete, so at most one entry is ever half-edited.
/// Removal never re-indexes the remaining entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<E> {
    entries: Vec<E>,
}

impl<E> Default for EntryList<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: ScheduleEntry> EntryList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<E>) -> Self {
        Self { entries }
    }

    pub fn can_append(&self) -> bool {
        self.all_complete()
    }

    pub fn all_complete(&self) -> bool {
        self.entries.iter().all(ScheduleEntry::is_complete)
    }

    pub fn append(&mut self, entry: E) -> Result<&mut E> {
        if let Some(pending) = self.entries.iter().find(|existing| !existing.is_complete()) {
            return Err(DojoError::IncompleteEntry(format!(
                "`{}` needs a staff member and a duration before another entry can be added",
                pending.id()
            )));
        }
        if self.get(entry.id()).is_some() {
            return Err(DojoError::InvalidInput(format!(
                "duplicate schedule entry id `{}`",
                entry.id()
            )));
        }
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        Ok(&mut self.entries[last])
    }

    /// Applies `mutator` to the entry with `id`; returns whether it existed.
    pub fn update<F>(&mut self, id: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut E),
    {
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) => {
                mutator(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn first_incomplete(&self) -> Option<&E> {
        self.entries.iter().find(|entry| !entry.is_complete())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, E> IntoIterator for &'a EntryList<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
