use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Hands out identities for schedule entries and stored records.
pub trait IdProvider: Send + Sync {
    fn next_id(&self, prefix: &str) -> String;
}

/// Monotonic `prefix-N` identities; deterministic for tests.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&self, prefix: &str) -> String {
        let next = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{next}")
    }
}

/// Random v4 identities for records persisted across sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdProvider for UuidIds {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_never_repeat() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id("instance"), "instance-1");
        assert_eq!(ids.next_id("instance"), "instance-2");
        assert_eq!(ids.next_id("session"), "session-3");
    }

    #[test]
    fn uuid_ids_carry_prefix() {
        let id = UuidIds.next_id("class");
        assert!(id.starts_with("class-"));
        assert_ne!(id, UuidIds.next_id("class"));
    }
}
