use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

/// Issued when a regeneration for an entity starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub entity: Uuid,
    pub sequence: u64,
}

/// Last-write-wins bookkeeping for regenerations running off the UI thread.
///
/// Each edited entity (a tray, or the box as a whole) has at most one
/// current ticket. Starting a newer regeneration supersedes the older one;
/// the older result is dropped when it completes instead of being shown.
#[derive(Debug, Default)]
pub struct RegenerationTracker {
    latest: HashMap<Uuid, u64>,
    next: u64,
}

impl RegenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a regeneration, superseding any in-flight one for `entity`.
    pub fn begin(&mut self, entity: Uuid) -> Ticket {
        self.next += 1;
        self.latest.insert(entity, self.next);
        Ticket {
            entity,
            sequence: self.next,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.entity) == Some(&ticket.sequence)
    }

    /// Hand back `result` if `ticket` is still current, clearing it.
    /// Stale results are discarded.
    pub fn complete<T>(&mut self, ticket: Ticket, result: T) -> Option<T> {
        if !self.is_current(ticket) {
            debug!(
                entity = %ticket.entity,
                sequence = ticket.sequence,
                "discarding superseded regeneration"
            );
            return None;
        }
        self.latest.remove(&ticket.entity);
        Some(result)
    }

    /// Entities with a regeneration still outstanding.
    pub fn in_flight(&self) -> usize {
        self.latest.len()
    }

    /// Forget the outstanding regeneration for `entity`, if any.
    pub fn cancel(&mut self, entity: Uuid) -> bool {
        self.latest.remove(&entity).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_request_supersedes_older() {
        let mut tracker = RegenerationTracker::new();
        let tray = Uuid::new_v4();
        let first = tracker.begin(tray);
        let second = tracker.begin(tray);

        assert!(!tracker.is_current(first));
        assert_eq!(tracker.complete(first, "old"), None);
        assert_eq!(tracker.complete(second, "new"), Some("new"));
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn entities_are_tracked_independently() {
        let mut tracker = RegenerationTracker::new();
        let a = tracker.begin(Uuid::new_v4());
        let b = tracker.begin(Uuid::new_v4());
        assert_eq!(tracker.in_flight(), 2);
        assert_eq!(tracker.complete(b, 2), Some(2));
        assert_eq!(tracker.complete(a, 1), Some(1));
    }

    #[test]
    fn completing_twice_yields_once() {
        let mut tracker = RegenerationTracker::new();
        let ticket = tracker.begin(Uuid::new_v4());
        assert_eq!(tracker.complete(ticket, ()), Some(()));
        assert_eq!(tracker.complete(ticket, ()), None);
    }

    #[test]
    fn cancelled_result_is_discarded() {
        let mut tracker = RegenerationTracker::new();
        let entity = Uuid::new_v4();
        let ticket = tracker.begin(entity);
        assert!(tracker.cancel(entity));
        assert!(!tracker.cancel(entity));
        assert_eq!(tracker.complete(ticket, 5), None);
    }
}
