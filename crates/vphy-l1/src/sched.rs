//! Frame-number scheduler.
//!
//! Defers an action until local time reaches a target (frame number,
//! timeslot). The scheduler owns a registered payload until it fires or is
//! cancelled; at fire time ownership transfers to the caller. Targets that
//! were passed while nobody advanced the clock still fire: the payload
//! carries everything the action needs, so an overdue burst is late but
//! never wrong.

use std::cmp::Reverse;

use vphy_core::gsm_time::fn_diff;
use vphy_core::{GsmTime, GSM_MAX_FN};

/// Identity of a scheduled action, for cancellation before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedId(u64);

#[derive(Debug)]
pub struct SchedEntry<T> {
    pub id: SchedId,
    pub target_fn: u32,
    pub timeslot: u8,
    pub payload: T,
    seq: u64,
}

pub struct Scheduler<T> {
    entries: Vec<SchedEntry<T>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_seq: 0 }
    }

    /// Register an action for a future (frame, timeslot). Multiple actions
    /// may target the same slot; they fire in registration order.
    pub fn schedule(&mut self, payload: T, target_fn: u32, timeslot: u8) -> SchedId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = SchedId(seq);
        self.entries.push(SchedEntry {
            id,
            target_fn: target_fn % GSM_MAX_FN,
            timeslot,
            payload,
            seq,
        });
        id
    }

    /// Remove an action by identity before it fires, returning its payload.
    pub fn cancel(&mut self, id: SchedId) -> Option<T> {
        let at = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(at).payload)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry whose target frame has been reached or
    /// passed, in ascending target order, FIFO within equal targets.
    /// Wraparound-aware: a target just behind `now` on the hyperframe circle
    /// counts as passed, one far ahead does not.
    pub fn take_due(&mut self, now: GsmTime) -> Vec<SchedEntry<T>> {
        let now_fn = now.frame_number();

        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if fn_diff(now_fn, entry.target_fn) >= 0 {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;

        // Most-overdue first is ascending target order
        due.sort_by_key(|e| (Reverse(fn_diff(now_fn, e.target_fn)), e.seq));
        due
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_until_target() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule("burst", 10, 1);

        assert!(sched.take_due(GsmTime::from_fn(9)).is_empty());
        let due = sched.take_due(GsmTime::from_fn(10));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].payload, "burst");
        assert_eq!(due[0].timeslot, 1);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_overdue_still_fires() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule("late", 10, 1);

        // The clock jumped past the target; the action fires anyway
        let due = sched.take_due(GsmTime::from_fn(500));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].payload, "late");
    }

    #[test]
    fn test_fifo_tie_break() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule("first", 42, 1);
        sched.schedule("second", 42, 1);

        let due = sched.take_due(GsmTime::from_fn(42));
        let order: Vec<&str> = due.into_iter().map(|e| e.payload).collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_ascending_target_order() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        sched.schedule("b", 20, 1);
        sched.schedule("a", 10, 1);
        sched.schedule("c", 30, 1);

        let due = sched.take_due(GsmTime::from_fn(30));
        let order: Vec<&str> = due.into_iter().map(|e| e.payload).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel_by_identity() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        let keep = sched.schedule("keep", 10, 1);
        let drop = sched.schedule("drop", 10, 1);

        assert_eq!(sched.cancel(drop), Some("drop"));
        assert_eq!(sched.cancel(drop), None);

        let due = sched.take_due(GsmTime::from_fn(10));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, keep);
    }

    #[test]
    fn test_due_across_wraparound() {
        let mut sched: Scheduler<&str> = Scheduler::new();
        // Scheduled just before the hyperframe wraps
        sched.schedule("wrap", GSM_MAX_FN - 2, 1);

        assert!(sched.take_due(GsmTime::from_fn(GSM_MAX_FN - 3)).is_empty());
        // Now is past the wrap; the target is behind us on the circle
        let due = sched.take_due(GsmTime::from_fn(1));
        assert_eq!(due.len(), 1);
    }
}
