//! Runtime counters for the event and publish paths.
//!
//! Lock-free `AtomicU64` counters, incremented on the hot path and read on
//! demand (debug overlay, log dump).

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters shared by the observer and the reporter.
#[derive(Debug)]
pub struct RpcCounters {
    /// Events written into the recent-event slot.
    pub events_recorded: AtomicU64,
    /// Events filtered out before reaching the slot.
    pub events_ignored: AtomicU64,
    /// Times the slot was cleared because event display was disabled.
    pub slot_clears: AtomicU64,
    /// Publishes the presence service acknowledged.
    pub presence_published: AtomicU64,
    /// Publishes the presence service rejected.
    pub publish_rejected: AtomicU64,
    /// Publishes abandoned after the timeout.
    pub publish_timeouts: AtomicU64,
}

impl RpcCounters {
    /// Zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events_recorded: AtomicU64::new(0),
            events_ignored: AtomicU64::new(0),
            slot_clears: AtomicU64::new(0),
            presence_published: AtomicU64::new(0),
            publish_rejected: AtomicU64::new(0),
            publish_timeouts: AtomicU64::new(0),
        }
    }

    /// Increment one counter.
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            events_recorded: self.events_recorded.load(Ordering::Relaxed),
            events_ignored: self.events_ignored.load(Ordering::Relaxed),
            slot_clears: self.slot_clears.load(Ordering::Relaxed),
            presence_published: self.presence_published.load(Ordering::Relaxed),
            publish_rejected: self.publish_rejected.load(Ordering::Relaxed),
            publish_timeouts: self.publish_timeouts.load(Ordering::Relaxed),
        }
    }
}

impl Default for RpcCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Events written into the slot.
    pub events_recorded: u64,
    /// Events filtered out.
    pub events_ignored: u64,
    /// Slot clears.
    pub slot_clears: u64,
    /// Acknowledged publishes.
    pub presence_published: u64,
    /// Rejected publishes.
    pub publish_rejected: u64,
    /// Timed-out publishes.
    pub publish_timeouts: u64,
}

impl CounterSnapshot {
    /// Total publish attempts that have completed one way or another.
    #[must_use]
    pub fn publishes_settled(&self) -> u64 {
        self.presence_published + self.publish_rejected + self.publish_timeouts
    }

    /// One-line summary for log output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "events={} ignored={} clears={} published={} rejected={} timeouts={}",
            self.events_recorded,
            self.events_ignored,
            self.slot_clears,
            self.presence_published,
            self.publish_rejected,
            self.publish_timeouts,
        )
    }
}
