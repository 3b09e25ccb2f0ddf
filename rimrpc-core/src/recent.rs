//! The "last event" slot shared by event hooks and the presence reporter.
//!
//! Exactly one event is retained. Every record overwrites the previous one
//! regardless of category; there is no prioritisation. An event is never
//! deleted on expiry, it is simply ignored once it falls outside the
//! display window.

use std::sync::Arc;

use parking_lot::Mutex;

/// The most recently observed event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentEvent {
    /// Human-readable description. Empty when nothing has been recorded.
    pub text: String,
    /// When the event was recorded (Unix epoch seconds). `0` when cleared.
    pub observed_at: i64,
}

impl RecentEvent {
    /// Whether this event should still be displayed at `now`.
    ///
    /// Active iff the text is non-empty and `now - observed_at < window_secs`.
    #[must_use]
    pub fn is_active(&self, now: i64, window_secs: i64) -> bool {
        !self.text.is_empty() && now.saturating_sub(self.observed_at) < window_secs
    }

    /// Whether this is the cleared state.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.text.is_empty() && self.observed_at == 0
    }
}

/// Lock-guarded, cloneable handle to the single [`RecentEvent`].
///
/// Clones share the same slot. Hooks hold one clone, the reporter another.
#[derive(Debug, Clone, Default)]
pub struct RecentEventSlot {
    inner: Arc<Mutex<RecentEvent>>,
}

impl RecentEventSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents with `text` observed at `now`.
    pub fn record(&self, text: impl Into<String>, now: i64) {
        let mut slot = self.inner.lock();
        slot.text = text.into();
        slot.observed_at = now;
    }

    /// Forget the current event.
    ///
    /// Returns `true` if there was something to forget.
    pub fn clear(&self) -> bool {
        let mut slot = self.inner.lock();
        let had_event = !slot.is_cleared();
        *slot = RecentEvent::default();
        had_event
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> RecentEvent {
        self.inner.lock().clone()
    }

    /// The event text if it is still inside the display window at `now`.
    #[must_use]
    pub fn active_text(&self, now: i64, window_secs: i64) -> Option<String> {
        let slot = self.inner.lock();
        slot.is_active(now, window_secs).then(|| slot.text.clone())
    }
}
