//! Integration hooks for the host game's event notifications.
//!
//! The host fires one of four notifications after the matching engine call
//! returns. [`EventObserver`] turns each into a [`RecentEventSlot`] write.
//! A host adapter wires itself up through [`HostHooks`].

use std::sync::Arc;

use rimrpc_core::metrics::RpcCounters;
use rimrpc_core::{Clock, RecentEventSlot, Translate};
use thiserror::Error;
use tracing::{debug, error, info, trace};

use crate::events::{GameEvent, IncidentOutcome, PlacedStructure};

/// Receives host notifications, one method per category.
pub trait GameEventSource: Send + Sync {
    /// A message was broadcast to the player.
    fn on_message(&self, text: &str);
    /// A raid incident resolved.
    fn on_raid_resolved(&self, outcome: IncidentOutcome);
    /// A structure was placed on the map.
    fn on_structure_placed(&self, structure: &PlacedStructure);
    /// A resource-pod crash incident resolved.
    fn on_pod_crash(&self, outcome: IncidentOutcome);
}

/// Failure to attach to the host's notifications.
#[derive(Debug, Error)]
pub enum HookError {
    /// The host cannot deliver this category at all.
    #[error("host does not support {0} notifications")]
    Unsupported(&'static str),

    /// Attaching to one target failed.
    #[error("failed to hook {target}: {reason}")]
    Patch { target: String, reason: String },
}

/// A host that can deliver notifications to a [`GameEventSource`].
pub trait HostHooks {
    /// Start delivering notifications to `source`.
    ///
    /// # Errors
    /// Returns the first hook that could not be attached. Hooks attached
    /// before the failure stay attached.
    fn subscribe(&mut self, source: Arc<dyn GameEventSource>) -> Result<(), HookError>;
}

/// Attach `source` to `host`, logging instead of propagating failure.
///
/// Returns whether every hook was attached. A partial attachment is not
/// rolled back.
pub fn install_hooks<H: HostHooks + ?Sized>(host: &mut H, source: Arc<dyn GameEventSource>) -> bool {
    info!("Installing game event hooks");
    match host.subscribe(source) {
        Ok(()) => {
            info!("Game event hooks installed");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to install game event hooks");
            false
        }
    }
}

/// Writes observed events into the shared recent-event slot.
///
/// Overwrites unconditionally: a structure placed right after a raid
/// replaces the raid.
pub struct EventObserver {
    slot: RecentEventSlot,
    translator: Arc<dyn Translate>,
    clock: Arc<dyn Clock>,
    counters: Arc<RpcCounters>,
}

impl EventObserver {
    /// Create an observer writing into `slot`.
    #[must_use]
    pub fn new(
        slot: RecentEventSlot,
        translator: Arc<dyn Translate>,
        clock: Arc<dyn Clock>,
        counters: Arc<RpcCounters>,
    ) -> Self {
        Self {
            slot,
            translator,
            clock,
            counters,
        }
    }

    /// Record `description` as the most recent event, stamped now.
    pub fn record_event(&self, description: impl Into<String>) {
        let description = description.into();
        let now = self.clock.now_secs();
        debug!(event = %description, at = now, "Recording recent event");
        self.slot.record(description, now);
        RpcCounters::bump(&self.counters.events_recorded);
    }

    /// Describe `event` and record it unless it is filtered out.
    pub fn observe(&self, event: &GameEvent) {
        match event.describe(self.translator.as_ref()) {
            Some(description) => self.record_event(description),
            None => {
                trace!(kind = event.kind(), "Event not shown");
                RpcCounters::bump(&self.counters.events_ignored);
            }
        }
    }
}

impl std::fmt::Debug for EventObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventObserver")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl GameEventSource for EventObserver {
    fn on_message(&self, text: &str) {
        self.observe(&GameEvent::Message {
            text: text.to_string(),
        });
    }

    fn on_raid_resolved(&self, outcome: IncidentOutcome) {
        self.observe(&GameEvent::RaidResolved { outcome });
    }

    fn on_structure_placed(&self, structure: &PlacedStructure) {
        self.observe(&GameEvent::StructurePlaced {
            structure: structure.clone(),
        });
    }

    fn on_pod_crash(&self, outcome: IncidentOutcome) {
        self.observe(&GameEvent::PodCrash { outcome });
    }
}
