//! Presence reporter — computes the two presence lines and publishes them.
//!
//! Called once per host polling tick. Each call:
//!
//! 1. Skips everything if the SDK is not connected.
//! 2. Clears the recent event if event display is off.
//! 3. Composes `details` and `state` from settings and colony state.
//! 4. Replaces `state` with the recent event while it is inside the window.
//! 5. Spawns the publish, bounded by the configured timeout.
//!
//! The publish result is only logged and counted. It never gates the next
//! tick.

use std::sync::Arc;
use std::time::Duration;

use rimrpc_core::metrics::RpcCounters;
use rimrpc_core::{Clock, KeyTable, RecentEventSlot, RpcConfig, SystemClock, Translate};
use rimrpc_discord::{Activity, ActivityAssets, ActivityFuture, ActivityTimestamps, DiscordSdk, SdkResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::bridge::ColonyView;
use crate::compose;
use crate::config::SettingsHandle;

/// Host-provided collaborators.
#[derive(Clone)]
pub struct HostContext {
    /// Read-only colony state.
    pub colony: Arc<dyn ColonyView>,
    /// Label lookup.
    pub translator: Arc<dyn Translate>,
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
    /// Runtime publishes are spawned on.
    pub runtime: Handle,
}

impl HostContext {
    /// English labels and the system clock.
    #[must_use]
    pub fn new(colony: Arc<dyn ColonyView>, runtime: Handle) -> Self {
        Self {
            colony,
            translator: Arc::new(KeyTable::english()),
            clock: Arc::new(SystemClock),
            runtime,
        }
    }

    /// Use the host's translation database.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translate>) -> Self {
        self.translator = translator;
        self
    }

    /// Use a different clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// How a spawned publish ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The service accepted the activity.
    Published,
    /// The service answered with an error code.
    Rejected(SdkResult),
    /// No answer within the timeout.
    TimedOut,
}

/// Owns the recent-event slot and publishes presence.
pub struct PresenceReporter {
    slot: RecentEventSlot,
    settings: SettingsHandle,
    host: HostContext,
    counters: Arc<RpcCounters>,
    started_at: i64,
    assets: ActivityAssets,
    display_window_secs: i64,
    publish_timeout: Duration,
}

impl PresenceReporter {
    /// Create a reporter. The session start time is captured now.
    #[must_use]
    pub fn new(
        config: &RpcConfig,
        settings: SettingsHandle,
        host: HostContext,
        counters: Arc<RpcCounters>,
    ) -> Self {
        let started_at = host.clock.now_secs();
        Self {
            slot: RecentEventSlot::new(),
            settings,
            host,
            counters,
            started_at,
            assets: ActivityAssets {
                large_image: config.discord.large_image.clone(),
                large_text: config.discord.large_text.clone(),
            },
            display_window_secs: config.events.display_window_secs,
            publish_timeout: Duration::from_millis(config.discord.publish_timeout_ms),
        }
    }

    /// The slot event hooks should write into.
    #[must_use]
    pub fn slot(&self) -> &RecentEventSlot {
        &self.slot
    }

    /// Settings this reporter reads.
    #[must_use]
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// Collaborators this reporter was built with.
    #[must_use]
    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Session start, Unix epoch seconds.
    #[must_use]
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    /// Compute the activity for right now.
    ///
    /// Clears the recent event when event display is disabled, so it cannot
    /// come back if display is re-enabled while its window is still open.
    pub fn compute_activity(&self) -> Activity {
        let settings = self.settings.snapshot();
        let colony = self.host.colony.as_ref();
        let translator = self.host.translator.as_ref();

        if !settings.show_events && self.slot.clear() {
            debug!("Event display disabled; forgot recent event");
            RpcCounters::bump(&self.counters.slot_clears);
        }

        let details = compose::compose_details(&settings, colony, translator);
        let mut state = compose::compose_state(&settings, colony, translator);

        if settings.show_events {
            let now = self.host.clock.now_secs();
            if let Some(event) = self.slot.active_text(now, self.display_window_secs) {
                state = event;
            }
        }

        Activity {
            details,
            state,
            timestamps: ActivityTimestamps {
                start: self.started_at,
            },
            assets: self.assets.clone(),
        }
    }

    /// Compute and publish presence through `sdk`.
    ///
    /// With no SDK this only logs: nothing is computed, published or
    /// cleared. Otherwise the publish is spawned and its handle returned;
    /// callers are free to drop it.
    pub fn update_presence<S: DiscordSdk>(&self, sdk: Option<&S>) -> Option<JoinHandle<PublishOutcome>> {
        let Some(sdk) = sdk else {
            error!("Discord SDK not initialised; skipping presence update");
            return None;
        };

        let activity = self.compute_activity();
        trace!(details = %activity.details, state = %activity.state, "Publishing presence");
        let pending = sdk.update_activity(activity);
        Some(self.host.runtime.spawn(publish(
            pending,
            self.publish_timeout,
            Arc::clone(&self.counters),
        )))
    }
}

impl std::fmt::Debug for PresenceReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceReporter")
            .field("started_at", &self.started_at)
            .field("display_window_secs", &self.display_window_secs)
            .field("publish_timeout", &self.publish_timeout)
            .finish_non_exhaustive()
    }
}

async fn publish(pending: ActivityFuture, limit: Duration, counters: Arc<RpcCounters>) -> PublishOutcome {
    // Logged at debug/trace only: this runs every tick.
    match tokio::time::timeout(limit, pending).await {
        Ok(SdkResult::Ok) => {
            trace!("Presence updated");
            RpcCounters::bump(&counters.presence_published);
            PublishOutcome::Published
        }
        Ok(result) => {
            debug!(?result, "Presence update rejected");
            RpcCounters::bump(&counters.publish_rejected);
            PublishOutcome::Rejected(result)
        }
        Err(_) => {
            debug!(timeout = ?limit, "Presence update timed out");
            RpcCounters::bump(&counters.publish_timeouts);
            PublishOutcome::TimedOut
        }
    }
}
