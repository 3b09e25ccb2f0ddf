//! Mod entry points: initialize, per-frame update, presence update, shutdown.
//!
//! [`RimRpc`] owns the SDK handle and the reporter. The host calls:
//!
//! | Host moment            | Call                 |
//! |------------------------|----------------------|
//! | Mod loaded             | [`RimRpc::boot`]     |
//! | Every frame            | [`RimRpc::update`]   |
//! | Polling tick           | [`RimRpc::update_presence`] |
//! | Back to main menu      | [`RimRpc::on_main_menu`] |
//! | Game closing           | [`RimRpc::shutdown`] |
//!
//! A failed initialization is permanent for the process: every later
//! presence update is a logged no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rimrpc_core::RpcConfig;
use rimrpc_core::metrics::{CounterSnapshot, RpcCounters};
use rimrpc_discord::{CreateFlags, DiscordSdk, SdkConnector};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::SettingsHandle;
use crate::hooks::{self, EventObserver, GameEventSource, HostHooks};
use crate::reporter::{HostContext, PresenceReporter, PublishOutcome};

/// The running integration.
pub struct RimRpc<C: SdkConnector> {
    config: RpcConfig,
    connector: C,
    sdk: Mutex<Option<C::Sdk>>,
    connecting: Mutex<()>,
    init_failed: AtomicBool,
    reporter: PresenceReporter,
    observer: Arc<EventObserver>,
    counters: Arc<RpcCounters>,
}

impl<C: SdkConnector> RimRpc<C> {
    /// Build the integration. Nothing connects until [`initialize`].
    ///
    /// [`initialize`]: Self::initialize
    #[must_use]
    pub fn new(config: RpcConfig, settings: SettingsHandle, host: HostContext, connector: C) -> Self {
        let counters = Arc::new(RpcCounters::new());
        let reporter = PresenceReporter::new(&config, settings, host, Arc::clone(&counters));
        let observer = Arc::new(EventObserver::new(
            reporter.slot().clone(),
            Arc::clone(&reporter.host().translator),
            Arc::clone(&reporter.host().clock),
            Arc::clone(&counters),
        ));
        Self {
            config,
            connector,
            sdk: Mutex::new(None),
            connecting: Mutex::new(()),
            init_failed: AtomicBool::new(false),
            reporter,
            observer,
            counters,
        }
    }

    /// Connect the presence SDK. Returns whether a handle is now held.
    ///
    /// Failure is logged and leaves the integration disabled for the rest
    /// of the process; later calls do not reconnect. The handshake runs
    /// without holding the handle lock, so per-frame [`update`] calls on
    /// other threads are not held up by it.
    ///
    /// [`update`]: Self::update
    pub fn initialize(&self) -> bool {
        let _connecting = self.connecting.lock();
        if self.sdk.lock().is_some() {
            debug!("Discord SDK already initialised");
            return true;
        }
        if self.init_failed.load(Ordering::Acquire) {
            debug!("Discord SDK initialisation failed earlier; staying disabled");
            return false;
        }
        if !self.config.general.enabled {
            info!("RimRPC disabled in configuration");
            return false;
        }

        let client_id = self.config.discord.client_id;
        match self.connector.connect(client_id, CreateFlags::NoRequireDiscord) {
            Ok(client) => {
                info!(client_id, "Discord SDK initialised");
                *self.sdk.lock() = Some(client);
                true
            }
            Err(e) => {
                error!(error = %e, client_id, "Failed to initialise Discord SDK");
                self.init_failed.store(true, Ordering::Release);
                false
            }
        }
    }

    /// [`initialize`](Self::initialize), then publish once.
    pub fn boot(&self) -> Option<JoinHandle<PublishOutcome>> {
        self.initialize();
        self.update_presence()
    }

    /// Release the SDK handle. Safe to call repeatedly.
    pub fn shutdown(&self) {
        if self.sdk.lock().take().is_some() {
            info!(counters = %self.counters.snapshot().summary(), "Discord SDK closed");
        }
    }

    /// Per-frame pump for SDK callbacks. No-op without a handle.
    pub fn update(&self) {
        if let Some(sdk) = self.sdk.lock().as_ref() {
            if let Err(e) = sdk.run_callbacks() {
                warn!(error = %e, "Discord SDK callbacks failed");
            }
        }
    }

    /// Compute and publish presence now.
    pub fn update_presence(&self) -> Option<JoinHandle<PublishOutcome>> {
        let sdk = self.sdk.lock();
        self.reporter.update_presence(sdk.as_ref())
    }

    /// The host returned to the main menu.
    pub fn on_main_menu(&self) -> Option<JoinHandle<PublishOutcome>> {
        self.update_presence()
    }

    /// Attach the event observer to the host. Failure is logged only.
    pub fn install_hooks<H: HostHooks + ?Sized>(&self, host: &mut H) -> bool {
        let source: Arc<dyn GameEventSource> = self.observer.clone();
        hooks::install_hooks(host, source)
    }

    /// The observer hooks write through.
    #[must_use]
    pub fn observer(&self) -> Arc<EventObserver> {
        Arc::clone(&self.observer)
    }

    /// The presence reporter.
    #[must_use]
    pub fn reporter(&self) -> &PresenceReporter {
        &self.reporter
    }

    /// Whether an SDK handle is held.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.sdk.lock().is_some()
    }

    /// Current counter values.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }
}

impl<C: SdkConnector> Drop for RimRpc<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
