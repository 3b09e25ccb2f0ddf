//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rimrpc_core::{ManualClock, RpcConfig};
use rimrpc_discord::{Activity, ActivityFuture, CreateFlags, DiscordError, DiscordSdk, SdkConnector, SdkResult};
use rimrpc_rimworld::{
    ColonySnapshot, GameClock, GameDate, HostContext, Quadrum, RimRpc, RimRpcSettings,
    SettingsHandle,
};
use tokio::runtime::Handle;

pub const T0: i64 = 1_700_000_000;

/// Records every activity it is asked to publish.
#[derive(Clone)]
pub struct RecordingSdk {
    pub sent: Arc<Mutex<Vec<Activity>>>,
    pub callbacks: Arc<AtomicUsize>,
    pub result: SdkResult,
    pub delay: Option<Duration>,
}

impl RecordingSdk {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            callbacks: Arc::new(AtomicUsize::new(0)),
            result: SdkResult::Ok,
            delay: None,
        }
    }

    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Activity {
        self.sent.lock().last().cloned().expect("at least one publish")
    }

    pub fn callbacks(&self) -> usize {
        self.callbacks.load(Ordering::SeqCst)
    }
}

impl DiscordSdk for RecordingSdk {
    fn update_activity(&self, activity: Activity) -> ActivityFuture {
        self.sent.lock().push(activity);
        let result = self.result;
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn run_callbacks(&self) -> Result<(), DiscordError> {
        self.callbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out clones of one [`RecordingSdk`], or fails.
pub struct FakeConnector {
    pub sdk: RecordingSdk,
    pub fail: bool,
    pub connects: Arc<AtomicUsize>,
    pub client_ids: Arc<Mutex<Vec<i64>>>,
    pub connect_delay: Option<Duration>,
}

impl SdkConnector for FakeConnector {
    type Sdk = RecordingSdk;

    fn connect(&self, client_id: i64, _flags: CreateFlags) -> Result<RecordingSdk, DiscordError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.client_ids.lock().push(client_id);
        if let Some(delay) = self.connect_delay {
            std::thread::sleep(delay);
        }
        if self.fail {
            Err(DiscordError::NotRunning("no Discord in tests".into()))
        } else {
            Ok(self.sdk.clone())
        }
    }
}

pub struct Harness {
    pub rpc: RimRpc<FakeConnector>,
    pub sdk: RecordingSdk,
    pub clock: Arc<ManualClock>,
    pub colony: Arc<RwLock<ColonySnapshot>>,
    pub settings: SettingsHandle,
    pub connects: Arc<AtomicUsize>,
}

pub fn colony() -> ColonySnapshot {
    ColonySnapshot {
        clock: GameClock::Date(GameDate {
            days_passed: 5,
            quadrum: Quadrum::Septober,
            year: 5502,
            hour: 18,
        }),
        colonist_count: 4,
        biome: Some("Tundra".into()),
        colony_name: Some("Frostbite".into()),
    }
}

/// Only the colonist count, plus event display.
pub fn state_settings() -> RimRpcSettings {
    RimRpcSettings {
        show_events: true,
        colonist_count: true,
        ..RimRpcSettings::none()
    }
}

pub fn harness_with(config: RpcConfig, settings: RimRpcSettings, sdk: RecordingSdk, fail: bool) -> Harness {
    build_harness(config, settings, sdk, fail, None)
}

/// A harness whose handshake blocks for `delay`.
pub fn slow_connect_harness(settings: RimRpcSettings, delay: Duration) -> Harness {
    build_harness(RpcConfig::default(), settings, RecordingSdk::new(), false, Some(delay))
}

fn build_harness(
    config: RpcConfig,
    settings: RimRpcSettings,
    sdk: RecordingSdk,
    fail: bool,
    connect_delay: Option<Duration>,
) -> Harness {
    let clock = Arc::new(ManualClock::new(T0));
    let colony = Arc::new(RwLock::new(colony()));
    let settings = SettingsHandle::new(settings);
    let connects = Arc::new(AtomicUsize::new(0));
    let connector = FakeConnector {
        sdk: sdk.clone(),
        fail,
        connects: Arc::clone(&connects),
        client_ids: Arc::new(Mutex::new(Vec::new())),
        connect_delay,
    };
    let host = HostContext::new(colony.clone(), Handle::current()).with_clock(clock.clone());
    let rpc = RimRpc::new(config, settings.clone(), host, connector);
    Harness {
        rpc,
        sdk,
        clock,
        colony,
        settings,
        connects,
    }
}

pub fn harness(settings: RimRpcSettings) -> Harness {
    harness_with(RpcConfig::default(), settings, RecordingSdk::new(), false)
}

pub fn failing_harness(settings: RimRpcSettings) -> Harness {
    harness_with(RpcConfig::default(), settings, RecordingSdk::new(), true)
}
