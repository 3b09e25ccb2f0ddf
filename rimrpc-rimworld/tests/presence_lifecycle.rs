//! Integration Tests — event → slot → presence → SDK
//!
//! Drives the full integration through its public entry points with a
//! recording SDK and a manual clock.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use rimrpc_core::RpcConfig;
use rimrpc_discord::SdkResult;
use rimrpc_rimworld::{
    GameClock, GameEvent, GameEventSource, HookError, HostHooks, IncidentOutcome, PlacedStructure,
    PublishOutcome, RimRpcSettings, StructureCategory,
};

use common::{
    RecordingSdk, T0, failing_harness, harness, harness_with, slow_connect_harness, state_settings,
};

async fn publish(h: &common::Harness) -> PublishOutcome {
    h.rpc
        .update_presence()
        .expect("initialised integration publishes")
        .await
        .expect("publish task")
}

// ---------------------------------------------------------------------------
// Display policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn last_write_wins() {
    let h = harness(state_settings());
    assert!(h.rpc.initialize());

    let observer = h.rpc.observer();
    observer.on_raid_resolved(IncidentOutcome::Succeeded);
    observer.on_message("Doris is hungry");

    assert_eq!(publish(&h).await, PublishOutcome::Published);
    assert_eq!(h.sdk.last().state, "Doris is hungry");
}

#[tokio::test]
async fn event_expires_after_window() {
    let h = harness(state_settings());
    h.rpc.initialize();
    h.rpc.observer().on_message("X");

    h.clock.advance(59);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "X");

    h.clock.advance(2);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "Colonists: 4");
}

#[tokio::test]
async fn disabling_events_forgets_the_current_one() {
    let h = harness(state_settings());
    h.rpc.initialize();
    h.rpc.observer().on_message("X");

    h.settings.update(|s| s.show_events = false);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "Colonists: 4");

    h.settings.update(|s| s.show_events = true);
    h.clock.advance(5);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "Colonists: 4");
    assert_eq!(h.rpc.counters().slot_clears, 1);
}

#[tokio::test]
async fn configured_window_is_respected() {
    let mut config = RpcConfig::default();
    config.events.display_window_secs = 10;
    let h = harness_with(config, state_settings(), RecordingSdk::new(), false);
    h.rpc.initialize();
    h.rpc.observer().on_message("short");

    h.clock.advance(9);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "short");
    h.clock.advance(1);
    publish(&h).await;
    assert_eq!(h.sdk.last().state, "Colonists: 4");
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn details_follow_day_quadrum_hour_order() {
    let h = harness(RimRpcSettings {
        day: true,
        quadrum: true,
        hour: true,
        ..RimRpcSettings::none()
    });
    h.rpc.initialize();
    publish(&h).await;
    assert_eq!(h.sdk.last().details, "Day: 5 Septober Hour: 18");
}

#[tokio::test]
async fn custom_top_overrides_everything() {
    let h = harness(RimRpcSettings {
        custom_top: true,
        custom_top_text: "Just vibing".into(),
        ..RimRpcSettings::default()
    });
    h.rpc.initialize();
    publish(&h).await;
    assert_eq!(h.sdk.last().details, "Just vibing");
}

#[tokio::test]
async fn colony_changes_show_up_on_next_tick() {
    let h = harness(RimRpcSettings {
        day: true,
        colony: true,
        ..RimRpcSettings::none()
    });
    h.rpc.initialize();
    publish(&h).await;
    assert_eq!(h.sdk.last().details, "Day: 5\nColony: Frostbite");

    h.colony.write().clock = GameClock::MainMenu;
    h.colony.write().colony_name = None;
    publish(&h).await;
    assert_eq!(h.sdk.last().details, "In the main menu\nColony: Colony");
}

#[tokio::test]
async fn static_fields_are_published() {
    let h = harness(state_settings());
    h.rpc.initialize();
    h.clock.advance(3_600);
    publish(&h).await;

    let activity = h.sdk.last();
    assert_eq!(activity.timestamps.start, T0);
    assert_eq!(activity.assets.large_image, "logo");
    assert_eq!(activity.assets.large_text, "RimWorld");
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uninitialised_update_is_a_no_op() {
    let h = harness(RimRpcSettings {
        show_events: false,
        ..state_settings()
    });
    h.rpc.observer().on_message("kept");

    assert!(h.rpc.update_presence().is_none());
    assert!(h.sdk.sent().is_empty());
    // Even with event display off, the slot is untouched.
    assert_eq!(h.rpc.reporter().slot().snapshot().text, "kept");
}

#[tokio::test]
async fn failed_initialisation_is_permanent() {
    let h = failing_harness(state_settings());
    assert!(!h.rpc.initialize());
    assert!(!h.rpc.initialize());
    assert_eq!(h.connects.load(Ordering::SeqCst), 1);

    assert!(h.rpc.boot().is_none());
    assert!(h.rpc.on_main_menu().is_none());
    h.rpc.update();
    assert!(h.sdk.sent().is_empty());
    assert_eq!(h.sdk.callbacks(), 0);
}

#[tokio::test]
async fn disabled_config_never_connects() {
    let mut config = RpcConfig::default();
    config.general.enabled = false;
    let h = harness_with(config, state_settings(), RecordingSdk::new(), false);
    assert!(!h.rpc.initialize());
    assert_eq!(h.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn boot_connects_and_publishes() {
    let h = harness(state_settings());
    let pending = h.rpc.boot().expect("boot publishes");
    assert_eq!(pending.await.expect("publish task"), PublishOutcome::Published);
    assert!(h.rpc.is_initialized());
    assert_eq!(h.sdk.sent().len(), 1);
    assert_eq!(h.rpc.counters().presence_published, 1);

    h.rpc
        .on_main_menu()
        .expect("main menu publishes")
        .await
        .expect("publish task");
    assert_eq!(h.sdk.sent().len(), 2);
}

#[tokio::test]
async fn shutdown_is_idempotent_and_disables_updates() {
    let h = harness(state_settings());
    h.rpc.initialize();
    h.rpc.update();
    assert_eq!(h.sdk.callbacks(), 1);

    h.rpc.shutdown();
    h.rpc.shutdown();
    assert!(!h.rpc.is_initialized());

    h.rpc.update();
    assert_eq!(h.sdk.callbacks(), 1);
    assert!(h.rpc.update_presence().is_none());
}

#[tokio::test]
async fn frame_update_is_not_blocked_by_a_slow_handshake() {
    let h = slow_connect_harness(state_settings(), Duration::from_millis(800));

    let elapsed = std::thread::scope(|scope| {
        let connecting = scope.spawn(|| h.rpc.initialize());
        std::thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        h.rpc.update();
        assert!(!h.rpc.is_initialized());
        let elapsed = started.elapsed();

        assert!(connecting.join().expect("initialize thread"));
        elapsed
    });

    assert!(elapsed < Duration::from_millis(400), "update waited {elapsed:?}");
    assert!(h.rpc.is_initialized());
    assert_eq!(h.connects.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Publish outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_publish_is_counted_not_retried() {
    let mut sdk = RecordingSdk::new();
    sdk.result = SdkResult::InvalidPayload;
    let h = harness_with(RpcConfig::default(), state_settings(), sdk, false);
    h.rpc.initialize();

    assert_eq!(
        publish(&h).await,
        PublishOutcome::Rejected(SdkResult::InvalidPayload)
    );
    assert_eq!(h.sdk.sent().len(), 1);
    assert_eq!(h.rpc.counters().publish_rejected, 1);
}

#[tokio::test(start_paused = true)]
async fn hung_sdk_times_out() {
    let mut sdk = RecordingSdk::new();
    sdk.delay = Some(Duration::from_secs(600));
    let h = harness_with(RpcConfig::default(), state_settings(), sdk, false);
    h.rpc.initialize();

    assert_eq!(publish(&h).await, PublishOutcome::TimedOut);
    assert_eq!(h.rpc.counters().publish_timeouts, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_publish_does_not_block_the_next_tick() {
    let mut sdk = RecordingSdk::new();
    sdk.delay = Some(Duration::from_secs(2));
    let h = harness_with(RpcConfig::default(), state_settings(), sdk, false);
    h.rpc.initialize();

    let first = h.rpc.update_presence().expect("publishes");
    let second = h.rpc.update_presence().expect("publishes");
    assert_eq!(h.sdk.sent().len(), 2);
    assert_eq!(first.await.expect("task"), PublishOutcome::Published);
    assert_eq!(second.await.expect("task"), PublishOutcome::Published);
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// A host that replays a fixed script of events once subscribed.
struct ScriptedHost {
    script: Vec<GameEvent>,
}

impl HostHooks for ScriptedHost {
    fn subscribe(&mut self, source: Arc<dyn GameEventSource>) -> Result<(), HookError> {
        for event in self.script.drain(..) {
            event.dispatch(source.as_ref());
        }
        Ok(())
    }
}

struct BrokenHost;

impl HostHooks for BrokenHost {
    fn subscribe(&mut self, _source: Arc<dyn GameEventSource>) -> Result<(), HookError> {
        Err(HookError::Unsupported("structure"))
    }
}

#[tokio::test]
async fn host_events_reach_presence() {
    let h = harness(state_settings());
    h.rpc.initialize();

    let mut host = ScriptedHost {
        script: vec![
            GameEvent::RaidResolved {
                outcome: IncidentOutcome::Succeeded,
            },
            GameEvent::StructurePlaced {
                structure: PlacedStructure::new("Wall", StructureCategory::Building),
            },
        ],
    };
    assert!(h.rpc.install_hooks(&mut host));

    publish(&h).await;
    // The wall is filtered out, so the raid is still showing.
    assert_eq!(h.sdk.last().state, "Raiders are attacking the colony!");
    let counters = h.rpc.counters();
    assert_eq!(counters.events_recorded, 1);
    assert_eq!(counters.events_ignored, 1);
}

#[tokio::test]
async fn hook_failure_is_swallowed() {
    let h = harness(state_settings());
    assert!(!h.rpc.install_hooks(&mut BrokenHost));
    assert!(h.rpc.initialize());
}
