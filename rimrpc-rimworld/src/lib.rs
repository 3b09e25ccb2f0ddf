//! # rimrpc-rimworld — RimWorld Integration for RimRPC
//!
//! This crate connects the game-agnostic `rimrpc-core` to a running
//! colony and to the presence SDK in `rimrpc-discord`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  Host game                        │
//! │   HostHooks ──► GameEventSource     ColonyView    │
//! │                      │                  │         │
//! │  ┌───────────────────┼──────────────────┼──────┐  │
//! │  │ rimrpc-rimworld   ▼                  ▼      │  │
//! │  │   EventObserver ──► RecentEventSlot ──►     │  │
//! │  │                          PresenceReporter   │  │
//! │  │                                 │           │  │
//! │  │                                 ▼           │  │
//! │  │                      rimrpc-discord (SDK)   │  │
//! │  └─────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events` — Game events that can become the "recent event"
//! - `hooks` — The event-source seam and hook installation
//! - `bridge` — Read-only view of colony state (date, biome, colonists)
//! - `compose` — Builds the details and state lines from settings
//! - `reporter` — Computes and publishes presence
//! - `lifecycle` — Initialize / update / shutdown entry points
//! - `config` — Player-facing mod settings
//! - `logging` — `tracing` subscriber setup

pub mod bridge;
pub mod compose;
pub mod config;
pub mod events;
pub mod hooks;
pub mod lifecycle;
pub mod logging;
pub mod reporter;

pub use bridge::{ColonySnapshot, ColonyView, GameClock, GameDate, Quadrum};
pub use config::{RimRpcSettings, SettingsHandle};
pub use events::{GameEvent, IncidentOutcome, PlacedStructure, StructureCategory};
pub use hooks::{EventObserver, GameEventSource, HookError, HostHooks};
pub use lifecycle::RimRpc;
pub use reporter::{HostContext, PresenceReporter, PublishOutcome};
