//! # RimRPC Core Library
//!
//! Game-agnostic building blocks for publishing a player's in-game status
//! to a social-presence service.
//!
//! - [`RecentEventSlot`] — the single overwritable "last event" record
//!   shared between event hooks and the presence reporter
//! - [`Clock`] — wall-clock seconds, swappable for deterministic tests
//! - [`Translate`] — key → label lookup for presence text
//! - [`RpcConfig`] — `rimrpc.toml` configuration
//! - [`metrics`] — lock-free counters for the publish path
//!
//! ## Display Policy
//!
//! A recorded event replaces the bottom presence line while
//! `now - observed_at < display_window`. Expiry is checked at compute time;
//! nothing is ever scheduled.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod recent;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RpcConfig;
pub use error::RpcError;
pub use i18n::{KeyTable, Translate};
pub use recent::{RecentEvent, RecentEventSlot};
