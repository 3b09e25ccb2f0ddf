//! # rimrpc-discord — Presence SDK Layer for RimRPC
//!
//! Everything that talks to the presence service goes through the
//! [`DiscordSdk`] trait:
//!   - **`IpcSdk`** — Discord's local IPC socket (Unix only)
//!   - any host-provided binding implementing [`DiscordSdk`]
//!
//! Publishing is fire-and-forget from the caller's point of view:
//! [`DiscordSdk::update_activity`] returns a `'static` future that the
//! caller spawns and only inspects for logging.
//!
//! # Wire Shape (IPC backend)
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────────────┐
//! │ opcode u32LE │ length u32LE │ JSON payload (len B) │
//! └──────────────┴──────────────┴──────────────────────┘
//! HANDSHAKE → READY, then FRAME { cmd: SET_ACTIVITY, nonce } per publish
//! ```

pub mod error;
#[cfg(unix)]
pub mod ipc;
pub mod sdk;
pub mod types;

pub use error::DiscordError;
#[cfg(unix)]
pub use ipc::{IpcConnector, IpcSdk};
pub use sdk::{ActivityFuture, DiscordSdk, SdkConnector};
pub use types::{Activity, ActivityAssets, ActivityTimestamps, CreateFlags, SdkResult};
