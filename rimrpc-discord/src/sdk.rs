//! The presence SDK seam.
//!
//! The reporter only needs two things from a presence backend: push an
//! activity, and pump whatever callbacks the backend queues. Creation is
//! split into [`SdkConnector`] so the lifecycle can retry nothing and still
//! be tested without a Discord client.

use std::future::Future;
use std::pin::Pin;

use crate::error::DiscordError;
use crate::types::{Activity, CreateFlags, SdkResult};

/// Future returned by [`DiscordSdk::update_activity`].
///
/// `'static` so it can be spawned and outlive the borrow of the SDK.
pub type ActivityFuture = Pin<Box<dyn Future<Output = SdkResult> + Send + 'static>>;

/// A connected presence client.
pub trait DiscordSdk: Send + Sync + 'static {
    /// Replace the current activity. Resolves once the service answers.
    fn update_activity(&self, activity: Activity) -> ActivityFuture;

    /// Process queued SDK callbacks. Called once per host frame.
    ///
    /// # Errors
    /// Returns an error if the backend has detected that it is no longer
    /// usable.
    fn run_callbacks(&self) -> Result<(), DiscordError>;
}

/// Creates [`DiscordSdk`] clients.
pub trait SdkConnector: Send + Sync {
    /// The client type produced.
    type Sdk: DiscordSdk;

    /// Construct a client for `client_id`.
    ///
    /// # Errors
    /// Returns an error if the service cannot be reached or refuses the
    /// application id.
    fn connect(&self, client_id: i64, flags: CreateFlags) -> Result<Self::Sdk, DiscordError>;
}
