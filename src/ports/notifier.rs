//! Notification sink port for signup announcements.

use super::PortFuture;

/// Delivers fire-and-forget notifications to a chat channel.
///
/// Implementations must swallow delivery failures: a broken webhook must
/// never affect a login.
pub trait Notifier: Send + Sync {
    /// Posts `message` to `channel`. Always resolves `Ok`.
    fn notify_signup(&self, message: &str, channel: &str) -> PortFuture<'_, ()>;
}
