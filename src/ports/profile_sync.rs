//! Downstream profile sync port.

use super::PortFuture;
use crate::profile::Profile;

/// Pushes the authenticated profile to a downstream application.
///
/// Unlike the directory and notifier boundaries this call is not
/// best-effort: a failed push fails the login.
pub trait ProfileSync: Send + Sync {
    /// Sends `profile` downstream, keyed by the app-assigned `app_user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, a non-2xx status, or
    /// an application-level error in the response.
    fn push_profile(&self, app_user_id: &str, profile: &Profile) -> PortFuture<'_, ()>;
}
