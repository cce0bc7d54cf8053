//! User directory port: the identity platform's management surface.

use serde_json::{Map, Value};

use super::PortFuture;
use crate::profile::Profile;

/// The identity to attach to a primary profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDirective {
    /// Provider tag of the secondary identity.
    pub provider: String,
    /// Provider-assigned identifier of the secondary identity.
    pub provider_user_id: String,
}

/// Read/write access to profiles owned by the identity platform.
///
/// The directory owns profile persistence; this port only reads by email
/// and writes metadata or link directives. It never creates or deletes a
/// profile.
pub trait UserDirectory: Send + Sync {
    /// Returns all profiles whose email exactly matches `email`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, a non-2xx status,
    /// or an unparseable response body.
    fn find_profiles_by_email(&self, email: &str) -> PortFuture<'_, Vec<Profile>>;

    /// Replaces the user metadata of `user_id` with `metadata`.
    ///
    /// Full-replace semantics: the caller always sends the complete merged
    /// object.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or a non-2xx status.
    fn update_user_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
    ) -> PortFuture<'_, ()>;

    /// Replaces the app metadata of `user_id` with `metadata`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or a non-2xx status.
    fn update_app_metadata(
        &self,
        user_id: &str,
        metadata: &Map<String, Value>,
    ) -> PortFuture<'_, ()>;

    /// Attaches a secondary identity to the profile `primary_user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, or a non-2xx status.
    fn link_identity(
        &self,
        primary_user_id: &str,
        directive: &LinkDirective,
    ) -> PortFuture<'_, ()>;
}
