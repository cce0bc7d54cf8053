//! Shared fixture builders for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::profile::{Identity, Profile};

/// Builds a verified profile whose identity is derived from splitting
/// `user_id` at the first `|`.
pub fn profile(user_id: &str, email: &str) -> Profile {
    let (provider, provider_user_id) = user_id.split_once('|').unwrap_or(("auth0", user_id));
    Profile {
        user_id: user_id.into(),
        email: Some(email.into()),
        email_verified: true,
        name: None,
        identities: vec![Identity {
            provider: provider.into(),
            provider_user_id: provider_user_id.into(),
            is_social: provider != "auth0",
        }],
        user_metadata: None,
        app_metadata: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Like [`profile`] but with explicit creation and update times.
pub fn profile_at(
    user_id: &str,
    email: &str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Profile {
    let mut p = profile(user_id, email);
    p.created_at = created_at;
    p.updated_at = updated_at;
    p
}

/// Shorthand for a UTC timestamp on a given day and hour in 2024.
pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}
