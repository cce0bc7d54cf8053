//! Downstream profile sync for flagged clients.

use serde_json::Value;

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

/// Pushes the authenticated profile to the downstream app for clients
/// flagged `isXForgeApp`, skipping silent-auth (`prompt=none`) requests.
///
/// This is the one deliberately strict boundary: a failed push fails the
/// login.
pub struct ProfilePush;

impl Rule for ProfilePush {
    fn name(&self) -> &'static str {
        "profile-push"
    }

    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        services: &'a ServiceContext,
    ) -> RuleFuture<'a> {
        Box::pin(async move {
            if !context.client_flag("isXForgeApp") {
                return Ok(());
            }
            if context.request.query.get("prompt").is_some_and(|p| p == "none") {
                return Ok(());
            }

            let app_user_id = user
                .app_metadata
                .as_ref()
                .and_then(|m| m.get("xf_user_id"))
                .and_then(Value::as_str)
                .ok_or("app metadata has no xf_user_id to push under")?
                .to_string();
            services.profile_sync.push_profile(&app_user_id, user).await?;
            Ok(())
        })
    }
}
