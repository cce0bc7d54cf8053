//! First-login notification for flagged clients.

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

/// Announces a first login to the configured channel for clients flagged
/// `isTranscriberApp`. Fire-and-forget: delivery failures never surface.
pub struct SignupNotice;

impl Rule for SignupNotice {
    fn name(&self) -> &'static str {
        "signup-notice"
    }

    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        services: &'a ServiceContext,
    ) -> RuleFuture<'a> {
        Box::pin(async move {
            if !context.client_flag("isTranscriberApp") {
                return Ok(());
            }
            // Only the very first interactive login counts as a signup.
            if context.stats.logins_count > 1 || context.protocol == "oauth2-refresh-token" {
                return Ok(());
            }

            let email = user.email_or_empty();
            let who = user.name.as_deref().unwrap_or(email);
            let message = format!("New User: {who} ({email})");
            services
                .notifier
                .notify_signup(&message, &services.config.signup_channel)
                .await?;
            Ok(())
        })
    }
}
