//! Login-time rules, executed as a sequential pipeline.
//!
//! Each rule receives the authenticated profile and the mutable login
//! context, mirroring the platform's `(user, context, callback)` shape. A
//! rule that errors fails the login; best-effort boundaries swallow their
//! own failures instead of erroring.

pub mod access_claims;
pub mod app_bootstrap;
pub mod id_claims;
pub mod language;
pub mod link_accounts;
pub mod profile_push;
pub mod signup_notice;

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

/// Boxed future type alias used by [`Rule`] to keep the trait
/// dyn-compatible.
pub type RuleFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// One login-time rule.
pub trait Rule: Send + Sync {
    /// Stable rule name, used for listing and logs.
    fn name(&self) -> &'static str;

    /// Applies the rule, mutating the profile and login context in place.
    ///
    /// # Errors
    ///
    /// Returns an error to fail the login; rules over best-effort
    /// boundaries must not error for those boundaries' failures.
    fn apply<'a>(
        &'a self,
        user: &'a mut Profile,
        context: &'a mut LoginContext,
        services: &'a ServiceContext,
    ) -> RuleFuture<'a>;
}

/// An ordered set of rules run one after another.
pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl Pipeline {
    /// The standard deployment pipeline, in execution order.
    ///
    /// Linking runs first so every later rule sees the surviving profile.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(link_accounts::LinkAccounts),
                Box::new(app_bootstrap::AppBootstrap),
                Box::new(language::InterfaceLanguage),
                Box::new(id_claims::IdTokenNameClaims),
                Box::new(access_claims::AccessTokenEmailClaim),
                Box::new(signup_notice::SignupNotice),
                Box::new(profile_push::ProfilePush),
            ],
        }
    }

    /// Names of the rules in execution order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs every rule in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the failing rule's name and error, which fails the login.
    pub async fn run(
        &self,
        user: &mut Profile,
        context: &mut LoginContext,
        services: &ServiceContext,
    ) -> Result<(), String> {
        for rule in &self.rules {
            rule.apply(user, context, services)
                .await
                .map_err(|e| format!("Rule {} failed: {e}", rule.name()))?;
        }
        Ok(())
    }
}
