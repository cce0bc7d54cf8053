//! App-metadata bootstrap and claims for flagged clients.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

const USER_ID_CLAIM: &str = "http://xforge.org/userid";
const ROLE_CLAIM: &str = "http://xforge.org/role";

/// Ensures `isXForgeApp` clients see an app-assigned user id and role.
///
/// First login generates the id, persists it via the directory, and fails
/// the login if persistence fails (the downstream app cannot function
/// without it). Subsequent logins only attach the claims.
pub struct AppBootstrap;

impl Rule for AppBootstrap {
    fn name(&self) -> &'static str {
        "app-metadata-bootstrap"
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

            let metadata = user.app_metadata.get_or_insert_with(Map::new);
            let already_assigned = metadata.get("xf_user_id").is_some_and(Value::is_string)
                && metadata.get("xf_role").is_some_and(Value::is_string);

            if !already_assigned {
                metadata
                    .insert("xf_user_id".into(), json!(Uuid::new_v4().simple().to_string()));
                metadata.insert("xf_role".into(), json!("user"));
                let snapshot = metadata.clone();
                services.directory.update_app_metadata(&user.user_id, &snapshot).await?;
            }

            let metadata = user.app_metadata.as_ref().ok_or("app metadata vanished")?;
            context
                .access_token
                .insert(USER_ID_CLAIM.into(), metadata["xf_user_id"].clone());
            context.access_token.insert(ROLE_CLAIM.into(), metadata["xf_role"].clone());
            Ok(())
        })
    }
}
