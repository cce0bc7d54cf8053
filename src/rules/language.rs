//! Interface-language capture from the authorization request.

use serde_json::{json, Map, Value};

use super::{Rule, RuleFuture};
use crate::context::ServiceContext;
use crate::login::LoginContext;
use crate::profile::Profile;

/// Persists the requested interface language into user metadata for
/// `isXForgeApp` clients.
pub struct InterfaceLanguage;

/// The `language` parameter is either a bare tag (`"fr"`) or a JSON blob
/// like `{"tag": "fr-CA", ...}`.
fn parse_language(raw: &str) -> String {
    if raw.len() > 3 && raw.contains("tag") {
        return serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|v| v.get("tag").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| "en".to_string());
    }
    raw.to_string()
}

impl Rule for InterfaceLanguage {
    fn name(&self) -> &'static str {
        "interface-language"
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
            let Some(raw) = context.request.query.get("language").filter(|l| !l.is_empty())
            else {
                return Ok(());
            };

            let language = parse_language(raw);
            let metadata = user.user_metadata.get_or_insert_with(Map::new);
            metadata.insert("interface_language".into(), json!(language));
            let snapshot = metadata.clone();
            services.directory.update_user_metadata(&user.user_id, &snapshot).await?;
            Ok(())
        })
    }
}
