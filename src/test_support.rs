//! Fixtures shared by the unit tests.

use serde_json::{Value, json};
use zatca_shared::UserRecord;

use crate::api::GraphqlClient;
use crate::config::AppConfig;
use crate::cookies::MemoryCookies;
use crate::request::MockHttpClient;

pub const GRAPHQL_URL: &str = "http://localhost:4000/graphql";
pub const UPLOAD_URL: &str = "http://localhost:4000/api/upload";
pub const GEO_URL: &str = "https://ipapi.co/json/";

pub fn admin() -> UserRecord {
    user_with_roles(&["SUPER_ADMIN"])
}

pub fn user_with_roles(roles: &[&str]) -> UserRecord {
    UserRecord {
        id: "1".into(),
        name: "Admin".into(),
        email: "admin@zatca.app".into(),
        access_token: "tok-1".into(),
        admin_roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

/// `{"data": {field: value}}`
pub fn data(field: &str, value: Value) -> Value {
    json!({ "data": { field: value } })
}

/// `{"errors": [{"message": ..., "extensions": {"validation": fields}}]}`
pub fn validation_errors(fields: Value) -> Value {
    json!({
        "data": null,
        "errors": [{
            "message": "Bad user input",
            "extensions": { "code": "BAD_USER_INPUT", "validation": fields }
        }]
    })
}

pub fn client<'a>(
    mock: &'a MockHttpClient,
    jar: &MemoryCookies,
) -> GraphqlClient<&'a MockHttpClient, MemoryCookies> {
    GraphqlClient::new(mock, jar.clone(), &AppConfig::default())
}
