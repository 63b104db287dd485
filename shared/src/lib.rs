use serde::{Deserialize, Serialize};

mod entity;
pub mod graphql;
pub mod navigation;

pub use entity::*;
pub use navigation::{NAVIGATION, NavigationEntry};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// Fixed page size of every list query.
pub const PAGE_SIZE: u32 = 10;
/// Quiet period before a search input is propagated to the list query.
pub const SEARCH_DEBOUNCE_MS: u32 = 500;
/// Cookie holding the serialized `UserRecord`.
pub const COOKIE_USER_DATA: &str = "userData";
/// Cookie holding the bearer token.
pub const COOKIE_ACCESS_TOKEN: &str = "accessToken";
/// Form part name expected by the upload endpoint.
pub const UPLOAD_FIELD: &str = "file";

// =========================================================
// 会话模型 (Session Models)
// =========================================================

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub admin_roles: Vec<String>,
}

/// Profile returned by the `me` query and nested in the login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub admin_roles: Vec<String>,
}

impl UserProfile {
    pub fn into_record(self, access_token: impl Into<String>) -> UserRecord {
        UserRecord {
            id: self.id,
            name: self.name,
            email: self.email,
            access_token: access_token.into(),
            admin_roles: self.admin_roles,
        }
    }
}

/// Device fingerprint sent along with credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Response of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub path: String,
}
