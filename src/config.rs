//! Build-time configuration.
//!
//! The console is shipped as a static WASM bundle, so configuration is
//! read when the bundle is compiled. Every key falls back to a default.

use thiserror::Error;
use url::Url;

// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

const DEFAULT_API_URI: &str = "http://localhost:4000";
const DEFAULT_CUSTOMER_USER_TYPE: &str = "customer";
const DEFAULT_GEO_ECHO_URL: &str = "https://ipapi.co/json/";

pub const KEY_API_URI: &str = "ZATCA_API_URI";
pub const KEY_CUSTOMER_USER_TYPE: &str = "ZATCA_CUSTOMER_USER_TYPE";
pub const KEY_IMAGE_HOSTS: &str = "ZATCA_IMAGE_HOSTS";
pub const KEY_GEO_ECHO_URL: &str = "ZATCA_GEO_ECHO_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be an http(s) URL, got {value:?}")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API origin without trailing slash.
    pub api_base: String,
    /// User type id whose users are listed on the user page.
    pub customer_user_type: String,
    /// Hosts the grid may load thumbnails from.
    pub image_hosts: Vec<String>,
    /// Public echo endpoint used to fingerprint the login device.
    pub geo_echo_url: String,
}

impl AppConfig {
    /// Builds a config from any key lookup (env vars, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_base = get(KEY_API_URI, DEFAULT_API_URI);
        let api_base = require_http(KEY_API_URI, api_base.trim_end_matches('/').to_string())?;
        let geo_echo_url = require_http(KEY_GEO_ECHO_URL, get(KEY_GEO_ECHO_URL, DEFAULT_GEO_ECHO_URL))?;

        let image_hosts = lookup(KEY_IMAGE_HOSTS)
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_ascii_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_base,
            customer_user_type: get(KEY_CUSTOMER_USER_TYPE, DEFAULT_CUSTOMER_USER_TYPE),
            image_hosts,
            geo_echo_url,
        })
    }

    /// Reads the values baked in at compile time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                KEY_API_URI => option_env!("ZATCA_API_URI"),
                KEY_CUSTOMER_USER_TYPE => option_env!("ZATCA_CUSTOMER_USER_TYPE"),
                KEY_IMAGE_HOSTS => option_env!("ZATCA_IMAGE_HOSTS"),
                KEY_GEO_ECHO_URL => option_env!("ZATCA_GEO_ECHO_URL"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.api_base)
    }

    pub fn upload_endpoint(&self) -> String {
        format!("{}/api/upload", self.api_base)
    }

    /// API origin as a base URL; paths below it keep the API prefix.
    fn api_root(&self) -> Option<Url> {
        Url::parse(&format!("{}/", self.api_base)).ok()
    }

    /// Absolute URL for a stored asset path.
    pub fn asset_url(&self, path: &str) -> String {
        if parse_http(path).is_some() {
            return path.to_string();
        }
        self.api_root()
            .and_then(|root| root.join(path.trim_start_matches('/')).ok())
            .map(String::from)
            .unwrap_or_else(|| format!("{}/{}", self.api_base, path.trim_start_matches('/')))
    }

    /// Whether a thumbnail may be loaded from `url`.
    ///
    /// The URL is resolved against the API the way a browser would, so
    /// relative paths land on the API host.
    pub fn allows_image(&self, url: &str) -> bool {
        let Some(root) = self.api_root() else {
            return false;
        };
        let Ok(resolved) = root.join(url) else {
            return false;
        };
        if !is_http_scheme(&resolved) {
            return false;
        }
        match resolved.host_str() {
            Some(host) => {
                root.host_str() == Some(host) || self.image_hosts.iter().any(|h| h == host)
            }
            None => false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_URI.to_string(),
            customer_user_type: DEFAULT_CUSTOMER_USER_TYPE.to_string(),
            image_hosts: Vec::new(),
            geo_echo_url: DEFAULT_GEO_ECHO_URL.to_string(),
        }
    }
}

fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// An absolute http(s) URL with a host.
fn parse_http(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|url| is_http_scheme(url) && url.host_str().is_some())
}

fn require_http(key: &'static str, value: String) -> Result<String, ConfigError> {
    if parse_http(&value).is_some() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { key, value })
    }
}
