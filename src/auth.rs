//! Credentials sign-in, session resolution and sign-up.

use serde::Deserialize;
use tracing::{info, warn};
use zatca_shared::graphql::{Login, LoginArgs, Me, NoVariables, Register, RegisterArgs, RegisterInput};
use zatca_shared::{DeviceInfo, UserProfile, UserRecord};

use crate::api::GraphqlClient;
use crate::cookies::CookieStore;
use crate::error::{ApiResult, FieldErrors};
use crate::request::{HttpClient, HttpMethod, HttpRequest};

const MIN_PASSWORD_LEN: usize = 8;

/// Subset of the IP-geolocation echo response.
#[derive(Debug, Deserialize)]
struct GeoEcho {
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

pub struct AuthService<'a, H, K> {
    client: &'a GraphqlClient<H, K>,
    geo_echo_url: String,
}

impl<'a, H: HttpClient, K: CookieStore> AuthService<'a, H, K> {
    pub fn new(client: &'a GraphqlClient<H, K>, geo_echo_url: &str) -> Self {
        Self {
            client,
            geo_echo_url: geo_echo_url.to_string(),
        }
    }

    /// Device fingerprint. A failed geolocation lookup still yields the
    /// device id; it never blocks the login.
    pub async fn device_info(&self) -> DeviceInfo {
        let mut device = DeviceInfo {
            device_id: self.client.cookies().device_id(),
            ..DeviceInfo::default()
        };

        let req = HttpRequest::new(&self.geo_echo_url, HttpMethod::Get)
            .with_header("Accept", "application/json");
        let echo = match self.client.http().send(req).await {
            Ok(resp) if resp.ok() => resp.json::<GeoEcho>().ok(),
            Ok(resp) => {
                warn!(status = resp.status, "geolocation lookup rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, "geolocation lookup failed");
                None
            }
        };

        if let Some(echo) = echo {
            device.ip = echo.ip;
            device.country = echo.country_name;
            device.city = echo.city;
        }
        device
    }

    /// Runs the login mutation and stores the cookie pair.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserRecord> {
        let device = self.device_info().await;
        let payload = self
            .client
            .execute::<Login>(&LoginArgs {
                email: email.trim().to_string(),
                password: password.to_string(),
                device,
            })
            .await?;

        let user = payload.user.into_record(payload.access_token);
        self.client.cookies().persist(&user);
        self.client.clear_cache();
        info!(user = %user.email, "signed in");
        Ok(user)
    }

    /// One-shot "who am I". A missing cookie or a failed call both mean
    /// signed out; a failed call also drops the stale cookies.
    pub async fn resolve_session(&self) -> Option<UserRecord> {
        let cookies = self.client.cookies();
        let token = cookies.access_token()?;

        match self.client.execute::<Me>(&NoVariables {}).await {
            Ok(profile) => {
                let user = profile.into_record(token);
                cookies.persist(&user);
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "session could not be resolved; clearing cookies");
                cookies.clear();
                None
            }
        }
    }

    pub fn logout(&self) {
        self.client.cookies().clear();
        self.client.clear_cache();
        info!("signed out");
    }

    /// Creates an administrator account. No session is started.
    pub async fn register(&self, input: RegisterInput) -> ApiResult<UserProfile> {
        let profile = self
            .client
            .execute::<Register>(&RegisterArgs { input })
            .await?;
        info!(user = %profile.email, "account registered");
        Ok(profile)
    }
}

/// Local checks run before the login mutation.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if email.trim().is_empty() {
        errors.insert("email".into(), "E-mail is required".into());
    } else if !email.contains('@') {
        errors.insert("email".into(), "Invalid e-mail address".into());
    }
    if password.is_empty() {
        errors.insert("password".into(), "Password is required".into());
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Local checks run before the register mutation.
pub fn validate_registration(input: &RegisterInput, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = validate_credentials(&input.email, &input.password)
        .err()
        .unwrap_or_default();
    if input.name.trim().is_empty() {
        errors.insert("name".into(), "Name is required".into());
    }
    if !input.password.is_empty() && input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password".into(),
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if input.password != confirm {
        errors.insert("confirm".into(), "Passwords do not match".into());
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests;
