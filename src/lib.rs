//! Platform-independent core of the Zatca admin console.
//!
//! Everything here compiles natively and is tested with a mock
//! transport; the `frontend` crate only wires it into Leptos.

pub mod ability;
pub mod api;
pub mod auth;
pub mod config;
pub mod cookies;
pub mod debounce;
pub mod error;
pub mod form;
pub mod guard;
pub mod list;
pub mod notify;
pub mod request;
pub mod route;
pub mod session;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use ability::{AbilityCache, AbilityDecision, AbilitySet, Capability, ability_guard};
pub use api::{FetchPolicy, GraphqlClient};
pub use auth::AuthService;
pub use config::{AppConfig, ConfigError};
pub use cookies::CookieStore;
pub use error::{ApiError, ApiResult, FieldErrors};
pub use guard::{GuardDecision, auth_guard, guest_guard, login_redirect, post_login_target};
pub use notify::{Notifier, Toast, ToastId, ToastKind};
pub use request::{HttpClient, TransportError};
pub use route::{AppRoute, Location};
pub use session::{Session, SessionAction, SessionCookies, SessionStatus};

// Re-exported so the frontend depends on one crate for domain types.
pub use zatca_shared as shared;
