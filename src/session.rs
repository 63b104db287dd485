//! 会话状态 (Session state)
//!
//! `Session` is only ever changed through [`Session::reduce`]; the
//! frontend keeps it in a signal and dispatches [`SessionAction`]s.
//!
//! ```text
//! Uninitialized --Resolving--> Loading --SessionResolved(Some)--> Authenticated
//!                                      --SessionResolved(None)--> Unauthenticated
//! any --LoginSuccess--> Authenticated      any --Logout--> Unauthenticated
//! ```

use tracing::{info, warn};
use uuid::Uuid;
use zatca_shared::{COOKIE_ACCESS_TOKEN, COOKIE_USER_DATA, UserRecord};

use crate::cookies::CookieStore;

/// Cookie holding the device id.
pub const COOKIE_DEVICE_ID: &str = "deviceId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Uninitialized,
    Loading,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub loading: bool,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// The one-shot "who am I" call started.
    Resolving,
    /// The "who am I" call finished; `None` on failure or missing cookie.
    SessionResolved(Option<UserRecord>),
    LoginSuccess(UserRecord),
    Logout,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match (self.initialized, self.loading, &self.user) {
            (_, true, _) => SessionStatus::Loading,
            (false, false, _) => SessionStatus::Uninitialized,
            (true, false, Some(_)) => SessionStatus::Authenticated,
            (true, false, None) => SessionStatus::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Roles of the signed-in user; empty when signed out.
    pub fn roles(&self) -> &[String] {
        self.user
            .as_ref()
            .map(|u| u.admin_roles.as_slice())
            .unwrap_or(&[])
    }

    pub fn reduce(&mut self, action: SessionAction) {
        match action {
            SessionAction::Resolving => {
                if self.initialized {
                    warn!("session resolution requested twice; ignoring");
                    return;
                }
                self.loading = true;
            }
            SessionAction::SessionResolved(user) => {
                info!(authenticated = user.is_some(), "session resolved");
                self.user = user;
                self.loading = false;
                self.initialized = true;
            }
            SessionAction::LoginSuccess(user) => {
                info!(user = %user.email, "login succeeded");
                self.user = Some(user);
                self.loading = false;
                self.initialized = true;
            }
            SessionAction::Logout => {
                info!("logged out");
                self.user = None;
                self.loading = false;
                self.initialized = true;
            }
        }
    }

    /// Returns the next state without mutating `self`.
    pub fn reduced(mut self, action: SessionAction) -> Self {
        self.reduce(action);
        self
    }
}

// =========================================================
// Cookie persistence
// =========================================================

/// Reads and writes the session cookie pair.
#[derive(Debug, Clone)]
pub struct SessionCookies<K> {
    store: K,
}

impl<K: CookieStore> SessionCookies<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// A token cookie is what the guards treat as "has a session".
    pub fn has_session(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.store
            .get(COOKIE_ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
    }

    /// User stored at login; `None` when missing or unreadable.
    pub fn stored_user(&self) -> Option<UserRecord> {
        let raw = self.store.get(COOKIE_USER_DATA)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding unreadable user cookie");
                None
            }
        }
    }

    pub fn persist(&self, user: &UserRecord) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                self.store.set(COOKIE_USER_DATA, &raw);
                self.store.set(COOKIE_ACCESS_TOKEN, &user.access_token);
            }
            Err(e) => warn!(error = %e, "failed to serialize user cookie"),
        }
    }

    /// Stable per-browser id sent with every login. Survives logout.
    pub fn device_id(&self) -> String {
        if let Some(id) = self.store.get(COOKIE_DEVICE_ID).filter(|id| !id.is_empty()) {
            return id;
        }
        let id = Uuid::new_v4().to_string();
        self.store.set(COOKIE_DEVICE_ID, &id);
        id
    }

    /// Removes both cookies together.
    pub fn clear(&self) {
        self.store.remove(COOKIE_USER_DATA);
        self.store.remove(COOKIE_ACCESS_TOKEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::MemoryCookies;
    use crate::test_support::admin;


    #[test]
    fn test_state_machine() {
        let s = Session::default();
        assert_eq!(s.status(), SessionStatus::Uninitialized);

        let s = s.reduced(SessionAction::Resolving);
        assert_eq!(s.status(), SessionStatus::Loading);

        let authed = s.clone().reduced(SessionAction::SessionResolved(Some(admin())));
        assert_eq!(authed.status(), SessionStatus::Authenticated);
        assert_eq!(authed.roles().to_vec(), vec!["SUPER_ADMIN".to_string()]);

        let anon = s.reduced(SessionAction::SessionResolved(None));
        assert_eq!(anon.status(), SessionStatus::Unauthenticated);
        assert!(anon.roles().is_empty());
    }

    #[test]
    fn test_login_then_logout() {
        let s = Session::default()
            .reduced(SessionAction::Resolving)
            .reduced(SessionAction::SessionResolved(None))
            .reduced(SessionAction::LoginSuccess(admin()));
        assert!(s.is_authenticated());

        let s = s.reduced(SessionAction::Logout);
        assert_eq!(s.status(), SessionStatus::Unauthenticated);
        assert!(s.user.is_none());
    }

    #[test]
    fn test_second_resolution_is_ignored() {
        let s = Session::default()
            .reduced(SessionAction::Resolving)
            .reduced(SessionAction::SessionResolved(Some(admin())))
            .reduced(SessionAction::Resolving);
        assert_eq!(s.status(), SessionStatus::Authenticated);
    }

    #[test]
    fn test_cookie_pair_roundtrip_and_clear() {
        let jar = MemoryCookies::new();
        let cookies = SessionCookies::new(jar.clone());
        assert!(!cookies.has_session());

        cookies.persist(&admin());
        assert!(cookies.has_session());
        assert_eq!(cookies.access_token().as_deref(), Some("tok-1"));
        assert_eq!(cookies.stored_user(), Some(admin()));

        cookies.clear();
        assert!(jar.get(COOKIE_USER_DATA).is_none());
        assert!(jar.get(COOKIE_ACCESS_TOKEN).is_none());
        assert!(!cookies.has_session());
    }

    #[test]
    fn test_device_id_is_stable_and_survives_logout() {
        let cookies = SessionCookies::new(MemoryCookies::new());
        let id = cookies.device_id();
        cookies.persist(&admin());
        cookies.clear();
        assert_eq!(cookies.device_id(), id);
    }

    #[test]
    fn test_corrupt_user_cookie() {
        let jar = MemoryCookies::new();
        jar.set(COOKIE_USER_DATA, "{not json");
        assert_eq!(SessionCookies::new(jar).stored_user(), None);
    }
}
