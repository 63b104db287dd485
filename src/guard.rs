//! Session guards.
//!
//! Pure decisions over the session, the token cookie and the current
//! location. The frontend renders whatever [`GuardDecision`] says.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::route::{Location, QUERY_RETURN_URL};
use crate::session::{Session, SessionStatus};

/// Characters escaped inside the `returnUrl` value. `/` stays literal so
/// `/login?returnUrl=/city` remains readable.
const RETURN_URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=')
    .add(b'?')
    .add(b'`');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Session still resolving: show the spinner.
    Fallback,
    Redirect(String),
}

/// Protected pages.
///
/// A missing token cookie redirects immediately, before the session has
/// resolved. With a cookie the page waits for the who-am-i call; if it
/// ends without a user the cookie was stale and the guard redirects.
pub fn auth_guard(session: &Session, has_cookie: bool, location: &Location) -> GuardDecision {
    if !has_cookie {
        return GuardDecision::Redirect(login_redirect(location));
    }
    match session.status() {
        SessionStatus::Authenticated => GuardDecision::Render,
        SessionStatus::Uninitialized | SessionStatus::Loading => GuardDecision::Fallback,
        SessionStatus::Unauthenticated => GuardDecision::Redirect(login_redirect(location)),
    }
}

/// Guest-only pages (login, signup) send signed-in users home.
pub fn guest_guard(has_cookie: bool) -> GuardDecision {
    if has_cookie {
        GuardDecision::Redirect("/".to_string())
    } else {
        GuardDecision::Render
    }
}

/// `/login` for the root page, `/login?returnUrl=<path>` otherwise.
pub fn login_redirect(location: &Location) -> String {
    let target = location.to_url();
    if target == "/" {
        return "/login".to_string();
    }
    format!(
        "/login?{}={}",
        QUERY_RETURN_URL,
        utf8_percent_encode(&target, RETURN_URL)
    )
}

/// Placeholder origin local paths are resolved against.
const CONSOLE_ORIGIN: &str = "http://console.invalid/";

/// Where to go after a successful login. Only local absolute paths are
/// honoured; anything else lands on `/`.
pub fn post_login_target(return_url: Option<&str>) -> String {
    return_url
        .filter(|url| is_local_path(url))
        .map_or_else(|| "/".to_string(), str::to_string)
}

/// Browsers drop tabs and newlines and read `\` as `/`, so the path is
/// resolved the same way and must stay on the console's origin.
fn is_local_path(url: &str) -> bool {
    if !url.starts_with('/') || url.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }
    let Ok(origin) = Url::parse(CONSOLE_ORIGIN) else {
        return false;
    };
    origin
        .join(url)
        .is_ok_and(|resolved| resolved.origin() == origin.origin())
}
