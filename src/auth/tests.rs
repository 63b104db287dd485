use super::*;
use crate::ability::{AbilitySet, Capability};
use crate::cookies::MemoryCookies;
use crate::guard::{GuardDecision, auth_guard, guest_guard};
use crate::request::{MockHttpClient, TransportError};
use crate::route::Location;
use crate::session::{Session, SessionAction, SessionCookies};
use crate::test_support::{GEO_URL, GRAPHQL_URL, admin, client, data};
use serde_json::{Value, json};
use zatca_shared::{COOKIE_ACCESS_TOKEN, COOKIE_USER_DATA, EntityKind, NAVIGATION};

fn login_payload() -> Value {
    data(
        "login",
        json!({
            "accessToken": "tok-9",
            "user": { "id": "1", "name": "Admin", "email": "admin@zatca.app", "adminRoles": ["SUPER_ADMIN"] }
        }),
    )
}

#[tokio::test]
async fn test_login_sends_device_and_stores_cookies() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GEO_URL,
        200,
        json!({ "ip": "5.1.2.3", "country": "SA", "country_name": "Saudi Arabia", "city": "Riyadh" }),
    );
    mock.mock_response(GRAPHQL_URL, 200, login_payload());

    let api = client(&mock, &jar);
    let auth = AuthService::new(&api, GEO_URL);
    let user = auth.login(" admin@zatca.app ", "secret").await.unwrap();

    assert_eq!(user.access_token, "tok-9");
    assert_eq!(user.admin_roles, vec!["SUPER_ADMIN".to_string()]);

    let body = mock.json_body(1);
    assert_eq!(body["variables"]["email"], "admin@zatca.app");
    assert_eq!(body["variables"]["device"]["country"], "Saudi Arabia");
    assert_eq!(body["variables"]["device"]["city"], "Riyadh");
    assert!(!body["variables"]["device"]["deviceId"].as_str().unwrap().is_empty());

    assert_eq!(jar.get(COOKIE_ACCESS_TOKEN).as_deref(), Some("tok-9"));
    assert_eq!(SessionCookies::new(jar.clone()).stored_user(), Some(user));
}

#[tokio::test]
async fn test_geolocation_failure_does_not_block_login() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_failure(GEO_URL, TransportError::Network("blocked".into()));
    mock.mock_response(GRAPHQL_URL, 200, login_payload());

    let api = client(&mock, &jar);
    let auth = AuthService::new(&api, GEO_URL);
    assert!(auth.login("admin@zatca.app", "secret").await.is_ok());

    let body = mock.json_body(1);
    let device = &body["variables"]["device"];
    assert!(device.get("ip").is_none());
    assert!(device["deviceId"].is_string());
}

#[tokio::test]
async fn test_login_rejected_leaves_no_cookies() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(GEO_URL, 200, json!({}));
    mock.mock_response(
        GRAPHQL_URL,
        200,
        json!({ "data": null, "errors": [{ "message": "Invalid credentials" }] }),
    );

    let api = client(&mock, &jar);
    let err = AuthService::new(&api, GEO_URL)
        .login("admin@zatca.app", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.toast_message(), "Invalid credentials");
    assert!(jar.get(COOKIE_ACCESS_TOKEN).is_none());
}

#[tokio::test]
async fn test_resolve_session_without_cookie_makes_no_call() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let api = client(&mock, &jar);

    assert_eq!(AuthService::new(&api, GEO_URL).resolve_session().await, None);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_resolve_session_with_cookie() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        data(
            "me",
            json!({ "id": "1", "name": "Admin", "email": "admin@zatca.app", "adminRoles": ["SUPER_ADMIN"] }),
        ),
    );

    let api = client(&mock, &jar);
    api.cookies().persist(&admin());
    let user = AuthService::new(&api, GEO_URL).resolve_session().await;

    assert_eq!(user, Some(admin()));
    assert_eq!(
        mock.requests.borrow()[0].header("Authorization"),
        Some("Bearer tok-1")
    );
}

#[tokio::test]
async fn test_failed_resolution_clears_cookies() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_raw(GRAPHQL_URL, 401, "expired");

    let api = client(&mock, &jar);
    api.cookies().persist(&admin());
    assert_eq!(AuthService::new(&api, GEO_URL).resolve_session().await, None);
    assert!(jar.get(COOKIE_ACCESS_TOKEN).is_none());
    assert!(jar.get(COOKIE_USER_DATA).is_none());
}

#[test]
fn test_logout_clears_cookies_and_denies_everything() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let api = client(&mock, &jar);
    let auth = AuthService::new(&api, GEO_URL);

    api.cookies().persist(&admin());
    let mut session = Session::default().reduced(SessionAction::LoginSuccess(admin()));
    let before = AbilitySet::for_user(NAVIGATION, session.user.as_ref());
    assert!(before.can(&Capability::manage("city")));

    auth.logout();
    session.reduce(SessionAction::Logout);

    assert!(jar.get(COOKIE_ACCESS_TOKEN).is_none());
    assert!(jar.get(COOKIE_USER_DATA).is_none());

    let after = AbilitySet::for_user(NAVIGATION, session.user.as_ref());
    for kind in EntityKind::ALL {
        assert!(!after.can(&Capability::manage(kind.subject())));
    }
    assert!(!after.can(&Capability::manage("home")));
}

#[test]
fn test_guards_follow_the_cookie() {
    let jar = MemoryCookies::new();
    let cookies = SessionCookies::new(jar.clone());
    let session = Session::default();

    assert_eq!(
        auth_guard(&session, cookies.has_session(), &Location::parse("/city")),
        GuardDecision::Redirect("/login?returnUrl=/city".into())
    );
    assert_eq!(
        auth_guard(&session, cookies.has_session(), &Location::parse("/")),
        GuardDecision::Redirect("/login".into())
    );

    cookies.persist(&admin());
    assert_eq!(
        guest_guard(cookies.has_session()),
        GuardDecision::Redirect("/".into())
    );
}

#[test]
fn test_credential_checks() {
    assert!(validate_credentials("admin@zatca.app", "x").is_ok());
    let errors = validate_credentials("admin", "").unwrap_err();
    assert_eq!(errors["email"], "Invalid e-mail address");
    assert_eq!(errors["password"], "Password is required");

    let input = RegisterInput {
        name: "".into(),
        email: "a@b.co".into(),
        password: "short".into(),
    };
    let errors = validate_registration(&input, "other").unwrap_err();
    assert_eq!(errors["name"], "Name is required");
    assert_eq!(errors["password"], "Password must be at least 8 characters");
    assert_eq!(errors["confirm"], "Passwords do not match");
}

#[tokio::test]
async fn test_register() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        data("register", json!({ "id": "2", "name": "New", "email": "new@zatca.app" })),
    );

    let api = client(&mock, &jar);
    let profile = AuthService::new(&api, GEO_URL)
        .register(RegisterInput {
            name: "New".into(),
            email: "new@zatca.app".into(),
            password: "long-enough".into(),
        })
        .await
        .unwrap();

    assert_eq!(profile.email, "new@zatca.app");
    assert!(profile.admin_roles.is_empty());
    assert!(jar.get(COOKIE_ACCESS_TOKEN).is_none());
}
