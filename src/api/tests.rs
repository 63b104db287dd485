use super::*;
use crate::cookies::MemoryCookies;
use crate::request::{MockHttpClient, TransportError};
use crate::test_support::{GRAPHQL_URL, admin, client, data, validation_errors};
use serde_json::json;
use zatca_shared::graphql::{Create, CreateArgs, ListAll, ListPage, Me, NoVariables, PageArgs};
use zatca_shared::{City, Language, LanguageInput, PAGE_SIZE};

fn page_args(page: u32) -> PageArgs {
    PageArgs {
        size: PAGE_SIZE,
        page,
        search: None,
        filter: Default::default(),
    }
}

fn cities() -> Value {
    json!({
        "items": [
            { "id": "1", "name": "Riyadh", "country": { "id": "sa", "name": "Saudi Arabia" } },
            { "id": "2", "name": "Jeddah", "country": null }
        ],
        "totalPages": 3
    })
}

#[tokio::test]
async fn test_execute_sends_operation_envelope() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(GRAPHQL_URL, 200, data("paginatedCities", cities()));

    let api = client(&mock, &jar);
    let page = api.execute::<ListPage<City>>(&page_args(2)).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items[0].country.as_ref().unwrap().name, "Saudi Arabia");

    let body = mock.json_body(0);
    assert_eq!(body["operationName"], "ListCityPage");
    assert_eq!(body["variables"], json!({ "size": 10, "page": 2 }));
    assert!(body["query"].as_str().unwrap().contains("paginatedCities"));

    let requests = mock.requests.borrow();
    let req = &requests[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_bearer_token_is_read_on_every_call() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(GRAPHQL_URL, 200, data("cities", json!([])));
    mock.mock_response(GRAPHQL_URL, 200, data("cities", json!([])));
    mock.mock_response(GRAPHQL_URL, 200, data("cities", json!([])));

    let api = client(&mock, &jar);
    api.execute::<ListAll<City>>(&NoVariables {}).await.unwrap();

    api.cookies().persist(&admin());
    api.execute::<ListAll<City>>(&NoVariables {}).await.unwrap();

    api.cookies().clear();
    api.execute::<ListAll<City>>(&NoVariables {}).await.unwrap();

    let requests = mock.requests.borrow();
    assert_eq!(requests[0].header("Authorization"), None);
    assert_eq!(requests[1].header("Authorization"), Some("Bearer tok-1"));
    assert_eq!(requests[2].header("Authorization"), None);
}

#[tokio::test]
async fn test_http_401_is_unauthorized() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_raw(GRAPHQL_URL, 401, "Unauthorized");

    let err = client(&mock, &jar)
        .execute::<Me>(&NoVariables {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn test_graphql_forbidden_code_is_unauthorized() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        json!({ "data": null, "errors": [{ "message": "nope", "extensions": { "code": "FORBIDDEN" } }] }),
    );

    let err = client(&mock, &jar)
        .execute::<Me>(&NoVariables {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn test_validation_errors_surface_per_field() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(
        GRAPHQL_URL,
        200,
        validation_errors(json!({ "name": "Name already exists" })),
    );

    let input = CreateArgs {
        input: LanguageInput {
            name: "Arabic".into(),
            code: "ar".into(),
        },
    };
    let err = client(&mock, &jar)
        .execute::<Create<Language>>(&input)
        .await
        .unwrap_err();

    let fields = err.field_errors().unwrap();
    assert_eq!(fields.get("name").map(String::as_str), Some("Name already exists"));
    assert!(!fields.contains_key("code"));
}

#[tokio::test]
async fn test_server_error_status_without_errors_array() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_raw(GRAPHQL_URL, 502, "<html>Bad Gateway</html>");

    let err = client(&mock, &jar)
        .execute::<Me>(&NoVariables {})
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Network("request failed with status 502".into()));
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_failure(GRAPHQL_URL, TransportError::Network("offline".into()));

    let err = client(&mock, &jar)
        .execute::<Me>(&NoVariables {})
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(err.is_toastable());
}

#[tokio::test]
async fn test_missing_root_field_is_decode_error() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    mock.mock_response(GRAPHQL_URL, 200, json!({ "data": { "me": null } }));

    let err = client(&mock, &jar)
        .execute::<Me>(&NoVariables {})
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_cache_and_network() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let api = client(&mock, &jar);

    assert!(api.cached::<ListPage<City>>(&page_args(1)).is_none());

    mock.mock_response(GRAPHQL_URL, 200, data("paginatedCities", cities()));
    api.execute::<ListPage<City>>(&page_args(1)).await.unwrap();

    let cached = api.cached::<ListPage<City>>(&page_args(1)).unwrap();
    assert_eq!(cached.items.len(), 2);
    // Different variables are a different cache entry.
    assert!(api.cached::<ListPage<City>>(&page_args(2)).is_none());

    // A successful mutation invalidates every cached query.
    mock.mock_response(
        GRAPHQL_URL,
        200,
        data("createLanguage", json!({ "id": "9", "name": "Arabic", "code": "ar" })),
    );
    let input = CreateArgs {
        input: LanguageInput {
            name: "Arabic".into(),
            code: "ar".into(),
        },
    };
    api.execute::<Create<Language>>(&input).await.unwrap();
    assert!(api.cached::<ListPage<City>>(&page_args(1)).is_none());
}

#[tokio::test]
async fn test_cache_keeps_only_recent_searches() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let api = client(&mock, &jar);
    let search = |i: usize| PageArgs {
        search: Some(format!("q{i}")),
        ..page_args(1)
    };

    for i in 0..=CACHE_CAPACITY {
        mock.mock_response(GRAPHQL_URL, 200, data("paginatedCities", cities()));
        api.execute::<ListPage<City>>(&search(i)).await.unwrap();
    }

    assert!(api.cached::<ListPage<City>>(&search(0)).is_none());
    assert!(api.cached::<ListPage<City>>(&search(1)).is_some());
    assert!(api.cached::<ListPage<City>>(&search(CACHE_CAPACITY)).is_some());
    assert_eq!(api.cache.lock().unwrap().len(), CACHE_CAPACITY);
}

#[tokio::test]
async fn test_network_only_policy_skips_cache() {
    let mock = MockHttpClient::new();
    let jar = MemoryCookies::new();
    let api = client(&mock, &jar).with_policy(FetchPolicy::NetworkOnly);

    mock.mock_response(GRAPHQL_URL, 200, data("paginatedCities", cities()));
    api.execute::<ListPage<City>>(&page_args(1)).await.unwrap();
    assert!(api.cached::<ListPage<City>>(&page_args(1)).is_none());
}
