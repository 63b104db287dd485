use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};
use zatca_shared::graphql::{GraphqlOperation, OperationKind};

use crate::config::AppConfig;
use crate::cookies::CookieStore;
use crate::error::{ApiError, ApiResult, GraphqlError};
use crate::request::{HttpClient, HttpMethod, HttpRequest};
use crate::session::SessionCookies;

// =========================================================
// 业务逻辑: GraphQL Client
// =========================================================

/// How query results interact with the in-memory cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve the last result while the network call runs, then replace it.
    #[default]
    CacheAndNetwork,
    NetworkOnly,
}

/// Distinct query results kept; every typed search is its own entry.
const CACHE_CAPACITY: usize = 64;

/// Query results by `operation:variables`, oldest evicted first.
#[derive(Debug, Default)]
struct QueryCache {
    entries: HashMap<String, Value>,
    order: VecDeque<String>,
}

impl QueryCache {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: String, value: Value) {
        self.order.retain(|k| *k != key);
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        while self.order.len() > CACHE_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// The one client shared by every page.
///
/// The bearer token is read from the cookie store on every call, so a
/// login or logout takes effect on the very next request.
pub struct GraphqlClient<H, K> {
    http: H,
    cookies: SessionCookies<K>,
    endpoint: String,
    policy: FetchPolicy,
    cache: Arc<Mutex<QueryCache>>,
}

impl<H: HttpClient, K: CookieStore> GraphqlClient<H, K> {
    pub fn new(http: H, cookies: K, config: &AppConfig) -> Self {
        Self {
            http,
            cookies: SessionCookies::new(cookies),
            endpoint: config.graphql_endpoint(),
            policy: FetchPolicy::default(),
            cache: Arc::new(Mutex::new(QueryCache::default())),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn cookies(&self) -> &SessionCookies<K> {
        &self.cookies
    }

    // https://graphql.org/learn/serving-over-http/#post-request
    //
    // Request body
    //   {"operationName": "...", "query": "...", "variables": {...}}
    //
    // Response
    //   {"data": {"<rootField>": ...}, "errors": [{"message": "...", "extensions": {...}}]}
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: &O::Variables,
    ) -> ApiResult<O::Response> {
        let variables = serde_json::to_value(variables)
            .map_err(|e| ApiError::Decode(format!("failed to encode variables: {e}")))?;
        let body = json!({
            "operationName": O::name(),
            "query": O::document(),
            "variables": variables,
        });

        let mut req = HttpRequest::new(&self.endpoint, HttpMethod::Post)
            .with_header("Content-Type", "application/json")
            .with_json(body);
        if let Some(token) = self.cookies.access_token() {
            req = req.with_header("Authorization", &format!("Bearer {token}"));
        }

        debug!(operation = %O::name(), "graphql request");
        let resp = self.http.send(req).await?;

        if resp.status == 401 || resp.status == 403 {
            warn!(operation = %O::name(), status = resp.status, "request rejected");
            return Err(ApiError::Unauthorized);
        }

        let envelope: Envelope = match serde_json::from_str(&resp.body) {
            Ok(envelope) => envelope,
            Err(_) if !resp.ok() => {
                return Err(ApiError::Network(format!(
                    "request failed with status {}",
                    resp.status
                )));
            }
            Err(e) => {
                error!(operation = %O::name(), error = %e, "unreadable response");
                return Err(ApiError::Decode(e.to_string()));
            }
        };

        if !envelope.errors.is_empty() {
            return Err(ApiError::from_graphql_errors(&envelope.errors));
        }
        if !resp.ok() {
            return Err(ApiError::Network(format!(
                "request failed with status {}",
                resp.status
            )));
        }

        let root = O::root_field();
        let data = envelope
            .data
            .and_then(|mut data| data.get_mut(&root).map(Value::take))
            .filter(|value| !value.is_null())
            .ok_or_else(|| ApiError::Decode(format!("no `{root}` in response")))?;

        let parsed = serde_json::from_value::<O::Response>(data.clone()).map_err(|e| {
            error!(operation = %O::name(), error = %e, "response shape mismatch");
            ApiError::Decode(e.to_string())
        })?;

        match O::KIND {
            OperationKind::Query if self.policy == FetchPolicy::CacheAndNetwork => {
                if let Some(key) = cache_key::<O>(&variables) {
                    if let Ok(mut cache) = self.cache.lock() {
                        cache.insert(key, data);
                    }
                }
            }
            OperationKind::Query => {}
            OperationKind::Mutation => self.clear_cache(),
        }

        Ok(parsed)
    }

    /// Last successful result of a query with the same variables.
    pub fn cached<O: GraphqlOperation>(&self, variables: &O::Variables) -> Option<O::Response> {
        if O::KIND != OperationKind::Query || self.policy != FetchPolicy::CacheAndNetwork {
            return None;
        }
        let variables = serde_json::to_value(variables).ok()?;
        let key = cache_key::<O>(&variables)?;
        let value = self.cache.lock().ok()?.get(&key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

fn cache_key<O: GraphqlOperation>(variables: &Value) -> Option<String> {
    let vars = serde_json::to_string(variables).ok()?;
    Some(format!("{}:{}", O::name(), vars))
}

#[cfg(test)]
mod tests;
