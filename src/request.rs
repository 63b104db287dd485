use serde::de::DeserializeOwned;
use std::collections::HashMap;
use thiserror::Error;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::VecDeque;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// HTTP methods used by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON; the transport sets `Content-Type`.
    Json(String),
    /// The transport builds the multipart envelope and boundary.
    Multipart(Vec<FormPart>),
}

/// Transport-agnostic HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body.to_string());
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Header lookup, case-insensitive on the name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport-agnostic HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Body(e.to_string()))
    }
}

/// Failures below the HTTP status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// HTTP 客户端特性 (Trait)
///
/// `?Send` because the browser implementation holds JS values that are
/// not `Send`; everything runs on the UI event loop.
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for &T {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// Records every request and replays queued responses per URL.
#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn mock_failure(&self, url: &str, error: TransportError) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// JSON body of the `index`-th request.
    pub fn json_body(&self, index: usize) -> serde_json::Value {
        match &self.requests.borrow()[index].body {
            RequestBody::Json(s) => serde_json::from_str(s).unwrap(),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = req.url.clone();
        self.requests.borrow_mut().push(req);

        let next = self
            .responses
            .borrow_mut()
            .get_mut(&url)
            .and_then(|queue| queue.pop_front());

        next.unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = HttpRequest::new("http://x", HttpMethod::Post).with_header("Authorization", "t");
        assert_eq!(req.header("authorization"), Some("t"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockHttpClient::new();
        mock.mock_response("http://x", 200, json!({"n": 1}));
        mock.mock_response("http://x", 500, json!({"n": 2}));

        let first = mock
            .send(HttpRequest::new("http://x", HttpMethod::Get))
            .await
            .unwrap();
        let second = mock
            .send(HttpRequest::new("http://x", HttpMethod::Get))
            .await
            .unwrap();
        let third = mock
            .send(HttpRequest::new("http://x", HttpMethod::Get))
            .await
            .unwrap();

        assert!(first.ok());
        assert_eq!(second.status, 500);
        assert_eq!(third.status, 404);
        assert_eq!(mock.request_count(), 3);
    }
}
