//! Error taxonomy of the console.
//!
//! Every call site converts an [`ApiError`] into either a toast or an
//! inline field error; unauthorized failures are left to the guards.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::request::TransportError;

/// Field name -> message.
pub type FieldErrors = BTreeMap<String, String>;

pub type ApiResult<T> = Result<T, ApiError>;

const CODE_UNAUTHENTICATED: &str = "UNAUTHENTICATED";
const CODE_FORBIDDEN: &str = "FORBIDDEN";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server-side validation keyed by field name.
    #[error("validation failed: {}", summarize(.0))]
    Validation(FieldErrors),
    /// Transport failure or an unstructured GraphQL error.
    #[error("{0}")]
    Network(String),
    /// Missing or rejected credentials.
    #[error("not authorized")]
    Unauthorized,
    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl ApiError {
    /// Unauthorized failures are rendered by the guards, never as toasts.
    pub fn is_toastable(&self) -> bool {
        !matches!(self, ApiError::Unauthorized)
    }

    /// Message shown in a toast.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Validation(fields) => fields
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| "Validation failed".to_string()),
            ApiError::Network(msg) => msg.clone(),
            ApiError::Unauthorized => "You are not authorized to perform this action".to_string(),
            ApiError::Decode(_) => "Unexpected response from the server".to_string(),
        }
    }

    /// Field errors, when the server returned any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Classifies the `errors` array of a GraphQL response.
    pub fn from_graphql_errors(errors: &[GraphqlError]) -> Self {
        if errors.iter().any(GraphqlError::is_unauthorized) {
            return ApiError::Unauthorized;
        }

        let fields: FieldErrors = errors
            .iter()
            .flat_map(GraphqlError::field_errors)
            .collect();
        if !fields.is_empty() {
            return ApiError::Validation(fields);
        }

        match errors.first() {
            Some(e) if !e.message.is_empty() => ApiError::Network(e.message.clone()),
            _ => ApiError::Network("Unknown error".to_string()),
        }
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphqlError {
    fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }

    fn is_unauthorized(&self) -> bool {
        matches!(self.code(), Some(CODE_UNAUTHENTICATED | CODE_FORBIDDEN))
    }

    /// Reads `extensions.validation`, accepting a message or a list of messages per field.
    fn field_errors(&self) -> Vec<(String, String)> {
        let Some(map) = self
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("validation"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        map.iter()
            .filter_map(|(field, value)| {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
                    _ => None,
                }?;
                Some((field.clone(), message))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors(value: Value) -> Vec<GraphqlError> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let errs = errors(json!([{
            "message": "Bad input",
            "extensions": {
                "code": "BAD_USER_INPUT",
                "validation": { "name": "Name already exists", "code": ["Too long", "Invalid"] }
            }
        }]));
        let err = ApiError::from_graphql_errors(&errs);
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["name"], "Name already exists");
        assert_eq!(fields["code"], "Too long");
    }

    #[test]
    fn test_unauthenticated_code_wins() {
        let errs = errors(json!([
            { "message": "boom" },
            { "message": "no token", "extensions": { "code": "UNAUTHENTICATED" } }
        ]));
        let err = ApiError::from_graphql_errors(&errs);
        assert_eq!(err, ApiError::Unauthorized);
        assert!(!err.is_toastable());
    }

    #[test]
    fn test_first_message_becomes_network_error() {
        let errs = errors(json!([{ "message": "Server exploded" }, { "message": "second" }]));
        let err = ApiError::from_graphql_errors(&errs);
        assert_eq!(err.toast_message(), "Server exploded");
        assert_eq!(
            ApiError::from_graphql_errors(&[]).toast_message(),
            "Unknown error"
        );
    }

    #[test]
    fn test_transport_error_conversion() {
        let err: ApiError = TransportError::Network("offline".into()).into();
        assert_eq!(err.toast_message(), "network error: offline");
        assert!(err.is_toastable());
    }
}
