//! Error taxonomy shared by the client and the controllers

use crate::model::RecordId;
use crate::schema::Entity;
use serde_json::Value;

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, Error>;

/// Key used by the REST service for errors not tied to a field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Failure of a single in-flight operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transport or connectivity failure, including timeouts and 5xx answers
    #[error("Network error: {0}")]
    Network(String),
    /// Response body was not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),
    /// Structured rejection by the remote
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    /// Target record is absent
    #[error("{entity} #{} not found", display_id(.id))]
    NotFound { entity: Entity, id: Option<RecordId> },
    /// User declined a destructive action; not a failure
    #[error("Confirmation declined")]
    ConfirmationDeclined,
    /// Client could not be set up from its configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

fn display_id(id: &Option<RecordId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string())
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation { field: field.into(), message: message.into() }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// First field/message pair of a structured error payload.
///
/// The payload maps field names (or `non_field_errors`) to arrays of
/// messages. Keys are read in payload order; a bare string is accepted in
/// place of an array. A nested serializer's errors are reported under the
/// outer field as `"<inner>: <message>"`.
pub fn first_validation_error(payload: &Value) -> Option<(String, String)> {
    let obj = payload.as_object()?;
    obj.iter().find_map(|(field, messages)| {
        let message = match messages {
            Value::Object(_) => {
                let (inner, message) = first_validation_error(messages)?;
                format!("{}: {}", inner, message)
            }
            other => first_message(other)?.to_string(),
        };
        Some((field.clone(), message))
    })
}

fn first_message(messages: &Value) -> Option<&str> {
    match messages {
        Value::Array(items) => items.iter().find_map(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}
