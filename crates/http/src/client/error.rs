//! Client error types

use plumb_core::CoreError;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// No access token in storage; nothing was sent
    #[error("Not authenticated: no access token available")]
    Unauthenticated,

    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The access token expired and could not be refreshed
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[from] RefreshError),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request, with the backend's field errors when it sent any
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        errors: Option<Value>,
    },

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The call did not finish within its local deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session storage could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Why a token refresh failed
///
/// Cloneable so every caller queued behind the refresh receives the same value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("no refresh token available")]
    MissingRefreshToken,

    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("invalid refresh response: {0}")]
    InvalidResponse(String),

    #[error("could not persist refreshed tokens: {0}")]
    Storage(String),

    #[error("refresh abandoned before it completed")]
    Abandoned,
}

impl ClientError {
    /// Create error from HTTP status code and an already extracted message
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest {
                message,
                errors: None,
            },
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from a non-success status and the raw response body
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        match Self::from_status(status, message) {
            Self::BadRequest { message, .. } => Self::BadRequest {
                message,
                errors: payload.map(|payload| match payload.get("errors") {
                    Some(errors) => errors.clone(),
                    None => payload,
                }),
            },
            other => other,
        }
    }

    /// HTTP status carried by this error, if it came from a response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::BadRequest { .. } => Some(400),
            Self::Forbidden(_) => Some(403),
            _ => None,
        }
    }

    /// Whether the session is gone and the user has to sign in again
    pub const fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::RefreshFailed(_) | Self::AuthenticationFailed(_)
        )
    }
}

/// Pull a human readable message out of a DRF error payload
///
/// Order: `detail`, `message`, first `non_field_errors` entry, then the first
/// field's first error. "First" is the order the backend sent, which relies on
/// serde_json's `preserve_order`.
pub fn extract_message(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;

    let direct = ["detail", "message"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str));
    let non_field = || {
        object
            .get("non_field_errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
            .and_then(Value::as_str)
    };
    let first_field = || match object.values().next()? {
        Value::String(message) => Some(message.as_str()),
        Value::Array(errors) => errors.first().and_then(Value::as_str),
        _ => None,
    };

    direct
        .or_else(non_field)
        .or_else(first_field)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}
