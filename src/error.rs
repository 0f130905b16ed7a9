// Client-side error types
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure class of a fetch, used by callers that need to branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never completed
    Transport,
    /// The backend answered with a non-2xx status or an error payload
    Backend,
    /// The response body did not match the route's declared output
    Schema,
}

/// Every way a contract-bound request can fail.
///
/// The fetch client folds transport, backend and schema failures into this
/// one type so that call sites only ever inspect a `Result`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("response for {route} did not match contract: {source}")]
    Schema {
        route: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        FetchError::Status {
            status,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        FetchError::Rejected(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) | FetchError::Url(_) => ErrorKind::Transport,
            FetchError::Status { .. } | FetchError::Rejected(_) => ErrorKind::Backend,
            FetchError::Schema { .. } => ErrorKind::Schema,
        }
    }

    /// HTTP status of a backend failure, if there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build a `Status` error from a raw error body.
    ///
    /// JSON bodies contribute their `message` or `error` field; anything else
    /// is kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());

        let message = if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        };

        FetchError::status(status, message)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Field-level validation failures collected before a request is sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", summary(.field_errors))]
pub struct ValidationErrors {
    pub field_errors: BTreeMap<String, String>,
}

fn summary(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        // First error per field wins, same as an inline form message
        self.field_errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.field_errors.len()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Failure of a form submission: rejected locally, refused because another
/// submit is pending, or failed at the fetch layer
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("a submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Failed(#[from] FetchError),
}

impl SubmitError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether the request reached the network
    pub fn reached_backend(&self) -> bool {
        matches!(self, SubmitError::Failed(_))
    }
}
