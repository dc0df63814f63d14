use shared::error::{ApiError, ApiException, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connect, timeout, body read).
    #[error("{message}")]
    Transport { message: String },
    /// The server answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error("failed to decode {what} response: {message}")]
    Decode { what: &'static str, message: String },
    #[error("invalid API base url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api(ApiError::new(status, message).into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(err) if err.code == ErrorCode::NotFound)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport("request timed out")
        } else if err.is_connect() {
            Self::transport(format!("network error: {err}"))
        } else if err.is_decode() {
            Self::Decode {
                what: "API",
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::api(
                status.as_u16(),
                format!("request failed with status code {}", status.as_u16()),
            )
        } else {
            Self::transport(err.to_string())
        }
    }
}

/// Client-side form checks. These are raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("sampling date '{0}' must be formatted as YYYY-MM-DD")]
    InvalidDate(String),
}

impl ValidationError {
    pub fn is_field_missing(&self, field: &str) -> bool {
        matches!(self, Self::MissingFields(fields) if fields.contains(&field))
    }
}
