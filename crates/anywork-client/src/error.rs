//! Error types for the AnyWork API gateway.

use anywork_models::ValidationError;

/// Failure modes for API calls.
///
/// Status-class variants carry the server-provided message when the error
/// body had one. [`ApiError::with_fallback`] fills in a caller-supplied
/// message for variants that arrived without one, so the rendered error is
/// always suitable for display.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was rejected with HTTP 401.
    #[error("{}", .0.as_deref().unwrap_or("authentication required"))]
    Unauthorized(Option<String>),

    /// The request was rejected with HTTP 403.
    #[error("{}", .0.as_deref().unwrap_or("permission denied"))]
    Forbidden(Option<String>),

    /// The requested resource does not exist (HTTP 404).
    #[error("{}", .0.as_deref().unwrap_or("resource not found"))]
    NotFound(Option<String>),

    /// Any other non-success HTTP status.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    RequestFailed { status: u16, message: Option<String> },

    /// The server answered 2xx but reported failure in the response
    /// envelope (auth endpoints).
    #[error("{}", .0.as_deref().unwrap_or("request rejected"))]
    Rejected(Option<String>),

    /// The request was refused client-side before any network traffic.
    #[error("{0}")]
    Validation(String),

    /// The connection failed or the response body could not be decoded.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response decoded but violated the expected shape, such as a
    /// success envelope with no payload.
    #[error("{0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Maps an HTTP status and optional server message onto a variant.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::RequestFailed { status, message },
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected(message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// The HTTP status this error was derived from, when there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message extracted from the server response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Rejected(message)
            | Self::RequestFailed { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Fills in `fallback` wherever no server message is available.
    ///
    /// Transport and shape errors always take the fallback since their
    /// original messages are diagnostic rather than user-facing; the source
    /// chain keeps the detail. Validation errors already carry the exact
    /// message the caller must surface and are left untouched.
    pub fn with_fallback(self, fallback: &str) -> Self {
        match self {
            Self::Unauthorized(message) => {
                Self::Unauthorized(message.or_else(|| Some(fallback.to_string())))
            }
            Self::Forbidden(message) => {
                Self::Forbidden(message.or_else(|| Some(fallback.to_string())))
            }
            Self::NotFound(message) => {
                Self::NotFound(message.or_else(|| Some(fallback.to_string())))
            }
            Self::RequestFailed { status, message } => Self::RequestFailed {
                status,
                message: message.or_else(|| Some(fallback.to_string())),
            },
            Self::Rejected(message) => {
                Self::Rejected(message.or_else(|| Some(fallback.to_string())))
            }
            Self::Transport { source, .. } => Self::Transport {
                message: fallback.to_string(),
                source,
            },
            Self::InvalidResponse(_) => Self::InvalidResponse(fallback.to_string()),
            Self::Validation(message) => Self::Validation(message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            message: "network error".to_string(),
            source,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
