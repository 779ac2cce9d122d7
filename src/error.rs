//! Service-level errors
//!
//! Validation failures are data and travel inside a
//! [`ValidationErrorMap`](crate::functional::validation_engine::ValidationErrorMap).
//! `ServiceError` is reserved for broken calls: a record of one kind checked
//! against existing records of another, an update without an `id`, or a JSON
//! request that cannot be decoded.

use serde_json::error::Category;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String, tag: Option<String> },

    #[error("Bad request: {message}")]
    BadRequest { message: String, tag: Option<String> },

    #[error("Internal server error: {message}")]
    InternalServerError { message: String, tag: Option<String> },
}

impl ServiceError {
    /// A call that violates the validator's contract (programmer error).
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument {
            message: message.into(),
            tag: None,
        }
    }

    /// Input that could not be decoded into a validation request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest {
            message: message.into(),
            tag: None,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ServiceError::InternalServerError {
            message: message.into(),
            tag: None,
        }
    }

    /// Attach a short tag naming the area the error came from (e.g. `"client"`).
    pub fn with_tag(mut self, value: &str) -> Self {
        match &mut self {
            ServiceError::InvalidArgument { tag, .. }
            | ServiceError::BadRequest { tag, .. }
            | ServiceError::InternalServerError { tag, .. } => *tag = Some(value.to_string()),
        }
        self
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidArgument { message, .. }
            | ServiceError::BadRequest { message, .. }
            | ServiceError::InternalServerError { message, .. } => message,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            ServiceError::InvalidArgument { tag, .. }
            | ServiceError::BadRequest { tag, .. }
            | ServiceError::InternalServerError { tag, .. } => tag.as_deref(),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => ServiceError::internal_server_error(err.to_string()),
            Category::Syntax | Category::Data | Category::Eof => {
                ServiceError::bad_request(err.to_string())
            }
        }
        .with_tag("json")
    }
}
