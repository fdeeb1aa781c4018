use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IwError>;

#[derive(Debug, Error)]
pub enum IwError {
    /// A required IW service could not be bound at construction time.
    #[error("Could not reach IW service {service}")]
    ServiceUnavailable {
        service: String,
        #[source]
        source: Box<IwError>,
    },

    /// Caller-supplied value failed a shape check. Raised before any network call.
    #[error("Invalid desire {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("IW service {service} rejected the request: {reason}")]
    Rejected { service: String, reason: String },

    #[error("Timed out after {after:?} waiting for {service}")]
    Timeout { service: String, after: Duration },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl IwError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        IwError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Field name for `InvalidArgument`, `None` otherwise.
    pub fn invalid_field(&self) -> Option<&'static str> {
        match self {
            IwError::InvalidArgument { field, .. } => Some(*field),
            _ => None,
        }
    }
}
