use thiserror::Error;

/// Errors returned when a resource factory is invoked.
///
/// Construction of the processor config never produces these; they only
/// surface from `ResourceFactory::open` and from operations on the opened
/// handles.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Invalid connection option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Queue error: {0}")]
    Queue(#[from] redis::RedisError),

    #[error("Timed out after {timeout_ms}ms connecting to {resource}")]
    Timeout { resource: String, timeout_ms: u128 },
}

impl ResourceError {
    pub fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        ResourceError::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}
