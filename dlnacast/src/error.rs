//! Error types for dlnacast

use dlnacast_api::ApiError;
use dlnacast_parser::ParseError;
use thiserror::Error;

use crate::model::DeviceId;

/// Result type for dlnacast operations
pub type Result<T> = std::result::Result<T, CastError>;

/// Errors surfaced by the playlist, the sessions and the [`CastSystem`](crate::CastSystem)
#[derive(Error, Debug)]
pub enum CastError {
    #[error("Index {index} out of range for playlist of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The subscription request was rejected; the session's tracked flag is
    /// left as the caller set it
    #[error("Subscription failed: {0}")]
    SubscriptionFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("Device offline: {0}")]
    DeviceOffline(DeviceId),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Event parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<ApiError> for CastError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::ActionFailed { action, detail } => {
                CastError::ActionFailed(format!("{}: {}", action, detail))
            }
            ApiError::UnknownAction(name) => {
                CastError::InvalidArgument(format!("no action with name {}", name))
            }
            ApiError::MissingArgument { action, argument } => CastError::InvalidArgument(format!(
                "argument {} is required by action {}",
                argument, action
            )),
            ApiError::Network(msg) | ApiError::Parse(msg) => CastError::ActionFailed(msg),
        }
    }
}

impl From<std::io::Error> for CastError {
    fn from(error: std::io::Error) -> Self {
        CastError::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for CastError {
    fn from(error: serde_json::Error) -> Self {
        CastError::Persistence(error.to_string())
    }
}
