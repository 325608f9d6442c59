use thiserror::Error;

/// Errors raised while invoking an action on a device service
#[derive(Debug, Error)]
pub enum ApiError {
    /// The device answered with a fault or the invocation otherwise failed
    ///
    /// `detail` carries whatever the dispatcher could learn about the
    /// failure (UPnP error code, fault description, HTTP status).
    #[error("Action {action} failed: {detail}")]
    ActionFailed { action: String, detail: String },

    /// The service does not declare the requested action
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// An input argument declared by the action schema was not supplied
    #[error("Missing argument '{argument}' for action {action}")]
    MissingArgument { action: String, argument: String },

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// An output argument could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn action_failed(action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ActionFailed {
            action: action.into(),
            detail: detail.into(),
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
