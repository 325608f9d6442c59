use serde::{Deserialize, Serialize};

use crate::error::{CastError, Result};

/// One playlist entry
///
/// `url` is either an absolute `http(s)` URL or a path relative to the
/// media root served under the static prefix. `duration` is only meaningful
/// for items a renderer cannot time itself, such as still images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayItem {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl PlayItem {
    /// Validate and build an item. The url must not be blank and a duration,
    /// when given, must be positive.
    pub fn new(url: impl Into<String>, duration: Option<u64>) -> Result<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(CastError::InvalidArgument("url can not be empty".to_string()));
        }
        if duration == Some(0) {
            return Err(CastError::InvalidArgument(
                "duration must be a positive number of seconds".to_string(),
            ));
        }
        Ok(Self { url, duration })
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            duration: None,
        }
    }
}
