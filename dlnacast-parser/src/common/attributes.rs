//! The `val` attribute pattern used by LastChange state variables.

use serde::{Deserialize, Serialize};

/// An XML element whose payload lives in a `val` attribute:
///
/// ```xml
/// <TransportState val="PLAYING"/>
/// <CurrentTrackDuration val="0:03:57"/>
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ValueAttribute {
    /// The value from the `val` attribute
    #[serde(rename = "@val", default)]
    pub val: String,
}

impl ValueAttribute {
    pub fn into_value(self) -> String {
        self.val
    }
}
