//! AVTransport `TransportState` values

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Playback state reported by a renderer
///
/// The closed variants are the values UPnP AV defines. Renderers are free to
/// report vendor states, which are kept verbatim in [`TransportState::Vendor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TransportState {
    Stopped,
    Playing,
    Transitioning,
    PausedPlayback,
    PausedRecording,
    Recording,
    NoMediaPresent,
    Vendor(String),
}

impl TransportState {
    pub fn as_str(&self) -> &str {
        match self {
            TransportState::Stopped => "STOPPED",
            TransportState::Playing => "PLAYING",
            TransportState::Transitioning => "TRANSITIONING",
            TransportState::PausedPlayback => "PAUSED_PLAYBACK",
            TransportState::PausedRecording => "PAUSED_RECORDING",
            TransportState::Recording => "RECORDING",
            TransportState::NoMediaPresent => "NO_MEDIA_PRESENT",
            TransportState::Vendor(raw) => raw,
        }
    }

    /// Stopped, paused or empty: the states in which a renderer waits for
    /// the next item.
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            TransportState::NoMediaPresent | TransportState::PausedPlayback | TransportState::Stopped
        )
    }
}

/// Error for blank transport state strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyTransportState;

impl fmt::Display for EmptyTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("empty transport state")
    }
}

impl std::error::Error for EmptyTransportState {}

impl FromStr for TransportState {
    type Err = EmptyTransportState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let state = match s {
            "" => return Err(EmptyTransportState),
            "STOPPED" => TransportState::Stopped,
            "PLAYING" => TransportState::Playing,
            "TRANSITIONING" => TransportState::Transitioning,
            "PAUSED_PLAYBACK" => TransportState::PausedPlayback,
            "PAUSED_RECORDING" => TransportState::PausedRecording,
            "RECORDING" => TransportState::Recording,
            "NO_MEDIA_PRESENT" => TransportState::NoMediaPresent,
            other => TransportState::Vendor(other.to_string()),
        };
        Ok(state)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TransportState> for String {
    fn from(state: TransportState) -> Self {
        state.as_str().to_string()
    }
}

impl From<String> for TransportState {
    fn from(raw: String) -> Self {
        raw.parse()
            .unwrap_or_else(|_| TransportState::Vendor(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("STOPPED", TransportState::Stopped)]
    #[case("PLAYING", TransportState::Playing)]
    #[case("TRANSITIONING", TransportState::Transitioning)]
    #[case("PAUSED_PLAYBACK", TransportState::PausedPlayback)]
    #[case("NO_MEDIA_PRESENT", TransportState::NoMediaPresent)]
    #[case(" PLAYING ", TransportState::Playing)]
    #[case("CUSTOM_BUFFERING", TransportState::Vendor("CUSTOM_BUFFERING".to_string()))]
    fn test_parse(#[case] raw: &str, #[case] expected: TransportState) {
        assert_eq!(raw.parse::<TransportState>().unwrap(), expected);
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!("  ".parse::<TransportState>(), Err(EmptyTransportState));
    }

    #[test]
    fn test_idle_states() {
        assert!(TransportState::Stopped.is_idle());
        assert!(TransportState::PausedPlayback.is_idle());
        assert!(TransportState::NoMediaPresent.is_idle());
        assert!(!TransportState::Playing.is_idle());
        assert!(!TransportState::Transitioning.is_idle());
        assert!(!TransportState::Vendor("X".into()).is_idle());
    }

    #[test]
    fn test_display_round_trips_vendor_value() {
        let state = TransportState::Vendor("CUSTOM".to_string());
        assert_eq!(state.to_string(), "CUSTOM");
        assert_eq!(TransportState::PausedPlayback.to_string(), "PAUSED_PLAYBACK");
    }

    proptest::proptest! {
        #[test]
        fn prop_display_round_trips(raw in "[A-Z_]{1,24}") {
            let state: TransportState = raw.parse().unwrap();
            proptest::prop_assert_eq!(state.to_string(), raw);
        }
    }
}
