//! AVTransport LastChange decoding.
//!
//! GENA delivers AVTransport state as
//!
//! ```xml
//! <e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
//!   <e:property>
//!     <LastChange>&lt;Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"&gt;...</LastChange>
//!   </e:property>
//! </e:propertyset>
//! ```
//!
//! where the escaped `Event` document lists only the variables that changed
//! since the previous notification.

use serde::{Deserialize, Serialize};

use crate::common::{xml_decode, ValueAttribute};
use crate::error::{ParseError, ParseResult};

/// GENA `propertyset` wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "propertyset")]
struct PropertySet {
    #[serde(rename = "property", default)]
    properties: Vec<Property>,
}

#[derive(Debug, Clone, Deserialize)]
struct Property {
    #[serde(
        rename = "LastChange",
        default,
        deserialize_with = "xml_decode::deserialize_nested"
    )]
    last_change: Option<LastChangeEvent>,
}

/// The decoded `LastChange` document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename = "Event")]
pub struct LastChangeEvent {
    #[serde(rename = "InstanceID", default)]
    pub instances: Vec<InstanceID>,
}

/// One AVTransport instance and the variables reported for it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InstanceID {
    #[serde(rename = "@val", default)]
    pub id: String,

    #[serde(rename = "TransportState", default)]
    pub transport_state: Option<ValueAttribute>,

    #[serde(rename = "TransportStatus", default)]
    pub transport_status: Option<ValueAttribute>,

    /// Comma separated list, e.g. `Play,Stop,Pause,Seek`
    #[serde(rename = "CurrentTransportActions", default)]
    pub current_transport_actions: Option<ValueAttribute>,

    #[serde(rename = "CurrentTrackURI", default)]
    pub current_track_uri: Option<ValueAttribute>,

    #[serde(rename = "CurrentTrackDuration", default)]
    pub current_track_duration: Option<ValueAttribute>,

    #[serde(rename = "AVTransportURI", default)]
    pub av_transport_uri: Option<ValueAttribute>,

    #[serde(rename = "NumberOfTracks", default)]
    pub number_of_tracks: Option<ValueAttribute>,

    #[serde(rename = "CurrentPlayMode", default)]
    pub current_play_mode: Option<ValueAttribute>,

    #[serde(rename = "RelativeTimePosition", default)]
    pub relative_time_position: Option<ValueAttribute>,
}

/// Decoded AVTransport notification.
#[derive(Debug, Clone, Default)]
pub struct AVTransportParser {
    event: LastChangeEvent,
}

/// The variables of one instance that a notification carried.
///
/// `None` means "not part of this notification", never "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AVTransportChange {
    pub transport_state: Option<String>,
    pub transport_status: Option<String>,
    pub current_transport_actions: Option<Vec<String>>,
    pub current_track_uri: Option<String>,
    pub current_track_duration: Option<String>,
    pub av_transport_uri: Option<String>,
}

impl AVTransportParser {
    /// Decode either a full GENA `propertyset` body or a bare `Event`
    /// document.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        let stripped = xml_decode::strip_namespaces(xml)?;

        let event = if root_name(&stripped) == Some("propertyset") {
            let set: PropertySet = quick_xml::de::from_str(&stripped)
                .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))?;
            set.properties
                .into_iter()
                .find_map(|p| p.last_change)
                .ok_or_else(|| ParseError::MissingRequiredElement("LastChange".to_string()))?
        } else {
            LastChangeEvent::from_xml(&stripped)?
        };

        Ok(Self { event })
    }

    /// The raw instance with the given `InstanceID` value.
    pub fn instance(&self, id: u32) -> Option<&InstanceID> {
        self.event
            .instances
            .iter()
            .find(|instance| instance.id.trim().parse::<u32>().ok() == Some(id))
    }

    /// Change set for instance 0, the only instance a renderer normally has.
    pub fn change_set(&self) -> AVTransportChange {
        self.change_set_for(0)
    }

    pub fn change_set_for(&self, id: u32) -> AVTransportChange {
        let Some(instance) = self.instance(id) else {
            return AVTransportChange::default();
        };

        let value = |attr: &Option<ValueAttribute>| attr.as_ref().map(|a| a.val.clone());

        AVTransportChange {
            transport_state: value(&instance.transport_state),
            transport_status: value(&instance.transport_status),
            current_transport_actions: instance
                .current_transport_actions
                .as_ref()
                .map(|a| split_actions(&a.val)),
            current_track_uri: value(&instance.current_track_uri),
            current_track_duration: value(&instance.current_track_duration),
            av_transport_uri: value(&instance.av_transport_uri),
        }
    }
}

impl AVTransportChange {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl LastChangeEvent {
    /// Parse LastChange XML directly.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        xml_decode::parse(xml)
    }
}

fn split_actions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn root_name(xml: &str) -> Option<&str> {
    let mut rest = xml;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start + 1..];
        if rest.starts_with('?') || rest.starts_with('!') {
            continue;
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        return Some(&rest[..end]);
    }
}
