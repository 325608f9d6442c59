//! # dlnacast-parser
//!
//! Decoding of UPnP AVTransport event payloads for the dlnacast workspace.
//!
//! A render device reports its playback state through GENA notifications whose
//! body is a `propertyset` carrying an XML-escaped `LastChange` document. Each
//! notification only lists the state variables that changed, so the decoded
//! [`AVTransportChange`] keeps every field optional.
//!
//! ## Usage
//!
//! ```rust
//! use dlnacast_parser::AVTransportParser;
//!
//! let xml = r#"<Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/"><InstanceID val="0"><TransportState val="STOPPED"/></InstanceID></Event>"#;
//! let change = AVTransportParser::from_xml(xml)?.change_set();
//! assert_eq!(change.transport_state.as_deref(), Some("STOPPED"));
//! # Ok::<(), dlnacast_parser::ParseError>(())
//! ```

pub mod common;
pub mod error;
pub mod services;

pub use common::clock::{is_zero_duration, parse_duration_to_ms};
pub use common::ValueAttribute;
pub use error::{ParseError, ParseResult};
pub use services::av_transport::{AVTransportChange, AVTransportParser};
