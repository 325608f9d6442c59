//! AVTransport event decoding
//!
//! ```rust
//! use dlnacast_parser::services::av_transport::AVTransportParser;
//! ```

pub mod parser;

pub use parser::{AVTransportChange, AVTransportParser, InstanceID, LastChangeEvent};
