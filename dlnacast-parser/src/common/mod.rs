//! Shared decoding helpers
//!
//! - [`xml_decode`]: namespace stripping and nested-document deserializers
//! - [`attributes`]: the `val="..."` attribute pattern used by LastChange
//! - [`clock`]: `H:MM:SS` clock strings

pub mod attributes;
pub mod clock;
pub mod xml_decode;

pub use attributes::ValueAttribute;
