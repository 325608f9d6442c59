//! Error types for event decoding

use thiserror::Error;

/// Errors that can occur while decoding an event payload
#[derive(Error, Debug)]
pub enum ParseError {
    /// XML deserialization failed
    #[error("XML deserialization failed: {0}")]
    XmlDeserializationFailed(String),

    /// The payload is not well-formed XML
    #[error("Invalid XML structure: {0}")]
    InvalidXmlStructure(String),

    /// Missing required element
    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
