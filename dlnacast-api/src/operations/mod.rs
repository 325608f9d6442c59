//! Typed operations organized by service

pub mod av_transport;

pub use av_transport::{PlayOperation, SetAVTransportURIOperation, StopOperation};
