//! AVTransport service operations
//!
//! The three actions the autoplay core drives: load a URI, start playback
//! and stop.

mod play;
mod set_av_transport_uri;
mod stop;

pub use play::{PlayOperation, PlayRequest, PlayResponse};
pub use set_av_transport_uri::{
    SetAVTransportURIOperation, SetAVTransportURIRequest, SetAVTransportURIResponse,
};
pub use stop::{StopOperation, StopRequest, StopResponse};
