//! Service-specific event decoders.
//!
//! Only AVTransport is decoded; it is the one service the autoplay logic
//! watches.

pub mod av_transport;
