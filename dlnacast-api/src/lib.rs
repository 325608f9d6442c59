//! Device-facing API for dlnacast
//!
//! This crate describes render devices and their services the way a UPnP
//! control point sees them, and defines the typed AVTransport operations the
//! autoplay core issues. It owns no transport: actions are executed by an
//! [`ActionDispatcher`] supplied by the embedding application.
//!
//! ```rust
//! use dlnacast_api::operations::av_transport::{PlayOperation, PlayRequest};
//! use dlnacast_api::AvOperation;
//!
//! let args = PlayOperation::arguments(&PlayRequest::normal_speed());
//! assert_eq!(args[1], ("Speed".to_string(), "1".to_string()));
//! ```

pub mod device;
pub mod dispatcher;
pub mod error;
pub mod operation;
pub mod operations;
pub mod service;
pub mod transport;

pub use device::DeviceDescriptor;
pub use dispatcher::{ActionClient, ActionDispatcher, ActionOutputs};
pub use error::{ApiError, Result};
pub use operation::AvOperation;
pub use service::{ActionSchema, ArgumentDirection, ArgumentSchema, Service, ServiceHandle, ServiceInfo};
pub use transport::TransportState;
