//! # dlnacast
//!
//! Playlist-driven autoplay for UPnP/DLNA media renderers.
//!
//! Each tracked renderer gets a [`DeviceSession`] fed by AVTransport events.
//! Whenever a renderer goes idle the next playlist item is loaded and played;
//! items the renderer cannot time itself (zero duration, typically still
//! images) are stopped after their configured duration.
//!
//! Discovery, the SOAP action transport and the GENA subscription transport
//! are supplied by the application through [`DeviceSearch`],
//! [`ActionDispatcher`](dlnacast_api::ActionDispatcher) and
//! [`SubscriptionService`].
//!
//! ## Architecture
//!
//! ```text
//! discovery ──► DeviceRegistry ──► DeviceSession ◄── SubscriptionService
//!                                       │
//!                                       ▼
//!                             AutoplayController ──► ActionDispatcher
//!                                       │
//!                                    Playlist
//! ```

pub mod autoplay;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
mod media;
pub mod model;
pub mod playlist;
pub mod registry;
pub mod session;
pub mod subscription;
pub mod system;

pub use autoplay::AutoplayController;
pub use config::{CastConfig, DeviceConfig, JsonFileStore, MemoryStore, Persistence, ServerSettings};
pub use discovery::{DeviceSearch, DiscoveryEvent};
pub use error::{CastError, Result};
pub use model::{DeviceId, PlayItem};
pub use playlist::Playlist;
pub use registry::DeviceRegistry;
pub use session::{DeviceSession, SessionSnapshot, NO_PLAY_ITEM};
pub use subscription::{
    NoticeSender, SessionEventHandler, SubscriptionId, SubscriptionNotice, SubscriptionService,
};
pub use system::{CastSystem, CastSystemBuilder};

pub use dlnacast_api::{
    ActionDispatcher, ActionOutputs, ActionSchema, ArgumentSchema, DeviceDescriptor, Service,
    ServiceHandle, TransportState,
};
