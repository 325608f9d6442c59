//! Discovery collaborator types

use dlnacast_api::DeviceDescriptor;

use crate::error::Result;
use crate::model::DeviceId;

/// A change reported by the discovery layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    Added(DeviceDescriptor),
    Updated(DeviceDescriptor),
    Removed(DeviceId),
}

/// Starts a network search; results arrive later as [`DiscoveryEvent`]s.
pub trait DeviceSearch: Send + Sync {
    fn search(&self) -> Result<()>;
}
