//! Sessions keyed by device id

use std::collections::BTreeMap;
use std::sync::Arc;

use dlnacast_api::DeviceDescriptor;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::{DeviceConfig, SnapshotWriter};
use crate::error::Result;
use crate::model::DeviceId;
use crate::session::DeviceSession;
use crate::subscription::{SessionEventHandler, SubscriptionService};

/// Owns every session ever seen
///
/// Sessions are never removed; a vanished device is only released.
pub struct DeviceRegistry {
    sessions: RwLock<BTreeMap<DeviceId, Arc<DeviceSession>>>,
    subscriptions: Arc<dyn SubscriptionService>,
    handler: Arc<dyn SessionEventHandler>,
    snapshots: SnapshotWriter,
    runtime: Handle,
}

impl DeviceRegistry {
    pub(crate) fn new(
        subscriptions: Arc<dyn SubscriptionService>,
        handler: Arc<dyn SessionEventHandler>,
        snapshots: SnapshotWriter,
        runtime: Handle,
    ) -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
            subscriptions,
            handler,
            snapshots,
            runtime,
        }
    }

    /// Register a persisted device; it stays offline until discovery sees it.
    pub(crate) fn restore(&self, prefs: &DeviceConfig) -> Arc<DeviceSession> {
        let mut sessions = self.sessions.write();
        Arc::clone(
            sessions
                .entry(prefs.id.clone())
                .or_insert_with(|| Arc::new(DeviceSession::from_prefs(prefs))),
        )
    }

    pub fn get(&self, id: &DeviceId) -> Option<Arc<DeviceSession>> {
        self.sessions.read().get(id).cloned()
    }

    /// Get or create the session for `id`.
    pub fn ensure(&self, id: &DeviceId) -> Arc<DeviceSession> {
        if let Some(session) = self.get(id) {
            return session;
        }
        let mut sessions = self.sessions.write();
        Arc::clone(
            sessions
                .entry(id.clone())
                .or_insert_with(|| Arc::new(DeviceSession::new(id.clone()))),
        )
    }

    /// Sessions ordered by device id.
    pub fn list(&self) -> Vec<Arc<DeviceSession>> {
        self.sessions.read().values().cloned().collect()
    }

    /// A renderer appeared or its description changed.
    ///
    /// Devices other than media renderers are ignored. A tracked session is
    /// re-subscribed in the background.
    pub fn on_device_seen(&self, device: DeviceDescriptor) -> Option<Arc<DeviceSession>> {
        if !device.is_media_renderer() {
            debug!(udn = %device.udn, device_type = %device.device_type, "Ignoring non-renderer device");
            return None;
        }

        let session = self.ensure(&DeviceId::new(&device.udn));
        info!(device = %session.id(), name = %device.friendly_name, "Renderer online");
        session.attach(device);
        self.persist_in_background();

        if session.tracked() {
            let session = Arc::clone(&session);
            let subscriptions = Arc::clone(&self.subscriptions);
            let handler = Arc::clone(&self.handler);
            self.runtime.spawn(async move {
                if let Err(e) = session.subscribe(&subscriptions, handler).await {
                    warn!(device = %session.id(), error = %e, "Re-subscribe failed");
                }
            });
        }

        Some(session)
    }

    /// A renderer left the network. Unknown ids are ignored.
    pub fn on_device_removed(&self, id: &DeviceId) {
        match self.get(id) {
            Some(session) => {
                info!(device = %id, "Renderer offline");
                session.release(&self.subscriptions);
            }
            None => debug!(device = %id, "Removal for unknown device"),
        }
    }

    /// Save the current snapshot of every session and the playlist.
    pub fn persist(&self) -> Result<()> {
        self.snapshots.write(|| self.list())
    }

    fn persist_in_background(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to save configuration");
        }
    }

    pub(crate) fn subscriptions(&self) -> &Arc<dyn SubscriptionService> {
        &self.subscriptions
    }

    pub(crate) fn handler(&self) -> Arc<dyn SessionEventHandler> {
        Arc::clone(&self.handler)
    }
}
