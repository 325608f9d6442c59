//! CastSystem - entry point for a presentation layer
//!
//! Wires the playlist, the sessions, the autoplay controller and the
//! collaborators together and exposes the operations a control panel issues.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use dlnacast_api::{ActionClient, ActionDispatcher, ActionOutputs, ActionSchema, ServiceHandle};
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::autoplay::{play_url, AutoplayController};
use crate::config::{JsonFileStore, Persistence, ServerSettings, SnapshotWriter};
use crate::discovery::{DeviceSearch, DiscoveryEvent};
use crate::error::{CastError, Result};
use crate::media;
use crate::model::{DeviceId, PlayItem};
use crate::playlist::Playlist;
use crate::registry::DeviceRegistry;
use crate::session::{DeviceSession, SessionSnapshot};
use crate::subscription::SubscriptionService;

const UNLISTED_FILES_LIMIT: usize = 100;

/// Main entry point
///
/// Must be built inside a tokio runtime; background work (subscription
/// pumps, device commands, auto-stop timers) runs on that runtime.
///
/// # Example
///
/// ```rust,ignore
/// let system = CastSystem::builder()
///     .with_dispatcher(Arc::new(SoapDispatcher::new()))
///     .with_subscriptions(Arc::new(GenaSubscriptions::new(callback_url)))
///     .build()?;
///
/// system.handle_discovery(DiscoveryEvent::Added(descriptor));
/// system.start_tracking(&DeviceId::new("uuid:...")).await?;
/// ```
pub struct CastSystem {
    registry: Arc<DeviceRegistry>,
    playlist: Arc<Mutex<Playlist>>,
    settings: Arc<RwLock<ServerSettings>>,
    actions: ActionClient,
    search: Option<Arc<dyn DeviceSearch>>,
}

impl CastSystem {
    pub fn builder() -> CastSystemBuilder {
        CastSystemBuilder::default()
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Start a network search for renderers.
    pub fn scan(&self) -> Result<()> {
        let search = self
            .search
            .as_ref()
            .ok_or_else(|| CastError::InvalidArgument("no device search configured".to_string()))?;
        info!("Searching for renderers");
        search.search()
    }

    pub fn handle_discovery(&self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::Added(device) | DiscoveryEvent::Updated(device) => {
                self.registry.on_device_seen(device);
            }
            DiscoveryEvent::Removed(id) => self.registry.on_device_removed(&id),
        }
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Sessions ordered by device id.
    pub fn sessions(&self) -> Vec<SessionSnapshot> {
        self.registry.list().iter().map(|s| s.snapshot()).collect()
    }

    pub fn session(&self, id: &DeviceId) -> Option<Arc<DeviceSession>> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Mark the device tracked and subscribe to its events.
    ///
    /// A failed subscription is returned, but the device stays tracked so
    /// that the next discovery of it retries.
    pub async fn start_tracking(&self, id: &DeviceId) -> Result<()> {
        let session = self.require(id)?;
        session.set_tracked(true);
        self.registry.persist()?;
        session
            .subscribe(self.registry.subscriptions(), self.registry.handler())
            .await
    }

    /// Mark the device untracked and end its subscription.
    ///
    /// Waits the configured grace period, since the subscription service
    /// confirms termination asynchronously.
    pub async fn stop_tracking(&self, id: &DeviceId) -> Result<()> {
        let session = self.require(id)?;
        session.set_tracked(false);
        self.registry.persist()?;
        session.unsubscribe(self.registry.subscriptions());

        let grace = self.settings.read().unsubscribe_grace;
        tokio::time::sleep(grace).await;
        Ok(())
    }

    pub fn set_auto_play(&self, id: &DeviceId, auto_play: bool) -> Result<()> {
        self.require(id)?.set_auto_play(auto_play);
        self.registry.persist()
    }

    pub fn set_display_name(&self, id: &DeviceId, name: Option<String>) -> Result<()> {
        self.require(id)?.set_display_name(name);
        self.registry.persist()
    }

    // ------------------------------------------------------------------
    // Playlist
    // ------------------------------------------------------------------

    pub fn playlist(&self) -> Vec<PlayItem> {
        self.playlist.lock().items().to_vec()
    }

    pub fn add(&self, item: PlayItem) -> Result<()> {
        self.playlist.lock().append(item);
        self.registry.persist()
    }

    pub fn update(&self, index: usize, item: PlayItem) -> Result<()> {
        self.playlist.lock().replace_at(index, item)?;
        self.registry.persist()
    }

    pub fn remove(&self, index: usize) -> Result<PlayItem> {
        let removed = self.playlist.lock().remove_at(index)?;
        self.registry.persist()?;
        Ok(removed)
    }

    pub fn move_earlier(&self, index: usize) -> Result<()> {
        self.playlist.lock().move_earlier(index)?;
        self.registry.persist()
    }

    pub fn move_later(&self, index: usize) -> Result<()> {
        self.playlist.lock().move_later(index)?;
        self.registry.persist()
    }

    // ------------------------------------------------------------------
    // Media root
    // ------------------------------------------------------------------

    pub fn settings(&self) -> ServerSettings {
        self.settings.read().clone()
    }

    /// Set the host renderers use to reach this machine and the directory
    /// served under the static prefix.
    pub fn configure_media_root(&self, host: &str, path: impl Into<PathBuf>) -> Result<()> {
        let host = host.trim();
        if host.is_empty() {
            return Err(CastError::InvalidArgument("host can not be empty".to_string()));
        }
        let path = path.into();
        if !path.is_dir() {
            return Err(CastError::InvalidArgument(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        {
            let mut settings = self.settings.write();
            settings.host = host.to_string();
            settings.media_root = path;
        }
        info!(host, "Media root configured");
        self.registry.persist()
    }

    /// Up to 100 files under the media root that the playlist does not list.
    pub fn unlisted_local_files(&self) -> Vec<PlayItem> {
        let root = self.settings.read().media_root.clone();
        let playlist = self.playlist.lock().clone();
        media::unlisted_files(&root, &playlist, UNLISTED_FILES_LIMIT)
    }

    // ------------------------------------------------------------------
    // Device commands
    // ------------------------------------------------------------------

    /// Play a single url outside the playlist.
    ///
    /// The playlist position is left alone, so the session still reports no
    /// playlist-driven item and a zero-length item is stopped immediately.
    pub async fn play_once(&self, id: &DeviceId, url: &str) -> Result<()> {
        let service = self.online_service(id)?;
        let item = PlayItem::new(url, None)?;
        let url = self.settings.read().resolve(&item);
        info!(device = %id, %url, "Manual play");
        play_url(&self.actions, &service, &url).await?;
        Ok(())
    }

    /// Invoke any action the device's AVTransport service declares.
    ///
    /// Input arguments are looked up by name in `arguments`.
    pub async fn exec_action(
        &self,
        id: &DeviceId,
        name: &str,
        arguments: &BTreeMap<String, String>,
    ) -> Result<ActionOutputs> {
        let service = self.online_service(id)?;
        debug!(device = %id, action = name, "Executing action");
        Ok(self.actions.invoke(&service, name, arguments).await?)
    }

    /// Actions of the device's AVTransport service, sorted by name.
    pub fn actions(&self, id: &DeviceId) -> Result<Vec<ActionSchema>> {
        Ok(self.online_service(id)?.sorted_actions())
    }

    /// End every active subscription.
    pub async fn shutdown(&self) {
        let mut ended = false;
        for session in self.registry.list() {
            if session.subscription().is_some() {
                session.unsubscribe(self.registry.subscriptions());
                ended = true;
            }
        }
        if ended {
            let grace = self.settings.read().unsubscribe_grace;
            tokio::time::sleep(grace).await;
        }
        info!("CastSystem shut down");
    }

    fn require(&self, id: &DeviceId) -> Result<Arc<DeviceSession>> {
        self.registry
            .get(id)
            .ok_or_else(|| CastError::DeviceNotFound(id.clone()))
    }

    fn online_service(&self, id: &DeviceId) -> Result<ServiceHandle> {
        self.require(id)?
            .service()
            .ok_or_else(|| CastError::DeviceOffline(id.clone()))
    }
}

// ============================================================================
// CastSystemBuilder
// ============================================================================

/// Builder for [`CastSystem`]
///
/// The action dispatcher and the subscription service are required. Without
/// a store the configuration lives in the default JSON file location.
#[derive(Default)]
pub struct CastSystemBuilder {
    dispatcher: Option<Arc<dyn ActionDispatcher>>,
    subscriptions: Option<Arc<dyn SubscriptionService>>,
    persistence: Option<Arc<dyn Persistence>>,
    search: Option<Arc<dyn DeviceSearch>>,
    runtime: Option<Handle>,
}

impl CastSystemBuilder {
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_subscriptions(mut self, subscriptions: Arc<dyn SubscriptionService>) -> Self {
        self.subscriptions = Some(subscriptions);
        self
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_search(mut self, search: Arc<dyn DeviceSearch>) -> Self {
        self.search = Some(search);
        self
    }

    /// Run background work on `runtime` instead of the current one.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<CastSystem> {
        let dispatcher = self
            .dispatcher
            .ok_or_else(|| CastError::InvalidArgument("an action dispatcher is required".to_string()))?;
        let subscriptions = self.subscriptions.ok_or_else(|| {
            CastError::InvalidArgument("a subscription service is required".to_string())
        })?;
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| {
                CastError::InvalidArgument("CastSystem must be built inside a tokio runtime".to_string())
            })?,
        };
        let persistence: Arc<dyn Persistence> = match self.persistence {
            Some(persistence) => persistence,
            None => Arc::new(JsonFileStore::at_default_location()?),
        };

        let config = persistence.load()?.normalized();
        let playlist = Arc::new(Mutex::new(Playlist::new(config.playlist.clone())));
        let settings = Arc::new(RwLock::new(ServerSettings::from_config(&config)));
        let actions = ActionClient::new(dispatcher);

        let autoplay = Arc::new(AutoplayController::new(
            Arc::clone(&playlist),
            Arc::clone(&settings),
            actions.clone(),
            runtime.clone(),
        ));
        let registry = Arc::new(DeviceRegistry::new(
            subscriptions,
            autoplay,
            SnapshotWriter::new(persistence, Arc::clone(&playlist), Arc::clone(&settings)),
            runtime,
        ));
        for prefs in &config.devices {
            registry.restore(prefs);
        }

        info!(
            devices = config.devices.len(),
            playlist = config.playlist.len(),
            "CastSystem created"
        );

        Ok(CastSystem {
            registry,
            playlist,
            settings,
            actions,
            search: self.search,
        })
    }
}
