//! Typed configuration and its persistence
//!
//! The whole configuration is one JSON document. Every key has a serde
//! default, so a missing file or a partial document still decodes into a
//! usable [`CastConfig`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CastError, Result};
use crate::model::{DeviceId, PlayItem};
use crate::playlist::Playlist;
use crate::session::DeviceSession;

const DEFAULT_HOST: &str = "127.0.0.1";
const WILDCARD_HOST: &str = "0.0.0.0";
const SAMPLE_BASE: &str = "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample";
const SAMPLE_FILES: &[&str] = &[
    "BigBuckBunny.mp4",
    "ElephantsDream.mp4",
    "ForBiggerBlazes.mp4",
    "ForBiggerEscapes.mp4",
    "ForBiggerFun.mp4",
    "ForBiggerJoyrides.mp4",
    "ForBiggerMeltdowns.mp4",
    "Sintel.mp4",
    "SubaruOutbackOnStreetAndDirt.mp4",
    "TearsOfSteel.mp4",
    "VolkswagenGTIReview.mp4",
    "WeAreGoingOnBullrun.mp4",
    "WhatCarCanYouGetForAGrand.mp4",
];

/// Persisted preferences of one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub id: DeviceId,
    #[serde(default)]
    pub tracked: bool,
    #[serde(default = "default_true")]
    pub auto_play: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DeviceConfig {
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            tracked: false,
            auto_play: true,
            name: None,
        }
    }
}

/// The persisted configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    pub devices: Vec<DeviceConfig>,
    pub playlist: Vec<PlayItem>,
    /// Host name renderers use to reach the local static file route
    pub host: String,
    pub port: u16,
    pub static_prefix: String,
    /// Directory served under `static_prefix`
    pub media_root: PathBuf,
    pub unsubscribe_grace_ms: u64,
    pub auto_stop_default_secs: u64,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            playlist: sample_playlist(),
            host: DEFAULT_HOST.to_string(),
            port: 8686,
            static_prefix: "static".to_string(),
            media_root: PathBuf::from("static"),
            unsubscribe_grace_ms: 1000,
            auto_stop_default_secs: 10,
        }
    }
}

impl CastConfig {
    /// Replace a blank or wildcard host with the loopback address, since a
    /// renderer cannot be told to fetch from `0.0.0.0`.
    ///
    /// Playlist items are put through the same checks as [`PlayItem::new`]:
    /// urls are trimmed, blank ones dropped and a zero duration is treated
    /// as absent.
    pub fn normalized(mut self) -> Self {
        let host = self.host.trim();
        if host.is_empty() || host == WILDCARD_HOST {
            self.host = DEFAULT_HOST.to_string();
        }
        self.playlist = self
            .playlist
            .into_iter()
            .filter_map(|item| {
                let duration = item.duration.filter(|secs| *secs > 0);
                match PlayItem::new(item.url, duration) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!(error = %e, "Dropping invalid playlist item");
                        None
                    }
                }
            })
            .collect();
        self
    }
}

fn default_true() -> bool {
    true
}

fn sample_playlist() -> Vec<PlayItem> {
    SAMPLE_FILES
        .iter()
        .map(|file| PlayItem::url(format!("{}/{}", SAMPLE_BASE, file)))
        .collect()
}

/// Runtime view of the non-device, non-playlist keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_prefix: String,
    pub media_root: PathBuf,
    pub unsubscribe_grace: Duration,
    pub auto_stop_default: Duration,
}

impl ServerSettings {
    pub fn from_config(config: &CastConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            static_prefix: config.static_prefix.clone(),
            media_root: config.media_root.clone(),
            unsubscribe_grace: Duration::from_millis(config.unsubscribe_grace_ms),
            auto_stop_default: Duration::from_secs(config.auto_stop_default_secs),
        }
    }

    pub fn resolve(&self, item: &PlayItem) -> String {
        Playlist::resolve_url(item, &self.host, self.port, &self.static_prefix)
    }

    fn write_into(&self, config: &mut CastConfig) {
        config.host = self.host.clone();
        config.port = self.port;
        config.static_prefix = self.static_prefix.clone();
        config.media_root = self.media_root.clone();
        config.unsubscribe_grace_ms = self.unsubscribe_grace.as_millis() as u64;
        config.auto_stop_default_secs = self.auto_stop_default.as_secs();
    }
}

/// Load and store a [`CastConfig`]
///
/// Implementations must tolerate concurrent `save` calls.
#[cfg_attr(test, mockall::automock)]
pub trait Persistence: Send + Sync {
    fn load(&self) -> Result<CastConfig>;
    fn save(&self, config: &CastConfig) -> Result<()>;
}

/// JSON file store
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write never leaves a truncated document behind.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config dir>/dlnacast/config.json`
    pub fn default_location() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dlnacast").join("config.json"))
            .ok_or_else(|| {
                CastError::Persistence("could not determine config directory".to_string())
            })
    }

    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_location()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Result<CastConfig> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No config file, using defaults");
            return Ok(CastConfig::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    fn save(&self, config: &CastConfig) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(config)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }
}

/// In-memory store, for embedding without a config file and for tests
#[derive(Default)]
pub struct MemoryStore {
    config: Mutex<CastConfig>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new(config: CastConfig) -> Self {
        Self {
            config: Mutex::new(config),
            saves: AtomicUsize::new(0),
        }
    }

    /// The last saved (or initial) document.
    pub fn current(&self) -> CastConfig {
        self.config.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<CastConfig> {
        Ok(self.config.lock().clone())
    }

    fn save(&self, config: &CastConfig) -> Result<()> {
        *self.config.lock() = config.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Assembles a full snapshot from the live state and hands it to the store
///
/// Reading the state and saving it happen under one lock, so the last save
/// always carries the latest edits.
#[derive(Clone)]
pub(crate) struct SnapshotWriter {
    store: Arc<dyn Persistence>,
    playlist: Arc<Mutex<Playlist>>,
    settings: Arc<RwLock<ServerSettings>>,
    write_lock: Arc<Mutex<()>>,
}

impl SnapshotWriter {
    pub(crate) fn new(
        store: Arc<dyn Persistence>,
        playlist: Arc<Mutex<Playlist>>,
        settings: Arc<RwLock<ServerSettings>>,
    ) -> Self {
        Self {
            store,
            playlist,
            settings,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn write<F>(&self, sessions: F) -> Result<()>
    where
        F: FnOnce() -> Vec<Arc<DeviceSession>>,
    {
        let _guard = self.write_lock.lock();
        let mut config = CastConfig {
            devices: sessions().iter().map(|s| s.prefs()).collect(),
            playlist: self.playlist.lock().items().to_vec(),
            ..CastConfig::default()
        };
        self.settings.read().write_into(&mut config);
        self.store.save(&config)
    }
}
