//! Per-device session state
//!
//! A [`DeviceSession`] outlives the device it describes: discovery attaches a
//! descriptor when the renderer appears and [`DeviceSession::release`]
//! detaches it when it goes away, while the persisted preferences stay.
//!
//! The subscription half of the session lives in [`crate::subscription`].

use std::collections::BTreeSet;

use dlnacast_api::{DeviceDescriptor, Service, ServiceHandle, TransportState};
use dlnacast_parser::{is_zero_duration, AVTransportParser};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::model::DeviceId;
use crate::subscription::SubscriptionId;

/// No playlist-driven item is active.
pub const NO_PLAY_ITEM: i64 = -1;

#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    pub(crate) tracked: bool,
    pub(crate) auto_play: bool,
    pub(crate) display_name: Option<String>,

    pub(crate) device: Option<DeviceDescriptor>,
    pub(crate) service: Option<ServiceHandle>,
    pub(crate) subscription: Option<SubscriptionId>,
    pub(crate) play_preparing: bool,
    pub(crate) current_play_item_index: i64,
    pub(crate) auto_stop_armed: bool,

    // Last known values; `None` until the first event and after release.
    pub(crate) available_actions: Option<BTreeSet<String>>,
    pub(crate) transport_state: Option<TransportState>,
    pub(crate) current_track_uri: Option<String>,
    pub(crate) current_track_duration: Option<String>,
}

impl SessionState {
    fn with_prefs(prefs: &DeviceConfig) -> Self {
        Self {
            tracked: prefs.tracked,
            auto_play: prefs.auto_play,
            display_name: prefs.name.clone(),
            device: None,
            service: None,
            subscription: None,
            play_preparing: false,
            current_play_item_index: NO_PLAY_ITEM,
            auto_stop_armed: false,
            available_actions: None,
            transport_state: None,
            current_track_uri: None,
            current_track_duration: None,
        }
    }

    pub(crate) fn clear_derived(&mut self) {
        self.available_actions = None;
        self.transport_state = None;
        self.current_track_uri = None;
        self.current_track_duration = None;
    }
}

/// Serializable view of a session for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub id: DeviceId,
    /// The user-assigned name, falling back to the device's friendly name
    pub name: Option<String>,
    pub model_name: Option<String>,
    pub online: bool,
    pub tracked: bool,
    pub auto_play: bool,
    pub subscribed: bool,
    pub transport_state: Option<String>,
    pub current_track_uri: Option<String>,
    pub current_track_duration: Option<String>,
    pub available_actions: Vec<String>,
    pub current_play_item_index: i64,
    pub play_preparing: bool,
    pub auto_stop_armed: bool,
}

/// Operational state of one render device
#[derive(Debug)]
pub struct DeviceSession {
    id: DeviceId,
    state: Mutex<SessionState>,
}

impl DeviceSession {
    pub fn new(id: DeviceId) -> Self {
        let prefs = DeviceConfig::new(id);
        Self::from_prefs(&prefs)
    }

    pub fn from_prefs(prefs: &DeviceConfig) -> Self {
        Self {
            id: prefs.id.clone(),
            state: Mutex::new(SessionState::with_prefs(prefs)),
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock()
    }

    pub fn tracked(&self) -> bool {
        self.lock().tracked
    }

    pub fn set_tracked(&self, tracked: bool) {
        self.lock().tracked = tracked;
    }

    pub fn auto_play(&self) -> bool {
        self.lock().auto_play
    }

    pub fn set_auto_play(&self, auto_play: bool) {
        self.lock().auto_play = auto_play;
    }

    pub fn display_name(&self) -> Option<String> {
        self.lock().display_name.clone()
    }

    pub fn set_display_name(&self, name: Option<String>) {
        self.lock().display_name = name.filter(|n| !n.trim().is_empty());
    }

    pub fn prefs(&self) -> DeviceConfig {
        let state = self.lock();
        DeviceConfig {
            id: self.id.clone(),
            tracked: state.tracked,
            auto_play: state.auto_play,
            name: state.display_name.clone(),
        }
    }

    pub fn device(&self) -> Option<DeviceDescriptor> {
        self.lock().device.clone()
    }

    pub fn service(&self) -> Option<ServiceHandle> {
        self.lock().service.clone()
    }

    pub fn is_online(&self) -> bool {
        self.lock().device.is_some()
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.lock().subscription.clone()
    }

    pub fn play_preparing(&self) -> bool {
        self.lock().play_preparing
    }

    pub fn current_play_item_index(&self) -> i64 {
        self.lock().current_play_item_index
    }

    /// Point the session at a playlist index, or [`NO_PLAY_ITEM`].
    pub fn set_current_play_item_index(&self, index: i64) {
        self.lock().current_play_item_index = index.max(NO_PLAY_ITEM);
    }

    pub fn auto_stop_armed(&self) -> bool {
        self.lock().auto_stop_armed
    }

    pub fn transport_state(&self) -> Option<TransportState> {
        self.lock().transport_state.clone()
    }

    pub fn current_track_uri(&self) -> Option<String> {
        self.lock().current_track_uri.clone()
    }

    pub fn current_track_duration(&self) -> Option<String> {
        self.lock().current_track_duration.clone()
    }

    pub fn available_actions(&self) -> Option<BTreeSet<String>> {
        self.lock().available_actions.clone()
    }

    /// True while the renderer reports a zero track duration.
    pub fn reports_zero_duration(&self) -> bool {
        self.lock()
            .current_track_duration
            .as_deref()
            .map_or(false, is_zero_duration)
    }

    /// Attach a freshly discovered descriptor and its AVTransport service.
    pub fn attach(&self, device: DeviceDescriptor) {
        let service = device.lookup_service(Service::AVTransport).cloned();
        if service.is_none() {
            warn!(device = %self.id, "Renderer has no AVTransport service");
        }
        let mut state = self.lock();
        state.service = service;
        state.device = Some(device);
    }

    /// Apply an AVTransport notification.
    ///
    /// Variables the payload does not mention keep their previous value. A
    /// payload that cannot be decoded leaves the session untouched.
    pub fn refresh_from_event(&self, raw: &str) -> Result<()> {
        let change = AVTransportParser::from_xml(raw)?.change_set();

        let mut state = self.lock();
        if let Some(raw_state) = change.transport_state {
            match raw_state.parse::<TransportState>() {
                Ok(transport_state) => state.transport_state = Some(transport_state),
                Err(_) => debug!(device = %self.id, "Ignoring blank TransportState"),
            }
        }
        if let Some(actions) = change.current_transport_actions {
            state.available_actions = Some(actions.into_iter().collect());
        }
        if let Some(uri) = change.current_track_uri {
            state.current_track_uri = Some(uri);
        }
        if let Some(duration) = change.current_track_duration {
            state.current_track_duration = Some(duration);
        }
        Ok(())
    }

    pub(crate) fn finish_preparing(&self) {
        self.lock().play_preparing = false;
    }

    pub(crate) fn disarm_auto_stop(&self) {
        self.lock().auto_stop_armed = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        let device = state.device.as_ref();
        SessionSnapshot {
            id: self.id.clone(),
            name: state
                .display_name
                .clone()
                .or_else(|| device.map(|d| d.friendly_name.clone())),
            model_name: device.and_then(|d| d.model_name.clone()),
            online: device.is_some(),
            tracked: state.tracked,
            auto_play: state.auto_play,
            subscribed: state.subscription.is_some(),
            transport_state: state.transport_state.as_ref().map(|s| s.to_string()),
            current_track_uri: state.current_track_uri.clone(),
            current_track_duration: state.current_track_duration.clone(),
            available_actions: state
                .available_actions
                .iter()
                .flatten()
                .cloned()
                .collect(),
            current_play_item_index: state.current_play_item_index,
            play_preparing: state.play_preparing,
            auto_stop_armed: state.auto_stop_armed,
        }
    }
}
