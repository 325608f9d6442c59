//! Reactive autoplay policy
//!
//! Runs once per applied AVTransport event. The decision is taken under the
//! playlist and session locks (in that order); the resulting device commands
//! are spawned and never awaited by the event pump.

use std::sync::Arc;
use std::time::Duration;

use dlnacast_api::operations::av_transport::{
    PlayOperation, PlayRequest, SetAVTransportURIOperation, SetAVTransportURIRequest,
    StopOperation, StopRequest,
};
use dlnacast_api::{ActionClient, ServiceHandle, TransportState};
use dlnacast_parser::is_zero_duration;
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::ServerSettings;
use crate::playlist::Playlist;
use crate::session::{DeviceSession, NO_PLAY_ITEM};
use crate::subscription::SessionEventHandler;

/// What an event asks the controller to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decision {
    Advance {
        service: ServiceHandle,
        index: i64,
        url: String,
    },
    StopNow {
        service: ServiceHandle,
    },
    ArmAutoStop {
        delay: Duration,
        explicit_duration: bool,
    },
    Nothing,
}

pub struct AutoplayController {
    playlist: Arc<Mutex<Playlist>>,
    settings: Arc<RwLock<ServerSettings>>,
    actions: ActionClient,
    runtime: Handle,
}

impl AutoplayController {
    pub(crate) fn new(
        playlist: Arc<Mutex<Playlist>>,
        settings: Arc<RwLock<ServerSettings>>,
        actions: ActionClient,
        runtime: Handle,
    ) -> Self {
        Self {
            playlist,
            settings,
            actions,
            runtime,
        }
    }

    /// Evaluate the session's latest state and dispatch whatever it calls for.
    pub fn on_event(&self, session: &Arc<DeviceSession>) {
        let decision = self.decide(session);
        self.execute(session, decision);
    }

    pub(crate) fn decide(&self, session: &DeviceSession) -> Decision {
        let playlist = self.playlist.lock();
        let mut state = session.lock();

        let Some(transport_state) = state.transport_state.clone() else {
            return Decision::Nothing;
        };

        match transport_state {
            TransportState::NoMediaPresent
            | TransportState::PausedPlayback
            | TransportState::Stopped => {
                if !state.auto_play || state.play_preparing {
                    return Decision::Nothing;
                }
                if playlist.is_empty() {
                    debug!(device = %session.id(), "Playlist is empty, nothing to advance to");
                    return Decision::Nothing;
                }
                let Some(service) = state.service.clone() else {
                    debug!(device = %session.id(), "No AVTransport service, skipping advance");
                    return Decision::Nothing;
                };

                let next = (state.current_play_item_index + 1).rem_euclid(playlist.len() as i64);
                let Some(item) = playlist.get(next as usize) else {
                    return Decision::Nothing;
                };

                state.play_preparing = true;
                state.auto_stop_armed = false;
                state.current_play_item_index = next;

                Decision::Advance {
                    service,
                    index: next,
                    url: self.settings.read().resolve(item),
                }
            }
            TransportState::Playing => {
                let zero = state
                    .current_track_duration
                    .as_deref()
                    .map_or(false, is_zero_duration);
                if !zero || state.auto_stop_armed {
                    return Decision::Nothing;
                }

                if state.current_play_item_index == NO_PLAY_ITEM {
                    return match state.service.clone() {
                        Some(service) => Decision::StopNow { service },
                        None => {
                            debug!(device = %session.id(), "No AVTransport service, skipping stop");
                            Decision::Nothing
                        }
                    };
                }

                let Ok(index) = usize::try_from(state.current_play_item_index) else {
                    return Decision::Nothing;
                };
                match playlist.get(index) {
                    Some(item) => {
                        state.auto_stop_armed = true;
                        Decision::ArmAutoStop {
                            delay: item
                                .duration
                                .map(Duration::from_secs)
                                .unwrap_or(self.settings.read().auto_stop_default),
                            explicit_duration: item.duration.is_some(),
                        }
                    }
                    None => Decision::Nothing,
                }
            }
            TransportState::Transitioning
            | TransportState::PausedRecording
            | TransportState::Recording
            | TransportState::Vendor(_) => Decision::Nothing,
        }
    }

    fn execute(&self, session: &Arc<DeviceSession>, decision: Decision) {
        match decision {
            Decision::Advance {
                service,
                index,
                url,
            } => {
                let session = Arc::clone(session);
                let actions = self.actions.clone();
                self.runtime.spawn(async move {
                    info!(device = %session.id(), index, %url, "Advancing playlist");
                    if let Err(e) = play_url(&actions, &service, &url).await {
                        warn!(device = %session.id(), index, error = %e, "Advance failed");
                    }
                    session.finish_preparing();
                });
            }
            Decision::StopNow { service } => {
                let session = Arc::clone(session);
                let actions = self.actions.clone();
                self.runtime.spawn(async move {
                    info!(device = %session.id(), "Stopping zero-length item");
                    if let Err(e) = stop(&actions, &service).await {
                        warn!(device = %session.id(), error = %e, "Stop failed");
                    }
                });
            }
            Decision::ArmAutoStop {
                delay,
                explicit_duration,
            } => {
                let session = Arc::clone(session);
                let actions = self.actions.clone();
                debug!(device = %session.id(), ?delay, "Auto-stop armed");
                self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    auto_stop_fired(&actions, &session, explicit_duration).await;
                });
            }
            Decision::Nothing => {}
        }
    }
}

impl SessionEventHandler for AutoplayController {
    fn on_session_event(&self, session: &Arc<DeviceSession>) {
        self.on_event(session);
    }
}

async fn auto_stop_fired(actions: &ActionClient, session: &Arc<DeviceSession>, explicit_duration: bool) {
    if explicit_duration || session.reports_zero_duration() {
        match session.service() {
            Some(service) => {
                info!(device = %session.id(), "Auto-stop fired");
                if let Err(e) = stop(actions, &service).await {
                    warn!(device = %session.id(), error = %e, "Auto-stop failed");
                }
            }
            None => debug!(device = %session.id(), "Device went offline before auto-stop"),
        }
    } else {
        debug!(device = %session.id(), "Track changed before auto-stop, skipping");
    }
    session.disarm_auto_stop();
}

/// `SetAVTransportURI` followed by `Play` at normal speed.
pub(crate) async fn play_url(
    actions: &ActionClient,
    service: &ServiceHandle,
    url: &str,
) -> dlnacast_api::Result<()> {
    actions
        .execute::<SetAVTransportURIOperation>(service, &SetAVTransportURIRequest::new(url))
        .await?;
    actions
        .execute::<PlayOperation>(service, &PlayRequest::normal_speed())
        .await?;
    Ok(())
}

async fn stop(actions: &ActionClient, service: &ServiceHandle) -> dlnacast_api::Result<()> {
    actions
        .execute::<StopOperation>(service, &StopRequest::default())
        .await?;
    Ok(())
}
