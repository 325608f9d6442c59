//! Event subscription lifecycle of a session
//!
//! The transport (GENA over HTTP) is owned by a [`SubscriptionService`]
//! supplied by the embedding application. The service reports back through a
//! notice channel; each subscribe request gets its own channel and its own
//! pump task, which applies the notices to the session in arrival order.

use std::fmt;
use std::sync::Arc;

use dlnacast_api::ServiceHandle;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{CastError, Result};
use crate::session::DeviceSession;

/// Identifier the subscription service assigned to an established
/// subscription (the GENA `SID`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a subscription service reports about one subscribe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionNotice {
    Established(SubscriptionId),
    /// Raw event body, a GENA `propertyset` carrying `LastChange`
    EventReceived(String),
    Ended,
    Failed(String),
}

pub type NoticeSender = mpsc::UnboundedSender<SubscriptionNotice>;

/// Subscription transport
///
/// `subscribe` starts a request and returns immediately; progress is reported
/// on `notices`. `end` terminates an established subscription, which the
/// service confirms with [`SubscriptionNotice::Ended`] on the same channel.
pub trait SubscriptionService: Send + Sync {
    fn subscribe(&self, service: &ServiceHandle, notices: NoticeSender);
    fn end(&self, subscription: &SubscriptionId);
}

/// Receives every successfully applied event of a session
pub trait SessionEventHandler: Send + Sync {
    fn on_session_event(&self, session: &Arc<DeviceSession>);
}

impl DeviceSession {
    /// Subscribe to AVTransport events.
    ///
    /// Succeeds without a request when a subscription is already active or
    /// the session has no AVTransport service. Otherwise resolves once the
    /// service reports `Established` or `Failed`. Two calls racing before the
    /// first resolves both issue a request.
    pub async fn subscribe(
        self: &Arc<Self>,
        subscriptions: &Arc<dyn SubscriptionService>,
        handler: Arc<dyn SessionEventHandler>,
    ) -> Result<()> {
        let service = {
            let state = self.lock();
            if state.subscription.is_some() {
                debug!(device = %self.id(), "Already subscribed");
                return Ok(());
            }
            match &state.service {
                Some(service) => service.clone(),
                None => {
                    debug!(device = %self.id(), "No AVTransport service, not subscribing");
                    return Ok(());
                }
            }
        };

        let (notices_tx, notices_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(pump_notices(Arc::clone(self), notices_rx, done_tx, handler));

        subscriptions.subscribe(&service, notices_tx);

        match done_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(CastError::SubscriptionFailed(reason)),
            Err(_) => Err(CastError::SubscriptionFailed(
                "subscription request dropped without an answer".to_string(),
            )),
        }
    }

    /// Ask the service to end the active subscription.
    ///
    /// The handle clears asynchronously when `Ended` arrives.
    pub fn unsubscribe(&self, subscriptions: &Arc<dyn SubscriptionService>) {
        let active = self.lock().subscription.clone();
        match active {
            Some(id) => {
                info!(device = %self.id(), subscription = %id, "Ending subscription");
                subscriptions.end(&id);
            }
            None => debug!(device = %self.id(), "No active subscription"),
        }
    }

    /// Detach the device, end any subscription and drop all transient and
    /// derived state. Preferences survive.
    pub fn release(&self, subscriptions: &Arc<dyn SubscriptionService>) {
        let ended = {
            let mut state = self.lock();
            state.device = None;
            state.service = None;
            state.play_preparing = false;
            state.current_play_item_index = crate::session::NO_PLAY_ITEM;
            state.auto_stop_armed = false;
            state.clear_derived();
            state.subscription.take()
        };

        if let Some(id) = ended {
            info!(device = %self.id(), subscription = %id, "Released, ending subscription");
            subscriptions.end(&id);
        }
    }

    /// Clear the handle only if it is still the one `owner` established.
    fn clear_subscription(&self, owner: Option<&SubscriptionId>) {
        let mut state = self.lock();
        if owner.is_some() && state.subscription.as_ref() == owner {
            state.subscription = None;
        }
    }
}

async fn pump_notices(
    session: Arc<DeviceSession>,
    mut notices: mpsc::UnboundedReceiver<SubscriptionNotice>,
    done: oneshot::Sender<std::result::Result<(), String>>,
    handler: Arc<dyn SessionEventHandler>,
) {
    let mut done = Some(done);
    let mut owned: Option<SubscriptionId> = None;

    while let Some(notice) = notices.recv().await {
        match notice {
            SubscriptionNotice::Established(id) => {
                info!(device = %session.id(), subscription = %id, "Subscription established");
                session.lock().subscription = Some(id.clone());
                owned = Some(id);
                if let Some(done) = done.take() {
                    let _ = done.send(Ok(()));
                }
            }
            SubscriptionNotice::EventReceived(raw) => match session.refresh_from_event(&raw) {
                Ok(()) => handler.on_session_event(&session),
                Err(e) => warn!(device = %session.id(), error = %e, "Dropping undecodable event"),
            },
            SubscriptionNotice::Ended => {
                info!(device = %session.id(), "Subscription ended");
                session.clear_subscription(owned.as_ref());
                break;
            }
            SubscriptionNotice::Failed(reason) => {
                warn!(device = %session.id(), %reason, "Subscription failed");
                session.clear_subscription(owned.as_ref());
                if let Some(done) = done.take() {
                    let _ = done.send(Err(reason));
                }
                break;
            }
        }
    }
}
