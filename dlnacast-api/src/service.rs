use serde::{Deserialize, Serialize};

/// UPnP services a media renderer exposes
///
/// Only AVTransport is driven by the autoplay core; the other two are listed
/// so that descriptors built by a discovery layer can be looked up uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// AVTransport service - Controls playback (set URI, play, stop, seek, etc.)
    AVTransport,

    /// RenderingControl service - Controls volume, mute and picture settings
    RenderingControl,

    /// ConnectionManager service - Reports supported protocols
    ConnectionManager,
}

/// Identifiers under which a service appears in a device description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// The `serviceType` URN, e.g. `urn:schemas-upnp-org:service:AVTransport:1`
    pub service_type: &'static str,

    /// The `serviceId` URN, e.g. `urn:upnp-org:serviceId:AVTransport`
    pub service_id: &'static str,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::AVTransport => "AVTransport",
            Service::RenderingControl => "RenderingControl",
            Service::ConnectionManager => "ConnectionManager",
        }
    }

    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::AVTransport => ServiceInfo {
                service_type: "urn:schemas-upnp-org:service:AVTransport:1",
                service_id: "urn:upnp-org:serviceId:AVTransport",
            },
            Service::RenderingControl => ServiceInfo {
                service_type: "urn:schemas-upnp-org:service:RenderingControl:1",
                service_id: "urn:upnp-org:serviceId:RenderingControl",
            },
            Service::ConnectionManager => ServiceInfo {
                service_type: "urn:schemas-upnp-org:service:ConnectionManager:1",
                service_id: "urn:upnp-org:serviceId:ConnectionManager",
            },
        }
    }

    /// Whether a service id taken from a device description denotes this
    /// service.
    ///
    /// Matching is on the trailing id segment so that vendor namespaces
    /// (`urn:schemas-upnp-org:serviceId:AVTransport`) are accepted too.
    pub fn matches_id(&self, service_id: &str) -> bool {
        service_id.rsplit(':').next() == Some(self.name())
    }
}

/// Direction of an action argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentDirection {
    In,
    Out,
}

/// One argument of a service action as declared in the service description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    pub name: String,
    pub direction: ArgumentDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_state_variable: Option<String>,
}

impl ArgumentSchema {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: ArgumentDirection::In,
            related_state_variable: None,
        }
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: ArgumentDirection::Out,
            related_state_variable: None,
        }
    }
}

/// A named action and its argument list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSchema {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentSchema>,
}

impl ActionSchema {
    pub fn new(name: impl Into<String>, arguments: Vec<ArgumentSchema>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn inputs(&self) -> impl Iterator<Item = &ArgumentSchema> {
        self.arguments
            .iter()
            .filter(|a| a.direction == ArgumentDirection::In)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &ArgumentSchema> {
        self.arguments
            .iter()
            .filter(|a| a.direction == ArgumentDirection::Out)
    }
}

/// A service instance on a concrete device
///
/// This is what a discovery layer hands over after reading the device and
/// service descriptions. The URLs are opaque to the core and only passed back
/// to the dispatcher and subscription collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHandle {
    pub service_type: String,
    pub service_id: String,
    pub control_url: String,
    pub event_sub_url: String,
    #[serde(default)]
    pub actions: Vec<ActionSchema>,
}

impl ServiceHandle {
    pub fn new(service: Service, control_url: impl Into<String>, event_sub_url: impl Into<String>) -> Self {
        let info = service.info();
        Self {
            service_type: info.service_type.to_string(),
            service_id: info.service_id.to_string(),
            control_url: control_url.into(),
            event_sub_url: event_sub_url.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<ActionSchema>) -> Self {
        self.actions = actions;
        self
    }

    pub fn is(&self, service: Service) -> bool {
        service.matches_id(&self.service_id)
    }

    pub fn action(&self, name: &str) -> Option<&ActionSchema> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Declared actions ordered by name.
    pub fn sorted_actions(&self) -> Vec<ActionSchema> {
        let mut actions = self.actions.clone();
        actions.sort_by(|a, b| a.name.cmp(&b.name));
        actions
    }
}
