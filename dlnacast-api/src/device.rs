use serde::{Deserialize, Serialize};

use crate::service::{Service, ServiceHandle};

const MEDIA_RENDERER: &str = "MediaRenderer";

/// A device as reported by discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Unique device name, `uuid:...`
    pub udn: String,
    /// Device type URN, e.g. `urn:schemas-upnp-org:device:MediaRenderer:1`
    pub device_type: String,
    pub friendly_name: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceHandle>,
}

impl DeviceDescriptor {
    pub fn new(udn: impl Into<String>, device_type: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            udn: udn.into(),
            device_type: device_type.into(),
            friendly_name: friendly_name.into(),
            model_name: None,
            services: Vec::new(),
        }
    }

    pub fn media_renderer(udn: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self::new(udn, "urn:schemas-upnp-org:device:MediaRenderer:1", friendly_name)
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_service(mut self, service: ServiceHandle) -> Self {
        self.services.push(service);
        self
    }

    pub fn lookup_service(&self, service: Service) -> Option<&ServiceHandle> {
        self.services.iter().find(|s| s.is(service))
    }

    /// True for `urn:...:device:MediaRenderer:N` device types.
    pub fn is_media_renderer(&self) -> bool {
        self.device_type
            .split(':')
            .rev()
            .nth(1)
            .map_or(false, |kind| kind == MEDIA_RENDERER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("urn:schemas-upnp-org:device:MediaRenderer:1", true)]
    #[case("urn:schemas-upnp-org:device:MediaRenderer:2", true)]
    #[case("urn:schemas-upnp-org:device:MediaServer:1", false)]
    #[case("urn:schemas-upnp-org:device:ZonePlayer:1", false)]
    #[case("", false)]
    fn test_is_media_renderer(#[case] device_type: &str, #[case] expected: bool) {
        let device = DeviceDescriptor::new("uuid:1", device_type, "TV");
        assert_eq!(device.is_media_renderer(), expected);
    }

    #[test]
    fn test_lookup_service() {
        let device = DeviceDescriptor::media_renderer("uuid:1", "Living Room TV")
            .with_model_name("Bravia")
            .with_service(ServiceHandle::new(Service::RenderingControl, "/rc", "/rc/evt"))
            .with_service(ServiceHandle::new(Service::AVTransport, "/avt", "/avt/evt"));

        let avt = device.lookup_service(Service::AVTransport).unwrap();
        assert_eq!(avt.control_url, "/avt");
        assert!(device.lookup_service(Service::ConnectionManager).is_none());
        assert_eq!(device.model_name.as_deref(), Some("Bravia"));
    }
}
