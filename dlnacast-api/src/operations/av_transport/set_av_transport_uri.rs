//! SetAVTransportURI operation for AVTransport service

use crate::{ActionOutputs, ApiError, AvOperation, Service};

/// Load a media URI into the transport
pub struct SetAVTransportURIOperation;

/// Request for SetAVTransportURI
///
/// Renderers accept an empty `CurrentURIMetaData`; DIDL-Lite metadata is
/// optional.
#[derive(Debug, Clone)]
pub struct SetAVTransportURIRequest {
    pub instance_id: u32,
    pub current_uri: String,
    pub current_uri_metadata: String,
}

impl SetAVTransportURIRequest {
    pub fn new(current_uri: impl Into<String>) -> Self {
        Self {
            instance_id: 0,
            current_uri: current_uri.into(),
            current_uri_metadata: String::new(),
        }
    }
}

/// Response for SetAVTransportURI
#[derive(Debug)]
pub struct SetAVTransportURIResponse;

impl AvOperation for SetAVTransportURIOperation {
    type Request = SetAVTransportURIRequest;
    type Response = SetAVTransportURIResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "SetAVTransportURI";

    fn arguments(request: &Self::Request) -> Vec<(String, String)> {
        vec![
            ("InstanceID".to_string(), request.instance_id.to_string()),
            ("CurrentURI".to_string(), request.current_uri.clone()),
            (
                "CurrentURIMetaData".to_string(),
                request.current_uri_metadata.clone(),
            ),
        ]
    }

    fn parse_response(_outputs: &ActionOutputs) -> Result<Self::Response, ApiError> {
        Ok(SetAVTransportURIResponse)
    }
}
