//! Stop operation for AVTransport service

use crate::{ActionOutputs, ApiError, AvOperation, Service};

/// Stop operation
pub struct StopOperation;

/// Request for stop operation
#[derive(Debug, Clone, Default)]
pub struct StopRequest {
    pub instance_id: u32,
}

/// Response for stop operation
#[derive(Debug)]
pub struct StopResponse;

impl AvOperation for StopOperation {
    type Request = StopRequest;
    type Response = StopResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "Stop";

    fn arguments(request: &Self::Request) -> Vec<(String, String)> {
        vec![("InstanceID".to_string(), request.instance_id.to_string())]
    }

    fn parse_response(_outputs: &ActionOutputs) -> Result<Self::Response, ApiError> {
        Ok(StopResponse)
    }
}
