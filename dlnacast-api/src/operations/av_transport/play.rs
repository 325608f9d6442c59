//! Play operation for AVTransport service

use crate::{ActionOutputs, ApiError, AvOperation, Service};

/// Play operation
pub struct PlayOperation;

/// Request for play operation
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub instance_id: u32,
    pub speed: String,
}

impl PlayRequest {
    /// Instance 0 at normal speed.
    pub fn normal_speed() -> Self {
        Self {
            instance_id: 0,
            speed: "1".to_string(),
        }
    }
}

/// Response for play operation
#[derive(Debug)]
pub struct PlayResponse;

impl AvOperation for PlayOperation {
    type Request = PlayRequest;
    type Response = PlayResponse;

    const SERVICE: Service = Service::AVTransport;
    const ACTION: &'static str = "Play";

    fn arguments(request: &Self::Request) -> Vec<(String, String)> {
        vec![
            ("InstanceID".to_string(), request.instance_id.to_string()),
            ("Speed".to_string(), request.speed.clone()),
        ]
    }

    fn parse_response(_outputs: &ActionOutputs) -> Result<Self::Response, ApiError> {
        Ok(PlayResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_arguments() {
        let args = PlayOperation::arguments(&PlayRequest::normal_speed());
        assert_eq!(
            args,
            vec![
                ("InstanceID".to_string(), "0".to_string()),
                ("Speed".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_play_response_parsing() {
        assert!(PlayOperation::parse_response(&ActionOutputs::new()).is_ok());
    }
}
