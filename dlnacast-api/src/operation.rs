use crate::dispatcher::ActionOutputs;
use crate::error::ApiError;
use crate::service::Service;

/// Base trait for typed device actions
///
/// An operation knows which service it belongs to, the action name, how to
/// turn its request into the ordered input argument list, and how to read
/// its response out of the named output arguments.
pub trait AvOperation {
    /// The request type for this operation
    type Request;

    /// The response type for this operation
    type Response;

    /// The UPnP service this operation belongs to
    const SERVICE: Service;

    /// The action name for this operation
    const ACTION: &'static str;

    /// Build the input arguments, in the order the action declares them
    fn arguments(request: &Self::Request) -> Vec<(String, String)>;

    /// Interpret the output arguments returned by the device
    fn parse_response(outputs: &ActionOutputs) -> Result<Self::Response, ApiError>;
}
