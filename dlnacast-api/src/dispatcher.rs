//! Action execution seam
//!
//! The embedding application supplies an [`ActionDispatcher`] that knows how
//! to reach a device (SOAP over HTTP in practice). [`ActionClient`] layers the
//! typed operations and schema-driven argument building on top of it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::operation::AvOperation;
use crate::service::ServiceHandle;

/// Named output arguments returned by an action
pub type ActionOutputs = BTreeMap<String, String>;

/// Executes a single named action against a service
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn execute(
        &self,
        service: &ServiceHandle,
        action: &str,
        arguments: &[(String, String)],
    ) -> Result<ActionOutputs>;
}

/// Typed front end over an [`ActionDispatcher`]
#[derive(Clone)]
pub struct ActionClient {
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl ActionClient {
    pub fn new(dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Execute a typed operation against a service
    pub async fn execute<Op: AvOperation>(
        &self,
        service: &ServiceHandle,
        request: &Op::Request,
    ) -> Result<Op::Response> {
        let arguments = Op::arguments(request);
        debug!(action = Op::ACTION, service = %service.service_id, "Executing action");

        let outputs = self
            .dispatcher
            .execute(service, Op::ACTION, &arguments)
            .await?;

        Op::parse_response(&outputs)
    }

    /// Execute an arbitrary action declared by the service
    ///
    /// Input arguments are taken from `provided` in the order the action
    /// schema lists them; extra entries are ignored.
    pub async fn invoke(
        &self,
        service: &ServiceHandle,
        action: &str,
        provided: &BTreeMap<String, String>,
    ) -> Result<ActionOutputs> {
        let arguments = build_arguments(service, action, provided)?;
        debug!(action, service = %service.service_id, "Invoking declared action");
        self.dispatcher.execute(service, action, &arguments).await
    }
}

/// Order the supplied values by the action's declared input arguments.
pub fn build_arguments(
    service: &ServiceHandle,
    action: &str,
    provided: &BTreeMap<String, String>,
) -> Result<Vec<(String, String)>> {
    let schema = service
        .action(action)
        .ok_or_else(|| ApiError::UnknownAction(action.to_string()))?;

    schema
        .inputs()
        .map(|argument| {
            provided
                .get(&argument.name)
                .map(|value| (argument.name.clone(), value.clone()))
                .ok_or_else(|| ApiError::MissingArgument {
                    action: action.to_string(),
                    argument: argument.name.clone(),
                })
        })
        .collect()
}
