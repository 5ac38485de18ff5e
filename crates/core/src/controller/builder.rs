use toolchat_proto::AssistantService;

use super::Controller;
use crate::service_client::ServiceClient;

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) service_client: ServiceClient,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified assistant service.
    #[inline]
    pub fn with_service<S: AssistantService + 'static>(service: S) -> Self {
        Self {
            service_client: ServiceClient::new(service),
            on_idle: None,
        }
    }

    /// Attaches a callback to be invoked each time a turn has finished
    /// and the controller is idle again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the controller and starts its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[inline]
    pub fn build(self) -> Controller {
        Controller::spawn_from_builder(self)
    }
}
