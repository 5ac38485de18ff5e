use tokio::sync::watch;
use toolchat_core::{Controller, ControllerBuilder, Snapshot};
use toolchat_http::{
    Error as HttpError, HealthStatus, HttpAssistantService, HttpServiceConfig,
    ToolCatalog,
};

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    service: HttpAssistantService,
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder talking to the service described by
    /// `config`.
    pub fn with_config(config: HttpServiceConfig) -> Self {
        let service = HttpAssistantService::new(config);
        let controller_builder = ControllerBuilder::with_service(service.clone());
        Self {
            service,
            controller_builder,
        }
    }

    /// Attaches a callback to be invoked when a turn has finished.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.controller_builder = self.controller_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    ///
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> Session {
        let controller = self.controller_builder.build();
        Session {
            controller,
            service: self.service,
        }
    }
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session holds a controller wired to the HTTP service, and is
/// basically a wrapper around [`Controller`] plus the service's discovery
/// endpoints.
pub struct Session {
    controller: Controller,
    service: HttpAssistantService,
}

impl Session {
    /// Types `message` into the input box and presses send.
    ///
    /// Blank messages, and messages sent while a reply is pending, are
    /// ignored.
    #[inline]
    pub fn send_message(&self, message: &str) {
        self.controller.update_input_buffer(message);
        self.controller.submit_input();
    }

    /// Returns what a renderer should currently show.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot()
    }

    /// Returns a receiver notified on every change of the snapshot.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.controller.subscribe()
    }

    /// Returns the underlying controller.
    #[inline]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Queries the service's health endpoint.
    #[inline]
    pub async fn health(&self) -> Result<HealthStatus, HttpError> {
        self.service.health().await
    }

    /// Queries the service's tool catalog.
    #[inline]
    pub async fn list_tools(&self) -> Result<ToolCatalog, HttpError> {
        self.service.list_tools().await
    }
}
