use std::time::Duration;

/// Where a locally running backend serves chat turns.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/chat";

/// Builder for [`HttpServiceConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HttpServiceConfigBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpServiceConfigBuilder {
    /// Creates a builder with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL chat turns are posted to.
    ///
    /// The discovery endpoints (`health`, `tools`) are resolved relative
    /// to this URL, so `http://host/chat` implies `http://host/health`.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets a timeout for each request.
    ///
    /// Without a timeout, a turn waits for the service indefinitely.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpServiceConfig {
        HttpServiceConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: self.timeout,
        }
    }
}

/// Configuration for the HTTP assistant service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpServiceConfig {
    pub(crate) endpoint: String,
    pub(crate) timeout: Option<Duration>,
}

impl HttpServiceConfig {
    /// Returns the chat endpoint.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the per-request timeout, if any.
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
