//! An assistant service reached over HTTP.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod discovery;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use toolchat_proto::{
    AssistantService, AssistantServiceError, ErrorKind, TurnOutcome,
    TurnRequest,
};

pub use config::{
    DEFAULT_ENDPOINT, HttpServiceConfig, HttpServiceConfigBuilder,
};
pub use discovery::{HealthStatus, ToolCatalog};

/// Error type for [`HttpAssistantService`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connect
        } else if err.is_decode() || err.is_body() {
            ErrorKind::Decode
        } else {
            ErrorKind::Other
        };
        Self::new(describe(&err), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl AssistantServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Assistant service that posts each turn as JSON to a chat endpoint.
#[derive(Clone, Debug)]
pub struct HttpAssistantService {
    client: Client,
    config: Arc<HttpServiceConfig>,
}

impl HttpAssistantService {
    /// Creates a new `HttpAssistantService` with the given configuration.
    #[inline]
    pub fn new(config: HttpServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns the configuration in use.
    #[inline]
    pub fn config(&self) -> &HttpServiceConfig {
        &self.config
    }

    /// Asks the service whether it is up, and which tools it offers.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get_json("health").await
    }

    /// Lists the backend's tools, grouped by category.
    pub async fn list_tools(&self) -> Result<ToolCatalog, Error> {
        self.get_json("tools").await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, Error> {
        let url = Url::parse(&self.config.endpoint)
            .and_then(|endpoint| endpoint.join(path))
            .map_err(|err| {
                Error::new(format!("invalid endpoint: {err}"), ErrorKind::Other)
            })?;
        debug!("fetching {url}");

        let req = self.with_timeout(self.client.get(url));
        let resp = req
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(Error::from_reqwest)?;
        resp.json().await.map_err(Error::from_reqwest)
    }

    fn with_timeout(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }
}

impl AssistantService for HttpAssistantService {
    type Error = Error;

    fn send_turn(
        &self,
        req: &TurnRequest,
    ) -> impl Future<Output = Result<TurnOutcome, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .with_timeout(self.client.post(&self.config.endpoint))
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;

            // The service reports its own failures in the body, whatever
            // the status code.
            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = resp.bytes().await.map_err(Error::from_reqwest)?;
            trace!("got {} bytes with status {status}", body.len());

            TurnOutcome::from_slice(&body).map_err(|err| {
                Error::new(
                    decode_failure(status, content_type.as_deref(), &err),
                    ErrorKind::Decode,
                )
            })
        }
    }
}

fn decode_failure(
    status: StatusCode,
    content_type: Option<&str>,
    err: &dyn StdError,
) -> String {
    let is_json = content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
        })
        .unwrap_or(true);

    let mut message = format!("{err}");
    if !is_json {
        if let Some(content_type) = content_type {
            message =
                format!("unexpected content type {content_type}, {message}");
        }
    }
    if !status.is_success() {
        message = format!("server responded with {status}, {message}");
    }
    message
}

/// Formats an error together with its sources.
fn describe(err: &dyn StdError) -> String {
    let mut message = format!("{err}");
    let mut source = err.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&format!("{err}"));
        source = err.source();
    }
    message
}
