//! Configuration read from the environment.

use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::time::Duration;

use toolchat_http::{HttpServiceConfig, HttpServiceConfigBuilder};

/// Overrides the chat endpoint.
pub const ENDPOINT_VAR: &str = "TOOLCHAT_ENDPOINT";
/// Sets a per-request timeout, in whole seconds.
pub const TIMEOUT_VAR: &str = "TOOLCHAT_TIMEOUT_SECS";

/// A variable was set to something unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    var: &'static str,
    value: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.var, self.value)
    }
}

impl StdError for ConfigError {}

/// Builds the service configuration from the process environment.
#[inline]
pub fn config_from_env() -> Result<HttpServiceConfig, ConfigError> {
    config_from_lookup(|var| env::var(var).ok())
}

/// Builds the service configuration from an arbitrary variable lookup.
///
/// Unset or empty variables fall back to defaults.
pub fn config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<HttpServiceConfig, ConfigError> {
    let lookup = |var| lookup(var).filter(|v: &String| !v.trim().is_empty());

    let mut builder = HttpServiceConfigBuilder::new();
    if let Some(endpoint) = lookup(ENDPOINT_VAR) {
        builder = builder.with_endpoint(endpoint.trim());
    }
    if let Some(value) = lookup(TIMEOUT_VAR) {
        let secs = value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError {
                var: TIMEOUT_VAR,
                value: value.clone(),
            })?;
        builder = builder.with_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build())
}
