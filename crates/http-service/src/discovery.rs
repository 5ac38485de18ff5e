use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What the service reports about itself on its health endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the service is up.
    pub status: String,
    /// The model behind the assistant.
    #[serde(default)]
    pub model: Option<String>,
    /// How many tools the backend can run.
    #[serde(default)]
    pub total_tools: usize,
    /// Names of those tools.
    #[serde(default)]
    pub tools: Vec<String>,
}

impl HealthStatus {
    /// Returns `true` if the service reports itself healthy.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Tool names grouped by category.
pub type ToolCatalog = BTreeMap<String, Vec<String>>;
