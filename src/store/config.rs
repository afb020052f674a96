use serde::{Deserialize, Serialize};

/// Store construction options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Report every state-changing dispatch through `tracing` and to
    /// transition observers.
    pub logging: bool,
}

impl StoreConfig {
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { logging: true }
    }
}
