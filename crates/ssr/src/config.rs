use std::env;
use std::time::Duration;

pub const DEFAULT_NODE_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_DOCTYPE: &str = "<!doctype html>";

const TIMEOUT_ENV: &str = "PRERENDER_NODE_TIMEOUT_MS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Upper bound on each node's readiness wait.
    pub per_node_timeout: Duration,
    /// Written verbatim before the document element.
    pub doctype: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            per_node_timeout: DEFAULT_NODE_TIMEOUT,
            doctype: DEFAULT_DOCTYPE.to_string(),
        }
    }
}

impl RenderConfig {
    /// Defaults, overridden by `PRERENDER_NODE_TIMEOUT_MS` when it parses.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = env::var(TIMEOUT_ENV).ok().and_then(|v| v.trim().parse::<u64>().ok()) {
            config.per_node_timeout = Duration::from_millis(ms);
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.per_node_timeout = timeout;
        self
    }
}
