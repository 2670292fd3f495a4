use std::env;
use std::time::Duration;

const DEBOUNCE_ENV: &str = "PRERENDER_INPUT_DEBOUNCE_MS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentConfig {
    /// Quiet period after the last keystroke before a search is issued.
    pub input_debounce: Duration,
    /// Typed input shorter than this (in chars) never triggers a search.
    pub min_search_len: usize,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            input_debounce: Duration::from_millis(250),
            min_search_len: 3,
        }
    }
}

impl ComponentConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = env::var(DEBOUNCE_ENV).ok().and_then(|v| v.trim().parse::<u64>().ok()) {
            config.input_debounce = Duration::from_millis(ms);
        }
        config
    }
}
