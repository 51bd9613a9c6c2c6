// src/config.rs
use std::time::Duration;
use crate::utils::AppError;

pub const DEFAULT_BASE_URL: &str = "https://en.wiktionary.org/wiki";
// Wiktionary serves the full page layout to browser-like clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

const BASE_URL_VAR: &str = "WIKTIONARY_BASE_URL";
const USER_AGENT_VAR: &str = "WIKTIONARY_USER_AGENT";
const TIMEOUT_VAR: &str = "WIKTIONARY_TIMEOUT_SECS";

/// Settings for the page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    /// `None` leaves the HTTP client's own policy in place.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl FetchConfig {
    /// Builds the config from process environment overrides.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(user_agent) = lookup(USER_AGENT_VAR).filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_VAR, raw))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        tracing::debug!("Using fetch config: {:?}", config);
        Ok(config)
    }

    /// Constructs the URL of the entry page for a character
    pub fn page_url(&self, character: &str) -> String {
        format!("{}/{}", self.base_url, character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = FetchConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, FetchConfig::default());
        assert_eq!(config.page_url("行"), "https://en.wiktionary.org/wiki/行");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = FetchConfig::from_lookup(lookup_from(&[
            ("WIKTIONARY_BASE_URL", "http://localhost:8080/wiki/"),
            ("WIKTIONARY_USER_AGENT", "hanzi-test/1.0"),
            ("WIKTIONARY_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.page_url("水"), "http://localhost:8080/wiki/水");
        assert_eq!(config.user_agent, "hanzi-test/1.0");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let result = FetchConfig::from_lookup(lookup_from(&[("WIKTIONARY_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
