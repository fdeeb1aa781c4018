use std::time::Duration;

pub const ADD_DESIRES_SERVICE: &str = "/hbba/add_desires";
pub const REMOVE_DESIRES_SERVICE: &str = "/hbba/remove_desires";

pub const DEFAULT_MASTER_URI: &str = "http://localhost:11311";
pub const DEFAULT_BIND_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(100);

pub const MASTER_URI_ENV: &str = "IW_MASTER_URI";
pub const BIND_TIMEOUT_ENV: &str = "IW_BIND_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URI of the runtime hosting the IW services.
    pub master_uri: String,
    pub add_service: String,
    pub remove_service: String,
    /// Upper bound on waiting for each service at construction.
    pub bind_timeout: Duration,
    pub probe_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            master_uri: DEFAULT_MASTER_URI.to_string(),
            add_service: ADD_DESIRES_SERVICE.to_string(),
            remove_service: REMOVE_DESIRES_SERVICE.to_string(),
            bind_timeout: DEFAULT_BIND_TIMEOUT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `IW_MASTER_URI` / `IW_BIND_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(uri) = lookup(MASTER_URI_ENV).filter(|s| !s.trim().is_empty()) {
            config.master_uri = uri.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(BIND_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.bind_timeout = Duration::from_millis(ms),
                Err(_) => tracing::warn!("Ignoring unparsable {}={:?}", BIND_TIMEOUT_ENV, raw),
            }
        }

        config
    }

    pub fn with_master_uri(mut self, uri: impl Into<String>) -> Self {
        self.master_uri = uri.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_bind_timeout(mut self, timeout: Duration) -> Self {
        self.bind_timeout = timeout;
        self
    }
}
