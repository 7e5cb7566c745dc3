use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3141;
pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_LIVE_INTERVAL: Duration = Duration::from_secs(2);

pub const ENV_HOST: &str = "FLOWTOP_HOST";
pub const ENV_PORT: &str = "FLOWTOP_PORT";
pub const ENV_EDITOR: &str = "EDITOR";

/// Connection and editor settings for one dashboard session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Editor command; run through `sh -c` with the file path appended.
    pub editor: String,
    /// Period of the live-tail ticker.
    pub live_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            editor: DEFAULT_EDITOR.to_string(),
            live_interval: DEFAULT_LIVE_INTERVAL,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = ClientConfig::default();

        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            cfg.host = host.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(port) => cfg.port = port,
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "ignoring invalid {}", ENV_PORT);
                }
            }
        }
        if let Some(editor) = lookup(ENV_EDITOR).filter(|e| !e.trim().is_empty()) {
            cfg.editor = editor.trim().to_string();
        }
        cfg
    }

    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        live_interval_secs: Option<u64>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(secs) = live_interval_secs {
            self.live_interval = Duration::from_secs(secs.max(1));
        }
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "../tests/model/config_tests.rs"]
mod tests;
