//! Runtime configuration, read from `TODO_*` environment variables.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base `tracing` directive for everything outside the two channels.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// When set, each channel is also written to its own file here.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, e.g. `TODO_PORT=8080`.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("TODO"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
            log_dir: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9583
}

fn default_log_filter() -> String {
    "info".to_string()
}
