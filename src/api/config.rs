use std::env;

use anyhow::Context;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the course backend lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// bearer token, normally taken from the current session
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Reads `QUARK_API_URL`, `QUARK_TOKEN` and `QUARK_TIMEOUT_SECS`, loading a
    /// `.env` file first when one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = ApiConfig::default();

        if let Some(base_url) = var("QUARK_API_URL") {
            config.base_url = base_url;
        }
        config.token = var("QUARK_TOKEN").filter(|t| !t.is_empty());
        if let Some(timeout) = var("QUARK_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .context(format!("QUARK_TIMEOUT_SECS must be a number, got '{}'", timeout))?;
        }

        Ok(config)
    }
}
