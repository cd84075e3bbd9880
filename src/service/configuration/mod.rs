mod telemetry;

pub use telemetry::*;

use envconfig::Envconfig;
use std::collections::HashMap;
use std::fmt::Debug;

#[derive(Clone, Envconfig)]
pub struct ExecutorConfig {
    #[envconfig(from = "COMPONENT_NAME", default = "outbound-call")]
    /// Name reported as the component of every logged call
    component: String,
    #[envconfig(from = "BASE_URL")]
    /// Base URL used to resolve relative addresses
    base_url: Option<String>,
    #[envconfig(from = "TIMEOUT", default = "30000")]
    /// Request timeout of the HTTP client, in milliseconds
    timeout: u64,
    #[envconfig(from = "BEARER_TOKEN")]
    bearer_token: Option<String>,
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    log_level: String,
    #[envconfig(from = "METRICS_ENABLED", default = "false")]
    metrics_enabled: bool,
}

impl Debug for ExecutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorConfig")
            .field("component", &self.component)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("log_level", &self.log_level)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl ExecutorConfig {
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    pub fn load() -> Result<Self, envconfig::Error> {
        ExecutorConfig::init_from_env()
    }
}

impl From<HashMap<&str, &str>> for ExecutorConfig {
    fn from(value: HashMap<&str, &str>) -> Self {
        let component = value
            .get("COMPONENT_NAME")
            .unwrap_or(&"outbound-call")
            .to_string();
        let base_url = value.get("BASE_URL").map(|value| value.to_string());
        let timeout = value
            .get("TIMEOUT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30000);
        let bearer_token = value.get("BEARER_TOKEN").map(|value| value.to_string());
        let log_level = value.get("LOG_LEVEL").unwrap_or(&"info").to_string();
        let metrics_enabled = value
            .get("METRICS_ENABLED")
            .and_then(|value| value.parse().ok())
            .unwrap_or(false);

        Self {
            component,
            base_url,
            timeout,
            bearer_token,
            log_level,
            metrics_enabled,
        }
    }
}
