mod configuration;

pub use configuration::*;

use crate::algebra::{Authenticator, Executor, Metrics, StaticBearer, TracingLogger};
use anyhow::Context;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;
use url::Url;

/// Builds the long-lived HTTP client shared by every call of an executor.
pub fn http_client(config: &ExecutorConfig) -> Result<ClientWithMiddleware, anyhow::Error> {
    let client = Client::builder()
        .timeout(Duration::from_millis(config.timeout()))
        .build()
        .context("Failed to build HTTP client.")?;

    Ok(ClientBuilder::new(client).build())
}

impl<A: Authenticator> Executor<ClientWithMiddleware, A, TracingLogger> {
    pub fn from_config(config: &ExecutorConfig, authenticator: A) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Building executor with configuration: {}{:#?}{}",
            "\n",
            &config,
            "\n"
        );
        let client = http_client(config)?;
        let metrics = if config.metrics_enabled() {
            Metrics::new()?
        } else {
            Metrics::disabled()
        };

        let executor = Executor::new(config.component(), client, authenticator, TracingLogger)
            .with_metrics(metrics);

        match config.base_url() {
            Some(base_url) => {
                let base_url = Url::parse(base_url)
                    .with_context(|| format!("Invalid base URL: {}", base_url))?;
                Ok(executor.with_base_url(base_url))
            }
            None => Ok(executor),
        }
    }
}

impl Executor<ClientWithMiddleware, Option<StaticBearer>, TracingLogger> {
    /// Uses the configured bearer token, if any, as the authenticator.
    pub fn from_env_config(config: &ExecutorConfig) -> Result<Self, anyhow::Error> {
        let authenticator = config.bearer_token().map(StaticBearer::new);
        Executor::from_config(config, authenticator)
    }
}
