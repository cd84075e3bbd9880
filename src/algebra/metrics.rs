use crate::domain::Outcome;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt::{self, Debug};

pub const OUTCOMES_TOTAL: &str = "outbound_call_outcomes_total";

/// Outcome counters for every executed call.
///
/// The recorder is process-global. The embedding service exposes [`Metrics::render`]
/// on its own scrape endpoint.
#[derive(Clone, Default)]
pub struct Metrics {
    handle: Option<PrometheusHandle>,
}

impl Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("is_installed", &self.is_installed())
            .finish()
    }
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| {
                tracing::error!("Failed to install prometheus recorder: {}", e);
            })
            .ok();

        if handle.is_some() {
            metrics::describe_counter!(
                OUTCOMES_TOTAL,
                "The number of outbound calls by component and outcome"
            );

            Ok(Self { handle })
        } else {
            Ok(Self::disabled())
        }
    }

    pub fn disabled() -> Self {
        Self { handle: None }
    }

    pub fn is_installed(&self) -> bool {
        self.handle.is_some()
    }

    /// Prometheus text exposition of every recorded metric.
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }

    pub fn record<T>(&self, component: &str, outcome: &Outcome<T>) {
        if self.is_installed() {
            metrics::increment_counter!(
                OUTCOMES_TOTAL,
                "component" => component.to_string(),
                "outcome" => outcome.label()
            );
        }
    }
}
