use outbound_call::prelude::{get_subscriber_from, Executor, ExecutorConfig};
use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("Failed to lock buffer")).into_owned()
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("Failed to lock buffer")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Buffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let configuration = ExecutorConfig::from(HashMap::<&str, &str>::new());

    assert_eq!("outbound-call", configuration.component());
    assert_eq!(None, configuration.base_url());
    assert_eq!(30000, configuration.timeout());
    assert_eq!(None, configuration.bearer_token());
    assert_eq!("info", configuration.log_level());
    assert!(!configuration.metrics_enabled());
}

#[test]
fn debug_output_redacts_the_bearer_token() {
    let configuration = ExecutorConfig::from(HashMap::from_iter([("BEARER_TOKEN", "s3cr3t")]));

    let rendered = format!("{:?}", configuration);

    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("[REDACTED]"));
}

#[tokio::test]
async fn executor_is_built_from_configuration() {
    let configuration = ExecutorConfig::from(HashMap::from_iter([
        ("COMPONENT_NAME", "InventoryClient"),
        ("BASE_URL", "http://localhost:9090/api/"),
        ("BEARER_TOKEN", "s3cr3t"),
    ]));

    let executor = Executor::from_env_config(&configuration).expect("Failed to build executor");

    assert_eq!("InventoryClient", executor.component());
    assert_eq!(
        Some("http://localhost:9090/api/"),
        executor.base_url().map(|url| url.as_str())
    );
}

#[tokio::test]
async fn invalid_base_url_is_rejected() {
    let configuration = ExecutorConfig::from(HashMap::from_iter([("BASE_URL", "not a url")]));

    assert!(Executor::from_env_config(&configuration).is_err());
}

#[test]
fn subscriber_filters_by_configured_log_level() {
    let configuration = ExecutorConfig::from(HashMap::from_iter([
        ("COMPONENT_NAME", "LedgerClient"),
        ("LOG_LEVEL", "warn"),
    ]));
    let buffer = Buffer::default();
    let telemetry = get_subscriber_from(&configuration, buffer.clone());

    tracing::subscriber::with_default(telemetry.subscriber, || {
        tracing::info!("below the configured level");
        tracing::warn!("at the configured level");
    });

    let output = buffer.contents();
    assert!(!output.contains("below the configured level"));
    assert!(output.contains("at the configured level"));
    assert!(output.contains(r#""name":"LedgerClient""#));
}
