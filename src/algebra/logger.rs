use crate::domain::{CallSite, FaultReport};
use std::sync::Arc;

/// Sink for the events the executor emits on every call.
pub trait HttpLogger: Send + Sync {
    fn information_http_request(&self, call: &CallSite);

    fn information(&self, call: &CallSite, message: &str);

    fn warning(&self, call: &CallSite, message: &str);

    fn fatal_http_exception(&self, call: &CallSite, report: &FaultReport);
}

/// Emits every event through `tracing`. Faults are logged at `ERROR` with `severity = "fatal"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl HttpLogger for TracingLogger {
    fn information_http_request(&self, call: &CallSite) {
        tracing::info!(
            component = call.component(),
            operation = call.operation(),
            verb = %call.verb(),
            address = call.address(),
            "HTTP request initiated"
        );
    }

    fn information(&self, call: &CallSite, message: &str) {
        tracing::info!(
            component = call.component(),
            operation = call.operation(),
            verb = %call.verb(),
            address = call.address(),
            "{}",
            message
        );
    }

    fn warning(&self, call: &CallSite, message: &str) {
        tracing::warn!(
            component = call.component(),
            operation = call.operation(),
            verb = %call.verb(),
            address = call.address(),
            "{}",
            message
        );
    }

    fn fatal_http_exception(&self, call: &CallSite, report: &FaultReport) {
        tracing::error!(
            severity = "fatal",
            component = call.component(),
            operation = call.operation(),
            verb = %call.verb(),
            address = call.address(),
            diagnostics = %report,
            "HTTP request raised an exception: {}",
            report.message()
        );
    }
}

impl<L: HttpLogger + ?Sized> HttpLogger for Arc<L> {
    fn information_http_request(&self, call: &CallSite) {
        (**self).information_http_request(call)
    }

    fn information(&self, call: &CallSite, message: &str) {
        (**self).information(call, message)
    }

    fn warning(&self, call: &CallSite, message: &str) {
        (**self).warning(call, message)
    }

    fn fatal_http_exception(&self, call: &CallSite, report: &FaultReport) {
        (**self).fatal_http_exception(call, report)
    }
}
