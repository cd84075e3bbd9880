use super::{Authenticator, HttpLogger, Metrics, Transport, TransportResponse, TracingLogger};
use crate::domain::{CallSite, Fault, FaultKind, FaultReport, OutboundRequest, Outcome, Verb};
use futures::Future;
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Executes outbound calls and classifies each one into an [`Outcome`].
///
/// Every call runs the same protocol: log the request, ask the authenticator
/// for this request's headers, send it through the transport, then classify
/// the response. Faults raised anywhere along the way are logged with their
/// full diagnostics and returned as [`Outcome::Exception`]; nothing is
/// propagated to the caller as an error.
///
/// The executor holds no mutable state and may be shared across tasks.
#[derive(Debug, Clone)]
pub struct Executor<T, A, L = TracingLogger> {
    component: String,
    base_url: Option<Url>,
    transport: T,
    authenticator: A,
    logger: L,
    metrics: Metrics,
}

impl<T, A, L> Executor<T, A, L>
where
    T: Transport,
    A: Authenticator,
    L: HttpLogger,
{
    pub fn new(component: impl Into<String>, transport: T, authenticator: A, logger: L) -> Self {
        Self {
            component: component.into(),
            base_url: None,
            transport,
            authenticator,
            logger,
            metrics: Metrics::disabled(),
        }
    }

    /// Relative addresses are resolved against this URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[track_caller]
    pub fn get<'a>(
        &'a self,
        operation: &str,
        url: &str,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a {
        let call = self.call_site(Verb::Get, operation, url, Location::caller());
        self.execute(call, None, cancel)
    }

    #[track_caller]
    pub fn post<'a>(
        &'a self,
        operation: &str,
        url: &str,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a {
        let call = self.call_site(Verb::Post, operation, url, Location::caller());
        self.execute(call, None, cancel)
    }

    #[track_caller]
    pub fn put<'a>(
        &'a self,
        operation: &str,
        url: &str,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a {
        let call = self.call_site(Verb::Put, operation, url, Location::caller());
        self.execute(call, None, cancel)
    }

    #[track_caller]
    pub fn delete<'a>(
        &'a self,
        operation: &str,
        url: &str,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a {
        let call = self.call_site(Verb::Delete, operation, url, Location::caller());
        self.execute(call, None, cancel)
    }

    #[track_caller]
    pub fn post_with_body<'a, B>(
        &'a self,
        operation: &str,
        url: &str,
        body: &'a B,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a
    where
        B: Serialize + ?Sized,
    {
        let call = self.call_site(Verb::PostWithBody, operation, url, Location::caller());
        self.execute(call, Some(encode(body)), cancel)
    }

    #[track_caller]
    pub fn put_with_body<'a, B>(
        &'a self,
        operation: &str,
        url: &str,
        body: &'a B,
        cancel: Option<&'a CancellationToken>,
    ) -> impl Future<Output = Outcome<T::Response>> + 'a
    where
        B: Serialize + ?Sized,
    {
        let call = self.call_site(Verb::PutWithBody, operation, url, Location::caller());
        self.execute(call, Some(encode(body)), cancel)
    }

    fn call_site(
        &self,
        verb: Verb,
        operation: &str,
        address: &str,
        location: &'static Location<'static>,
    ) -> CallSite {
        CallSite::new(&self.component, operation, verb, address, location)
    }

    async fn execute(
        &self,
        call: CallSite,
        body: Option<Result<Value, Fault>>,
        cancel: Option<&CancellationToken>,
    ) -> Outcome<T::Response> {
        self.logger.information_http_request(&call);

        let outcome = match self.dispatch(&call, body, cancel).await {
            Ok(outcome) => outcome,
            Err(fault) => {
                let report = FaultReport::capture(&fault, &call);
                self.logger.fatal_http_exception(&call, &report);
                Outcome::from_fault(fault)
            }
        };

        self.metrics.record(&self.component, &outcome);
        outcome
    }

    async fn dispatch(
        &self,
        call: &CallSite,
        body: Option<Result<Value, Fault>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Outcome<T::Response>, Fault> {
        let headers = self.authenticator.authenticate().await?;
        let url = self.resolve(call.address())?;
        let body = body.transpose()?;
        let request = OutboundRequest::new(call.verb().method(), url, headers, body);

        let response = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Fault::cancelled()),
                response = self.transport.send(request) => response?,
            },
            None => self.transport.send(request).await?,
        };

        let status = response.status();
        if response.is_success() {
            self.logger.information(
                call,
                &format!(
                    "HTTP request to {} succeeded with status code {}",
                    call.address(),
                    status.as_u16()
                ),
            );
            return Ok(Outcome::success_with(response, status, vec![]));
        }

        let reason = response.reason_phrase().unwrap_or_default().to_string();
        let content = response.text().await?;

        self.logger.warning(
            call,
            &format!(
                "HTTP request to {} failed with status code {}",
                call.address(),
                status.as_u16()
            ),
        );

        Ok(Outcome::error(
            vec![
                format!("StatusCode: {}", status.as_u16()),
                format!("Content: {}", content),
                format!("ReasonPhrase: {}", reason),
            ],
            status,
        ))
    }

    fn resolve(&self, address: &str) -> Result<Url, Fault> {
        match (Url::parse(address), &self.base_url) {
            (Ok(url), _) => Ok(url),
            (Err(url::ParseError::RelativeUrlWithoutBase), Some(base)) => base
                .join(address)
                .map_err(|e| Fault::new(FaultKind::Address, e)),
            (Err(e), _) => Err(Fault::new(FaultKind::Address, e)),
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, Fault> {
    serde_json::to_value(body).map_err(|e| Fault::new(FaultKind::Serialization, e))
}
