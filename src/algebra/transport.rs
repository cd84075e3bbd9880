use crate::domain::{Fault, FaultKind, OutboundRequest, Outcome};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;

/// The HTTP client the executor drives. Implementations are expected to be
/// long-lived and safe to share across concurrent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: TransportResponse;

    async fn send(&self, request: OutboundRequest) -> Result<Self::Response, Fault>;
}

#[async_trait]
pub trait TransportResponse: Send + Sized {
    fn status(&self) -> StatusCode;

    fn is_success(&self) -> bool {
        self.status().is_success()
    }

    fn reason_phrase(&self) -> Option<&str> {
        self.status().canonical_reason()
    }

    /// Reads the full body to completion.
    async fn text(self) -> Result<String, Fault>;
}

#[async_trait]
impl Transport for ClientWithMiddleware {
    type Response = Response;

    async fn send(&self, request: OutboundRequest) -> Result<Response, Fault> {
        let (method, url, headers, body) = request.into_parts();
        let builder = self.request(method, url).headers(headers);
        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| Fault::new(FaultKind::Transport, e))
    }
}

#[async_trait]
impl Transport for Client {
    type Response = Response;

    async fn send(&self, request: OutboundRequest) -> Result<Response, Fault> {
        let (method, url, headers, body) = request.into_parts();
        let builder = self.request(method, url).headers(headers);
        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| Fault::new(FaultKind::Transport, e))
    }
}

#[async_trait]
impl TransportResponse for Response {
    fn status(&self) -> StatusCode {
        Response::status(self)
    }

    async fn text(self) -> Result<String, Fault> {
        Response::text(self)
            .await
            .map_err(|e| Fault::new(FaultKind::Body, e))
    }
}

impl<R: TransportResponse> Outcome<R> {
    /// Reads a successful response body as JSON. Other variants pass through unchanged.
    ///
    /// Decoding runs after the executor has returned, so a decode failure is
    /// logged without call context. Only the response status is attached.
    pub async fn deserialize<U: DeserializeOwned>(self) -> Outcome<U> {
        match self {
            Outcome::Success {
                status,
                messages,
                value,
            } => {
                let decoded = match value.text().await {
                    Ok(text) => serde_json::from_str::<U>(&text)
                        .map_err(|e| Fault::new(FaultKind::Body, e)),
                    Err(fault) => Err(fault),
                };

                match decoded {
                    Ok(value) => Outcome::success_with(value, status, messages),
                    Err(fault) => {
                        tracing::warn!(
                            status = status.as_u16(),
                            "Failed to deserialize response: {}",
                            fault
                        );
                        Outcome::from_fault(fault)
                    }
                }
            }
            Outcome::NoContent { messages } => Outcome::NoContent { messages },
            Outcome::Error {
                status,
                messages,
                exception,
            } => Outcome::Error {
                status,
                messages,
                exception,
            },
            Outcome::Exception {
                messages,
                exception,
            } => Outcome::Exception {
                messages,
                exception,
            },
        }
    }
}
