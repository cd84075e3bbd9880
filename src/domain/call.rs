use reqwest::{header::HeaderMap, Method};
use serde_json::Value;
use std::{fmt, panic::Location};
use url::Url;

/// The executor operations, one per verb shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    PostWithBody,
    PutWithBody,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post | Verb::PostWithBody => Method::POST,
            Verb::Put | Verb::PutWithBody => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::PostWithBody => "post_with_body",
            Verb::PutWithBody => "put_with_body",
        }
    }

    /// Parameter names and types, in declaration order.
    pub fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Verb::Get | Verb::Post | Verb::Put | Verb::Delete => &[
                ("operation", "&str"),
                ("url", "&str"),
                ("cancel", "Option<&CancellationToken>"),
            ],
            Verb::PostWithBody | Verb::PutWithBody => &[
                ("operation", "&str"),
                ("url", "&str"),
                ("body", "&B"),
                ("cancel", "Option<&CancellationToken>"),
            ],
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method())
    }
}

/// Identifies a single executor invocation: who called, what, and from where.
#[derive(Debug, Clone)]
pub struct CallSite {
    component: String,
    operation: String,
    verb: Verb,
    address: String,
    location: &'static Location<'static>,
}

impl CallSite {
    pub fn new(
        component: &str,
        operation: &str,
        verb: Verb,
        address: &str,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            verb,
            address: address.to_string(),
            location,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Reconstructs the signature of the executor method that was called.
    pub fn signature(&self) -> String {
        let parameters = self
            .verb
            .parameters()
            .iter()
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}::{}({})", self.component, self.verb.name(), parameters)
    }
}

/// Everything the transport needs for one request. Built fresh per call.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Value>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Option<Value>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn into_parts(self) -> (Method, Url, HeaderMap, Option<Value>) {
        (self.method, self.url, self.headers, self.body)
    }
}
