use super::{Fault, FaultKind};
use reqwest::StatusCode;
use serde::{Serialize, Serializer};
use std::sync::Arc;

pub const OK_MESSAGE: &str = "Ok";
pub const MESSAGE_SEPARATOR: &str = "\r\n";

/// The classified result of an operation.
///
/// `Success` and `NoContent` never carry a fault, `Error` and `Exception`
/// never carry a value, and every variant holds at least one message unless
/// a caller built an `Error` from an empty list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub enum Outcome<T> {
    Success {
        #[serde(serialize_with = "status_code")]
        status: StatusCode,
        messages: Vec<String>,
        value: T,
    },
    NoContent {
        messages: Vec<String>,
    },
    Error {
        #[serde(serialize_with = "status_code")]
        status: StatusCode,
        messages: Vec<String>,
        exception: Arc<Fault>,
    },
    Exception {
        messages: Vec<String>,
        exception: Arc<Fault>,
    },
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::success_with(value, StatusCode::OK, vec![])
    }

    pub fn success_with(value: T, status: StatusCode, messages: Vec<String>) -> Self {
        Self::Success {
            status,
            messages: or_ok(messages),
            value,
        }
    }

    pub fn no_content() -> Self {
        Self::no_content_with(vec![])
    }

    pub fn no_content_with(messages: Vec<String>) -> Self {
        Self::NoContent {
            messages: or_ok(messages),
        }
    }

    /// Builds a protocol-level failure. The fault is synthesized from the joined messages.
    #[track_caller]
    pub fn error(messages: Vec<String>, status: StatusCode) -> Self {
        let exception = Fault::msg(FaultKind::Protocol, messages.join(MESSAGE_SEPARATOR));
        Self::Error {
            status,
            messages,
            exception: Arc::new(exception),
        }
    }

    pub fn from_fault(fault: Fault) -> Self {
        Self::Exception {
            messages: vec![fault.message()],
            exception: Arc::new(fault),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Error { status, .. } => *status,
            Self::NoContent { .. } => StatusCode::NO_CONTENT,
            Self::Exception { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            Self::Success { messages, .. }
            | Self::NoContent { messages }
            | Self::Error { messages, .. }
            | Self::Exception { messages, .. } => messages,
        }
    }

    pub fn joined_messages(&self) -> String {
        self.messages().join(MESSAGE_SEPARATOR)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::NoContent { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Exception { exception, .. } if exception.kind() == FaultKind::Cancelled)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn exception(&self) -> Option<&Arc<Fault>> {
        match self {
            Self::Error { exception, .. } | Self::Exception { exception, .. } => Some(exception),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success {
                status,
                messages,
                value,
            } => Outcome::Success {
                status,
                messages,
                value: f(value),
            },
            Self::NoContent { messages } => Outcome::NoContent { messages },
            Self::Error {
                status,
                messages,
                exception,
            } => Outcome::Error {
                status,
                messages,
                exception,
            },
            Self::Exception {
                messages,
                exception,
            } => Outcome::Exception {
                messages,
                exception,
            },
        }
    }

    /// Short label of the variant, used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NoContent { .. } => "no_content",
            Self::Error { .. } => "error",
            Self::Exception { .. } if self.is_cancelled() => "cancelled",
            Self::Exception { .. } => "exception",
        }
    }
}

fn or_ok(messages: Vec<String>) -> Vec<String> {
    if messages.is_empty() {
        vec![OK_MESSAGE.to_string()]
    } else {
        messages
    }
}

fn status_code<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}
