use super::CallSite;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::{
    any::type_name,
    backtrace::BacktraceStatus,
    error::Error as StdError,
    fmt::{self, Debug, Display},
    panic::Location,
};

const MESSAGE_TYPE_NAME: &str = "anyhow::Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FaultKind {
    /// The authenticator could not prepare credentials
    Authentication,
    /// The target address could not be resolved into a URL
    Address,
    /// The request body could not be serialized
    Serialization,
    /// The transport failed to deliver the request or receive a response
    Transport,
    /// The response body could not be read or decoded
    Body,
    /// The caller cancelled the call while it was in flight
    Cancelled,
    /// Synthesized from a non-success protocol status
    Protocol,
}

/// A runtime failure raised while executing an outbound call.
///
/// The original error is kept as-is; the runtime type name and the location
/// where the fault was raised are captured alongside it.
#[derive(Debug)]
pub struct Fault {
    kind: FaultKind,
    type_name: &'static str,
    location: &'static Location<'static>,
    error: anyhow::Error,
}

impl Fault {
    #[track_caller]
    pub fn new<E>(kind: FaultKind, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind,
            type_name: type_name::<E>(),
            location: Location::caller(),
            error: anyhow::Error::new(error),
        }
    }

    /// Wraps an already type-erased error.
    ///
    /// The concrete runtime type is lost once an error is an `anyhow::Error`, so the
    /// recorded type name is always `anyhow::Error`. Use [`Fault::new`] when the
    /// concrete error is at hand.
    #[track_caller]
    pub fn from_anyhow(kind: FaultKind, error: anyhow::Error) -> Self {
        Self {
            kind,
            type_name: MESSAGE_TYPE_NAME,
            location: Location::caller(),
            error,
        }
    }

    #[track_caller]
    pub fn msg<M>(kind: FaultKind, message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::from_anyhow(kind, anyhow::Error::msg(message))
    }

    #[track_caller]
    pub fn cancelled() -> Self {
        Self::msg(FaultKind::Cancelled, "The operation was cancelled")
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.error
    }

    /// Messages of every nested cause, outermost first, excluding the fault itself.
    pub fn causes(&self) -> Vec<String> {
        self.error
            .chain()
            .skip(1)
            .map(|cause| cause.to_string())
            .collect()
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error.source()
    }
}

impl Serialize for Fault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Fault", 3)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("typeName", self.type_name)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    location: String,
    signature: String,
}

impl Frame {
    pub fn new(location: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            signature: signature.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.location, self.signature)
    }
}

/// Structured diagnostic record of a fault, captured at the executor boundary.
///
/// Capture and rendering are separate: loggers may read the fields directly
/// or use the `Display` rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    origin: String,
    signature: String,
    type_name: &'static str,
    message: String,
    causes: Vec<String>,
    frames: Vec<Frame>,
}

impl FaultReport {
    pub fn capture(fault: &Fault, call: &CallSite) -> Self {
        let origin = fault.location().to_string();
        let signature = call.signature();

        let mut frames = vec![
            Frame::new(origin.clone(), signature.clone()),
            Frame::new(call.location().to_string(), signature.clone()),
        ];

        let backtrace = fault.error().backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            frames.extend(backtrace_frames(&backtrace.to_string()));
        }

        Self {
            origin,
            signature,
            type_name: fault.type_name(),
            message: fault.message(),
            causes: fault.causes(),
            frames,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Location: {}", self.origin)?;
        writeln!(f, "Method: {}", self.signature)?;
        writeln!(f, "Type: {}", self.type_name)?;
        writeln!(f, "Message: {}", self.message)?;

        if !self.causes.is_empty() {
            writeln!(f, "Inner exceptions:")?;
            for (level, cause) in self.causes.iter().enumerate() {
                writeln!(f, "level {}: {}", level + 1, cause)?;
            }
        }

        write!(f, "Stack trace:")?;
        for frame in &self.frames {
            write!(f, "\n{frame}")?;
        }

        Ok(())
    }
}

/// Parses the std backtrace rendering, keeping only frames that carry an `at file:line` location.
///
/// Inlined symbols are printed without an index under their parent frame and
/// keep their own `at` line.
fn backtrace_frames(rendered: &str) -> Vec<Frame> {
    let mut frames = vec![];
    let mut symbol: Option<&str> = None;

    for line in rendered.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(symbol) = symbol.take() {
                frames.push(Frame::new(location, symbol));
            }
            continue;
        }

        symbol = match line.split_once(": ") {
            Some((index, name)) if index.chars().all(|c| c.is_ascii_digit()) => Some(name),
            _ => Some(line),
        };
    }

    frames
}
