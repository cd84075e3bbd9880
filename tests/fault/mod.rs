use outbound_call::prelude::{CallSite, Fault, FaultKind, FaultReport, Verb};
use std::{fmt, io, panic::Location};

#[derive(Debug)]
struct TokenError {
    source: io::Error,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token request failed")
    }
}

impl std::error::Error for TokenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn call_site(verb: Verb) -> CallSite {
    CallSite::new(
        "BillingClient",
        "sync_invoices",
        verb,
        "https://billing.example.com/invoices",
        Location::caller(),
    )
}

#[test]
fn report_captures_type_message_and_causes() {
    let fault = Fault::new(
        FaultKind::Authentication,
        TokenError {
            source: io::Error::new(io::ErrorKind::TimedOut, "socket timed out"),
        },
    );
    let report = FaultReport::capture(&fault, &call_site(Verb::Get));

    assert!(report.type_name().ends_with("TokenError"));
    assert_eq!("token request failed", report.message());
    assert_eq!(&["socket timed out".to_string()], report.causes());
    assert_eq!(fault.location().to_string(), report.origin());
}

#[test]
fn report_reconstructs_the_calling_signature() {
    let fault = Fault::msg(FaultKind::Transport, "connection refused");

    let report = FaultReport::capture(&fault, &call_site(Verb::PutWithBody));

    assert_eq!(
        "BillingClient::put_with_body(operation: &str, url: &str, body: &B, cancel: Option<&CancellationToken>)",
        report.signature()
    );
}

#[test]
fn report_frames_include_fault_origin_and_call_site() {
    let fault = Fault::msg(FaultKind::Transport, "connection refused");
    let call = call_site(Verb::Delete);

    let report = FaultReport::capture(&fault, &call);

    let frames = report.frames();
    assert_eq!(fault.location().to_string(), frames[0].location());
    assert_eq!(call.signature(), frames[0].signature());
    assert_eq!(call.location().to_string(), frames[1].location());
    assert_eq!(call.signature(), frames[1].signature());

    let rendered = report.to_string();
    let stack = rendered
        .split_once("Stack trace:\n")
        .map(|(_, stack)| stack)
        .expect("Failed to find stack trace");
    assert_eq!(frames.len(), stack.lines().count());
    assert!(stack.lines().all(|line| line.contains(" | ")));
    assert!(stack.starts_with(&format!(
        "{} | BillingClient::delete(operation: &str, url: &str, cancel: Option<&CancellationToken>)",
        fault.location()
    )));
}

#[test]
fn rendered_report_lists_causes_by_level() {
    let error = anyhow::anyhow!("dns lookup failed")
        .context("connect failed")
        .context("request failed");
    let fault = Fault::from_anyhow(FaultKind::Transport, error);

    let rendered = FaultReport::capture(&fault, &call_site(Verb::Post)).to_string();

    assert!(rendered.contains("Type: anyhow::Error"));
    assert!(rendered.contains("Message: request failed"));
    assert!(rendered.contains("Inner exceptions:\nlevel 1: connect failed\nlevel 2: dns lookup failed"));
    assert!(rendered.contains(
        "| BillingClient::post(operation: &str, url: &str, cancel: Option<&CancellationToken>)"
    ));
}

#[test]
fn fault_without_causes_omits_inner_exceptions() {
    let fault = Fault::cancelled();

    let rendered = FaultReport::capture(&fault, &call_site(Verb::Get)).to_string();

    assert!(!rendered.contains("Inner exceptions:"));
    assert!(rendered.contains("Stack trace:\n"));
}

#[test]
fn verbs_map_to_http_methods() {
    assert_eq!(reqwest::Method::GET, Verb::Get.method());
    assert_eq!(reqwest::Method::POST, Verb::PostWithBody.method());
    assert_eq!(reqwest::Method::PUT, Verb::Put.method());
    assert_eq!(reqwest::Method::DELETE, Verb::Delete.method());
    assert_eq!("PUT", Verb::PutWithBody.to_string());
}
