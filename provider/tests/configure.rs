//! Provider configuration against a live mock server.

mod common;

use common::{provider_config, provider_with_env, start_mock_server};
use serde_json::json;
use terraform_provider_todo::framework::{ProviderServer, Severity, State};

#[test]
fn explicit_configuration_connects_without_warnings() {
    let addr = start_mock_server();
    let mut server = ProviderServer::new(provider_with_env(&[]));
    let diags = server.configure(provider_config(addr));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert!(server.is_configured());
}

#[test]
fn environment_fills_missing_settings() {
    let addr = start_mock_server();
    let port = addr.port().to_string();
    let mut server = ProviderServer::new(provider_with_env(&[
        ("TODO_HOST", "127.0.0.1"),
        ("TODO_PORT", port.as_str()),
    ]));

    let diags = server.configure(State::empty());
    assert!(server.is_configured());
    assert!(!diags.has_error());

    let warned: Vec<_> = diags
        .iter()
        .inspect(|d| assert_eq!(d.severity, Severity::Warning))
        .map(|d| d.attribute.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(warned, vec!["schema", "apipath"]);
}

#[test]
fn explicit_value_beats_environment() {
    let addr = start_mock_server();
    let mut server = ProviderServer::new(provider_with_env(&[
        ("TODO_HOST", "203.0.113.1"),
        ("TODO_PORT", "1"),
    ]));
    let diags = server.configure(provider_config(addr));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn unknown_value_fails_before_connecting() {
    let mut server = ProviderServer::new(provider_with_env(&[]));
    let diags = server.configure(State::from_json(json!({
        "host": "127.0.0.1",
        "port": {"unknown": true},
    })));

    let errors: Vec<_> = diags.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].summary, "Unknown Todo API Port");
    assert!(errors[0].detail.contains("TODO_PORT"));
    assert_eq!(diags.warnings().count(), 0);
    assert!(!server.is_configured());
}

#[test]
fn unreachable_server_is_fatal() {
    // Bind then drop to find a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut server = ProviderServer::new(provider_with_env(&[]));
    let diags = server.configure(State::from_json(json!({
        "host": "127.0.0.1",
        "port": port.to_string(),
        "schema": "http",
        "apipath": "/",
    })));

    let error = diags.errors().next().unwrap();
    assert_eq!(error.summary, "Unable to Create Todo API Client");
    assert!(error.detail.contains("Todo Client Error:"));
    assert!(!server.is_configured());
}

#[test]
fn unsupported_argument_is_rejected() {
    let mut server = ProviderServer::new(provider_with_env(&[]));
    let diags = server.configure(State::from_json(json!({"token": "x"})));
    assert_eq!(diags.errors().next().unwrap().summary, "Unsupported argument");
}

#[test]
fn resources_need_a_configured_provider() {
    let server = ProviderServer::new(provider_with_env(&[]));
    let resp = server.read_resource("todo_todo", State::from_json(json!({"id": 1})));
    assert_eq!(resp.diagnostics.errors().next().unwrap().summary, "Provider Not Configured");
}
