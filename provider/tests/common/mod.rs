#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;

use serde_json::json;
use terraform_provider_todo::framework::{ProviderServer, State};
use terraform_provider_todo::TodoProvider;

pub const TODO: &str = "todo_todo";

/// Runs the mock server on a random port in a background thread.
pub fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// A provider whose environment holds exactly `vars`.
pub fn provider_with_env(vars: &[(&str, &str)]) -> TodoProvider {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    TodoProvider::with_env(move |name| vars.get(name).cloned())
}

/// Provider block pointing at `addr`.
pub fn provider_config(addr: SocketAddr) -> State {
    State::from_json(json!({
        "host": addr.ip().to_string(),
        "port": addr.port().to_string(),
        "schema": "http",
        "apipath": "/",
    }))
}

/// A server already configured against a fresh mock server.
pub fn configured_server() -> (ProviderServer<TodoProvider>, SocketAddr) {
    let addr = start_mock_server();
    let mut server = ProviderServer::new(provider_with_env(&[]));
    let diags = server.configure(provider_config(addr));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    (server, addr)
}

pub fn todo_config(description: &str, completed: bool) -> State {
    State::from_json(json!({"description": description, "completed": completed}))
}
