//! Line-delimited JSON host protocol.
//!
//! On start the plugin prints a handshake line,
//! `TODO_PROVIDER|<protocol_version>|<address>`, then reads one JSON request
//! per line from the host and answers each with one JSON line. Requests are
//! tagged by `method`:
//!
//! ```text
//! {"method":"configure_provider","config":{"host":"127.0.0.1"}}
//! {"method":"apply_resource_change","type_name":"todo_todo","prior_state":null,"planned_state":{...}}
//! ```
//!
//! Logs never go to stdout; it belongs to the host.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::diag::Diagnostic;
use super::provider::Provider;
use super::server::{ProviderSchema, ProviderServer, Response};
use super::state::State;

pub const HANDSHAKE_PREFIX: &str = "TODO_PROVIDER";
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("host connection failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    GetProviderSchema,
    ConfigureProvider {
        config: State,
    },
    PlanResourceChange {
        type_name: String,
        #[serde(default)]
        prior_state: Option<State>,
        #[serde(default)]
        config: Option<State>,
    },
    ApplyResourceChange {
        type_name: String,
        #[serde(default)]
        prior_state: Option<State>,
        #[serde(default)]
        planned_state: Option<State>,
    },
    ReadResource {
        type_name: String,
        state: State,
    },
    ImportResourceState {
        type_name: String,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        config: State,
    },
    StopProvider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Schema(ProviderSchema),
    Operation(Response),
}

pub fn handshake(address: &str) -> String {
    format!("{HANDSHAKE_PREFIX}|{PROTOCOL_VERSION}|{address}")
}

/// Runs one request against the server. `StopProvider` is answered with an
/// empty reply; ending the session is up to the caller.
pub fn handle<P: Provider>(server: &mut ProviderServer<P>, request: Request) -> Reply {
    match request {
        Request::GetProviderSchema => Reply::Schema(server.schema()),
        Request::ConfigureProvider { config } => Reply::Operation(Response {
            state: None,
            diagnostics: server.configure(config),
        }),
        Request::PlanResourceChange {
            type_name,
            prior_state,
            config,
        } => Reply::Operation(server.plan_resource_change(
            &type_name,
            prior_state.as_ref(),
            config.as_ref(),
        )),
        Request::ApplyResourceChange {
            type_name,
            prior_state,
            planned_state,
        } => Reply::Operation(server.apply_resource_change(&type_name, prior_state, planned_state)),
        Request::ReadResource { type_name, state } => {
            Reply::Operation(server.read_resource(&type_name, state))
        }
        Request::ImportResourceState { type_name, id } => {
            Reply::Operation(server.import_resource_state(&type_name, &id))
        }
        Request::ReadDataSource { type_name, config } => {
            Reply::Operation(server.read_data_source(&type_name, config))
        }
        Request::StopProvider => Reply::Operation(Response::default()),
    }
}

/// Serves requests from `input` until it closes or the host sends
/// `stop_provider`. Malformed lines get an error reply and do not end the
/// session.
pub fn serve<P, R, W>(
    server: &mut ProviderServer<P>,
    address: &str,
    input: R,
    mut output: W,
) -> Result<(), ProtocolError>
where
    P: Provider,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", handshake(address))?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (reply, stop) = match serde_json::from_str::<Request>(&line) {
            Ok(Request::StopProvider) => (handle(server, Request::StopProvider), true),
            Ok(request) => (handle(server, request), false),
            Err(e) => {
                warn!(error = %e, "rejecting malformed request");
                let reply = Reply::Operation(Response {
                    state: None,
                    diagnostics: Diagnostic::error(
                        "Invalid Request",
                        format!("The provider could not decode the request: {e}"),
                    )
                    .into(),
                });
                (reply, false)
            }
        };

        serde_json::to_writer(&mut output, &reply)?;
        output.write_all(b"\n")?;
        output.flush()?;

        if stop {
            debug!("host requested stop");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::json;

    use super::super::provider::{ConfigureRequest, ConfigureResponse, DataSourceFactory, ResourceFactory};
    use super::super::schema::{Attribute, Schema};
    use super::*;

    struct NoopProvider;

    impl Provider for NoopProvider {
        type Data = ();

        fn metadata(&self) -> String {
            "noop".to_string()
        }

        fn schema(&self) -> Schema {
            Schema::new("Noop.").attribute("region", Attribute::string().optional())
        }

        fn configure(&self, _req: &ConfigureRequest, resp: &mut ConfigureResponse<()>) {
            resp.data = Some(());
        }

        fn resources(&self) -> Vec<ResourceFactory<()>> {
            Vec::new()
        }

        fn data_sources(&self) -> Vec<DataSourceFactory<()>> {
            Vec::new()
        }
    }

    fn run(input: &str) -> Vec<serde_json::Value> {
        let mut server = ProviderServer::new(NoopProvider);
        let mut output = Vec::new();
        serve(&mut server, "local/noop", Cursor::new(input), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("TODO_PROVIDER|1|local/noop"));
        lines.map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    #[test]
    fn decodes_tagged_requests() {
        let request: Request = serde_json::from_value(json!({
            "method": "apply_resource_change",
            "type_name": "todo_todo",
            "prior_state": null,
            "planned_state": {"description": "Go Shopping"}
        }))
        .unwrap();
        match request {
            Request::ApplyResourceChange {
                type_name,
                prior_state,
                planned_state,
            } => {
                assert_eq!(type_name, "todo_todo");
                assert!(prior_state.is_none());
                assert!(planned_state.is_some());
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn answers_each_line_and_stops() {
        let replies = run(concat!(
            "{\"method\":\"get_provider_schema\"}\n",
            "\n",
            "{\"method\":\"configure_provider\",\"config\":{\"region\":\"x\"}}\n",
            "{\"method\":\"stop_provider\"}\n",
            "{\"method\":\"get_provider_schema\"}\n",
        ));
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["provider"]["description"], "Noop.");
        assert_eq!(replies[1]["diagnostics"], json!([]));
        assert!(replies[2]["state"].is_null());
    }

    #[test]
    fn malformed_line_gets_error_reply() {
        let replies = run("{\"method\":\"fly\"}\n{\"method\":\"get_provider_schema\"}\n");
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["diagnostics"][0]["summary"], "Invalid Request");
        assert_eq!(replies[1]["provider"]["description"], "Noop.");
    }
}
