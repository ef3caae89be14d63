use std::fmt;

use todo_core::{FindTodosParams, TodoApi};
use tracing::{info, info_span};

use crate::config::{ConnectionConfig, TodoProviderModel};
use crate::data_source::TodoDataSource;
use crate::framework::{
    Attribute, ConfigureRequest, ConfigureResponse, DataSourceFactory, Provider, ResourceFactory,
    Schema,
};
use crate::resource::TodoResource;

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The `todo` provider. Configuration yields a [`TodoApi`] that has already
/// answered one request.
pub struct TodoProvider {
    env: EnvLookup,
}

impl TodoProvider {
    /// Reads fallbacks from the process environment.
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    pub fn with_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self { env: Box::new(env) }
    }
}

impl Default for TodoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TodoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoProvider").finish_non_exhaustive()
    }
}

impl Provider for TodoProvider {
    type Data = TodoApi;

    fn metadata(&self) -> String {
        "todo".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Interface with the Todo API server (github.com/spkane/todo-for-terraform)")
            .attribute(
                "host",
                Attribute::string()
                    .description("The FQDN or IP address for the Todo server (e.g. 127.0.0.1). May also be provided via TODO_HOST environment variable.")
                    .optional(),
            )
            .attribute(
                "port",
                Attribute::string()
                    .description("The port for the Todo server (e.g. 8080). May also be provided via TODO_PORT environment variable.")
                    .optional(),
            )
            .attribute(
                "schema",
                Attribute::string()
                    .description("The URL schema for the Todo server (e.g. http). May also be provided via TODO_SCHEMA environment variable.")
                    .optional(),
            )
            .attribute(
                "apipath",
                Attribute::string()
                    .description("The URL path for the Todo server API (e.g. /). May also be provided via TODO_APIPATH environment variable.")
                    .optional(),
            )
    }

    fn configure(&self, req: &ConfigureRequest, resp: &mut ConfigureResponse<TodoApi>) {
        info!("Configuring Todo client");
        let Some(model) = resp.diagnostics.take(req.config.get::<TodoProviderModel>()) else {
            return;
        };
        let Some(conn) = ConnectionConfig::resolve(&model, &self.env, &mut resp.diagnostics) else {
            return;
        };

        let _span = info_span!(
            "todo_client",
            todo_host = %conn.host,
            todo_port = %conn.port,
            todo_schema = %conn.schema,
            todo_apipath = %conn.apipath,
        )
        .entered();

        let api = TodoApi::new(&conn.base_url());
        if let Err(e) = api.find_todos(&FindTodosParams::with_limit(1)) {
            resp.diagnostics.add_error(
                "Unable to Create Todo API Client",
                format!(
                    "An unexpected error occurred when creating the Todo API client. \
                     If the error is not clear, please contact the provider developers.\n\n\
                     Todo Client Error: {e}"
                ),
            );
            return;
        }

        resp.data = Some(api);
        info!(success = true, "Configured Todo client");
    }

    fn resources(&self) -> Vec<ResourceFactory<TodoApi>> {
        let todo: ResourceFactory<TodoApi> = TodoResource::boxed;
        vec![todo]
    }

    fn data_sources(&self) -> Vec<DataSourceFactory<TodoApi>> {
        let todo: DataSourceFactory<TodoApi> = TodoDataSource::boxed;
        vec![todo]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::framework::{ProviderServer, State};

    #[test]
    fn registers_todo_types() {
        let server = ProviderServer::new(TodoProvider::with_env(|_| None));
        let schema = server.schema();
        assert_eq!(server.type_name(), "todo");
        assert!(schema.resources.contains_key("todo_todo"));
        assert!(schema.data_sources.contains_key("todo_todo"));
        assert_eq!(schema.provider.attributes.len(), 4);
        assert!(schema.provider.attributes["host"].description.contains("TODO_HOST"));
    }

    #[test]
    fn unknown_host_fails_without_connecting() {
        let mut server = ProviderServer::new(TodoProvider::with_env(|_| None));
        let diags = server.configure(State::from_json(json!({"host": {"unknown": true}})));
        assert_eq!(diags.errors().next().unwrap().summary, "Unknown Todo API Host");
        assert!(!server.is_configured());
    }
}
