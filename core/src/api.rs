//! Blocking facade over `TodoClient` and a `Transport`.

use tracing::debug;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{FindTodosParams, Item, NewItem};

/// One method per remote operation, each a build → execute → parse chain.
///
/// Holds no mutable state, so a single handle can be cloned into every
/// consumer and used concurrently.
#[derive(Debug, Clone)]
pub struct TodoApi<T = UreqTransport> {
    client: TodoClient,
    transport: T,
}

impl TodoApi<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> TodoApi<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: TodoClient::new(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn find_todos(&self, params: &FindTodosParams) -> Result<Vec<Item>, ApiError> {
        debug!(since = ?params.since, limit = ?params.limit, "listing todos");
        let response = self.transport.execute(self.client.build_find_todos(params))?;
        self.client.parse_find_todos(response)
    }

    pub fn find_todo(&self, id: i64) -> Result<Item, ApiError> {
        debug!(id, "finding todo");
        let response = self.transport.execute(self.client.build_find_todo(id))?;
        self.client.parse_find_todo(response)
    }

    pub fn add_one(&self, input: &NewItem) -> Result<Item, ApiError> {
        debug!(description = %input.description, completed = input.completed, "adding todo");
        let response = self.transport.execute(self.client.build_add_one(input)?)?;
        self.client.parse_add_one(response)
    }

    pub fn update_one(&self, id: i64, input: &NewItem) -> Result<(), ApiError> {
        debug!(id, description = %input.description, completed = input.completed, "updating todo");
        let response = self.transport.execute(self.client.build_update_one(id, input)?)?;
        self.client.parse_update_one(response)
    }

    pub fn destroy_one(&self, id: i64) -> Result<(), ApiError> {
        debug!(id, "destroying todo");
        let response = self.transport.execute(self.client.build_destroy_one(id))?;
        self.client.parse_destroy_one(response)
    }
}
