//! Wire DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single todo item as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub description: String,
    pub completed: bool,
}

/// Request payload for inserting or modifying a todo. The identifier is
/// never sent; the server assigns it on insert and takes it from the path on
/// update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub description: String,
    pub completed: bool,
}

impl NewItem {
    pub fn new(description: impl Into<String>, completed: bool) -> Self {
        Self {
            description: description.into(),
            completed,
        }
    }
}

/// Query parameters for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindTodosParams {
    /// Only return items with an id strictly greater than this.
    pub since: Option<i64>,
    /// Maximum number of items to return.
    pub limit: Option<i32>,
}

impl FindTodosParams {
    pub fn with_limit(limit: i32) -> Self {
        Self {
            since: None,
            limit: Some(limit),
        }
    }
}

/// Error payload the server sends with non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}
