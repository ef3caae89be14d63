//! Terraform-style provider for the todo service.
//!
//! # Overview
//! [`TodoProvider`] resolves connection settings from the provider block and
//! the environment, verifies the server answers, and hands a
//! [`todo_core::TodoApi`] to the `todo_todo` resource and data source.
//! The [`framework`] module supplies the lifecycle traits, plan/apply
//! dispatch and the stdio protocol the host talks.

pub mod config;
pub mod data_source;
pub mod framework;
pub mod model;
pub mod provider;
pub mod resource;

pub use config::{ConnectionConfig, TodoProviderModel};
pub use data_source::TodoDataSource;
pub use model::TodoModel;
pub use provider::TodoProvider;
pub use resource::TodoResource;

/// Default registry address announced in the handshake.
pub const DEFAULT_ADDRESS: &str = "registry.terraform.io/hashicorp/todo";
