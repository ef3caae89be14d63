//! The slice of a Terraform-style plugin framework this provider runs on.
//!
//! Providers, resources and data sources implement the traits here; the
//! [`ProviderServer`] owns validation, planning and dispatch, and
//! [`protocol`] connects a server to a host over stdio.

pub mod diag;
pub mod protocol;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod server;
pub mod state;
pub mod value;

pub use diag::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use provider::{ConfigureRequest, ConfigureResponse, DataSourceFactory, Provider, ResourceFactory};
pub use resource::{
    CreateRequest, CreateResponse, DataSource, DeleteRequest, DeleteResponse, ImportStateRequest,
    ImportStateResponse, ReadDataSourceRequest, ReadDataSourceResponse, ReadRequest, ReadResponse,
    Resource, UpdateRequest, UpdateResponse,
};
pub use schema::{Attribute, AttributeKind, Schema};
pub use server::{ProviderSchema, ProviderServer, Response};
pub use state::State;
pub use value::{BoolValue, Int64Value, StringValue, Value};
