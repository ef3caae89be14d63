//! Managed resources and data sources.
//!
//! Each operation receives a request and fills in a response. Responses are
//! pre-seeded the way the host expects: a read starts from the current
//! state, an update from the plan, a create and an import from nothing.

use super::diag::Diagnostics;
use super::schema::Schema;
use super::state::State;

/// A resource with a full create/read/update/delete lifecycle.
///
/// `D` is the data the provider hands out after configuration; the server
/// calls [`Resource::configure`] with it before every other hook.
pub trait Resource<D> {
    /// Full type name, usually the provider type name plus a suffix.
    fn metadata(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    fn configure(&mut self, _data: &D) {}

    fn create(&self, req: &CreateRequest, resp: &mut CreateResponse);

    fn read(&self, req: &ReadRequest, resp: &mut ReadResponse);

    fn update(&self, req: &UpdateRequest, resp: &mut UpdateResponse);

    fn delete(&self, req: &DeleteRequest, resp: &mut DeleteResponse);

    fn import_state(&self, _req: &ImportStateRequest, resp: &mut ImportStateResponse) {
        resp.diagnostics.add_error(
            "Resource Import Not Implemented",
            "This resource does not support import.",
        );
    }
}

/// A read-only lookup.
pub trait DataSource<D> {
    fn metadata(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    fn configure(&mut self, _data: &D) {}

    fn read(&self, req: &ReadDataSourceRequest, resp: &mut ReadDataSourceResponse);
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub plan: State,
}

#[derive(Debug, Clone, Default)]
pub struct CreateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub state: State,
}

#[derive(Debug, Clone)]
pub struct ReadResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn new(state: State) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub plan: State,
    pub prior_state: State,
}

#[derive(Debug, Clone)]
pub struct UpdateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

impl UpdateResponse {
    pub fn new(state: State) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub state: State,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}

/// `id` is the identifier the practitioner passed to `terraform import`.
#[derive(Debug, Clone)]
pub struct ImportStateRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportStateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct ReadDataSourceRequest {
    pub config: State,
}

#[derive(Debug, Clone, Default)]
pub struct ReadDataSourceResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}
