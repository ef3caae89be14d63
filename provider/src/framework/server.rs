//! Dispatches host operations to a [`Provider`] and its resources.
//!
//! The server owns the configured provider data. Every resource and data
//! source operation builds a fresh instance from its factory, configures it
//! with that data and runs exactly one hook, so no state survives between
//! calls other than the data itself.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, debug_span, info, warn};

use super::diag::{Diagnostic, Diagnostics};
use super::provider::{ConfigureRequest, ConfigureResponse, DataSourceFactory, Provider, ResourceFactory};
use super::resource::{
    CreateRequest, CreateResponse, DataSource, DeleteRequest, DeleteResponse, ImportStateRequest,
    ImportStateResponse, ReadDataSourceRequest, ReadDataSourceResponse, ReadRequest, ReadResponse,
    Resource, UpdateRequest, UpdateResponse,
};
use super::schema::Schema;
use super::state::State;

/// Result of one operation. `state` is `None` when nothing is tracked
/// afterwards: a failed create or import, a delete, or a read that found the
/// resource gone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    pub state: Option<State>,
    pub diagnostics: Diagnostics,
}

impl Response {
    fn failed(diagnostics: impl Into<Diagnostics>) -> Self {
        Self {
            state: None,
            diagnostics: diagnostics.into(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

pub struct ProviderServer<P: Provider> {
    provider: P,
    type_name: String,
    resources: BTreeMap<String, ResourceFactory<P::Data>>,
    data_sources: BTreeMap<String, DataSourceFactory<P::Data>>,
    data: Option<P::Data>,
}

impl<P: Provider> ProviderServer<P> {
    pub fn new(provider: P) -> Self {
        let type_name = provider.metadata();
        let resources = provider
            .resources()
            .into_iter()
            .map(|factory| (factory().metadata(&type_name), factory))
            .collect();
        let data_sources = provider
            .data_sources()
            .into_iter()
            .map(|factory| (factory().metadata(&type_name), factory))
            .collect();
        Self {
            provider,
            type_name,
            resources,
            data_sources,
            data: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_configured(&self) -> bool {
        self.data.is_some()
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: self.provider.schema(),
            resources: self
                .resources
                .iter()
                .map(|(name, factory)| (name.clone(), factory().schema()))
                .collect(),
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, factory)| (name.clone(), factory().schema()))
                .collect(),
        }
    }

    /// Validates the provider block and runs the provider's configure.
    /// Data from an earlier successful configure is kept when this one
    /// fails.
    pub fn configure(&mut self, config: State) -> Diagnostics {
        let _span = debug_span!("configure_provider", provider = %self.type_name).entered();

        let mut diagnostics = self.provider.schema().validate_config(&config);
        if diagnostics.has_error() {
            return diagnostics;
        }

        let mut resp = ConfigureResponse::default();
        self.provider.configure(&ConfigureRequest { config }, &mut resp);
        diagnostics.append(resp.diagnostics);

        if diagnostics.has_error() {
            warn!(errors = diagnostics.errors().count(), "provider configuration failed");
            return diagnostics;
        }
        if let Some(data) = resp.data {
            self.data = Some(data);
            info!("provider configured");
        }
        diagnostics
    }

    fn configured_data(&self) -> Result<&P::Data, Diagnostic> {
        self.data.as_ref().ok_or_else(|| {
            Diagnostic::error(
                "Provider Not Configured",
                "The provider must be configured successfully before resources or data sources can be used.",
            )
        })
    }

    fn resource_factory(&self, type_name: &str) -> Result<ResourceFactory<P::Data>, Diagnostic> {
        self.resources.get(type_name).copied().ok_or_else(|| {
            Diagnostic::error(
                "Resource Type Not Found",
                format!("The provider does not support resource type \"{type_name}\"."),
            )
        })
    }

    fn resource(&self, type_name: &str) -> Result<Box<dyn Resource<P::Data>>, Diagnostic> {
        let factory = self.resource_factory(type_name)?;
        let data = self.configured_data()?;
        let mut resource = factory();
        resource.configure(data);
        Ok(resource)
    }

    fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSource<P::Data>>, Diagnostic> {
        let factory = self.data_sources.get(type_name).copied().ok_or_else(|| {
            Diagnostic::error(
                "Data Source Type Not Found",
                format!("The provider does not support data source type \"{type_name}\"."),
            )
        })?;
        let data = self.configured_data()?;
        let mut data_source = factory();
        data_source.configure(data);
        Ok(data_source)
    }

    /// Proposed state for a change. A `None` config plans a destroy.
    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior_state: Option<&State>,
        config: Option<&State>,
    ) -> Response {
        let factory = match self.resource_factory(type_name) {
            Ok(factory) => factory,
            Err(diag) => return Response::failed(diag),
        };
        let Some(config) = config else {
            return Response::default();
        };
        let schema = factory().schema();
        let diagnostics = schema.validate_config(config);
        if diagnostics.has_error() {
            return Response::failed(diagnostics);
        }
        Response {
            state: Some(schema.plan(prior_state, config)),
            diagnostics,
        }
    }

    /// Applies a planned change: create without prior state, delete without
    /// a plan, update otherwise.
    pub fn apply_resource_change(
        &self,
        type_name: &str,
        prior_state: Option<State>,
        planned_state: Option<State>,
    ) -> Response {
        match (prior_state, planned_state) {
            (None, Some(planned)) => self.create_resource(type_name, planned),
            (Some(prior), Some(planned)) => self.update_resource(type_name, prior, planned),
            (Some(prior), None) => self.delete_resource(type_name, prior),
            (None, None) => Response::failed(Diagnostic::error(
                "Invalid Resource Change",
                "A resource change needs a prior state, a planned state, or both.",
            )),
        }
    }

    pub fn create_resource(&self, type_name: &str, planned_state: State) -> Response {
        let _span = debug_span!("create_resource", resource = type_name).entered();
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diag) => return Response::failed(diag),
        };

        if let Some(diag) = unknown_inputs(&resource.schema(), &planned_state) {
            return Response::failed(diag);
        }

        let mut resp = CreateResponse::default();
        resource.create(&CreateRequest { plan: planned_state }, &mut resp);
        if resp.diagnostics.has_error() {
            return Response::failed(resp.diagnostics);
        }
        applied(resp.state, resp.diagnostics)
    }

    pub fn read_resource(&self, type_name: &str, current_state: State) -> Response {
        let _span = debug_span!("read_resource", resource = type_name).entered();
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diag) => return Response::failed(diag),
        };

        let req = ReadRequest {
            state: current_state.clone(),
        };
        let mut resp = ReadResponse::new(current_state);
        resource.read(&req, &mut resp);
        if resp.state.is_removed() {
            debug!("resource no longer exists, dropping it from state");
            return Response {
                state: None,
                diagnostics: resp.diagnostics,
            };
        }
        Response {
            state: Some(resp.state),
            diagnostics: resp.diagnostics,
        }
    }

    /// A failed update leaves the prior state tracked.
    pub fn update_resource(&self, type_name: &str, prior_state: State, planned_state: State) -> Response {
        let _span = debug_span!("update_resource", resource = type_name).entered();
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diag) => {
                return Response {
                    state: Some(prior_state),
                    diagnostics: diag.into(),
                }
            }
        };

        if let Some(diag) = unknown_inputs(&resource.schema(), &planned_state) {
            return Response {
                state: Some(prior_state),
                diagnostics: diag.into(),
            };
        }

        let req = UpdateRequest {
            plan: planned_state.clone(),
            prior_state,
        };
        let mut resp = UpdateResponse::new(planned_state);
        resource.update(&req, &mut resp);
        if resp.diagnostics.has_error() {
            return Response {
                state: Some(req.prior_state),
                diagnostics: resp.diagnostics,
            };
        }
        applied(resp.state, resp.diagnostics)
    }

    /// A failed delete leaves the prior state tracked.
    pub fn delete_resource(&self, type_name: &str, prior_state: State) -> Response {
        let _span = debug_span!("delete_resource", resource = type_name).entered();
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diag) => {
                return Response {
                    state: Some(prior_state),
                    diagnostics: diag.into(),
                }
            }
        };

        let req = DeleteRequest { state: prior_state };
        let mut resp = DeleteResponse::default();
        resource.delete(&req, &mut resp);
        let state = resp.diagnostics.has_error().then_some(req.state);
        Response {
            state,
            diagnostics: resp.diagnostics,
        }
    }

    /// Seeds state from an import identifier. The host follows up with a
    /// read to fill in the rest.
    pub fn import_resource_state(&self, type_name: &str, id: &str) -> Response {
        let _span = debug_span!("import_resource_state", resource = type_name, id).entered();
        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(diag) => return Response::failed(diag),
        };

        let mut resp = ImportStateResponse::default();
        resource.import_state(&ImportStateRequest { id: id.to_string() }, &mut resp);
        if resp.diagnostics.has_error() {
            return Response::failed(resp.diagnostics);
        }
        if resp.state.is_removed() || resp.state.attributes().next().is_none() {
            let mut diagnostics = resp.diagnostics;
            diagnostics.add_error(
                "Missing Resource Import State",
                "The import did not return any state for the resource.",
            );
            return Response::failed(diagnostics);
        }
        Response {
            state: Some(resp.state),
            diagnostics: resp.diagnostics,
        }
    }

    pub fn read_data_source(&self, type_name: &str, config: State) -> Response {
        let _span = debug_span!("read_data_source", data_source = type_name).entered();
        let data_source = match self.data_source(type_name) {
            Ok(data_source) => data_source,
            Err(diag) => return Response::failed(diag),
        };

        let schema = data_source.schema();
        let diagnostics = schema.validate_config(&config);
        if diagnostics.has_error() {
            return Response::failed(diagnostics);
        }
        if let Some(diag) = unknown_inputs(&schema, &config) {
            return Response::failed(diag);
        }

        let mut resp = ReadDataSourceResponse::default();
        data_source.read(&ReadDataSourceRequest { config }, &mut resp);
        let mut all = diagnostics;
        all.append(resp.diagnostics);
        if all.has_error() {
            return Response::failed(all);
        }
        Response {
            state: Some(resp.state),
            diagnostics: all,
        }
    }
}

/// Rejects values that would reach the remote API before they are known.
fn unknown_inputs(schema: &Schema, values: &State) -> Option<Diagnostic> {
    let unknown = schema.unknown_inputs(values);
    if unknown.is_empty() {
        return None;
    }
    Some(Diagnostic::error(
        "Unknown Value in Configuration",
        format!(
            "The operation cannot run while these configured values are still unknown: {}. \
             Apply the resources they depend on first.",
            unknown.join(", ")
        ),
    ))
}

/// Checks the state a create or update produced before handing it back.
fn applied(state: State, mut diagnostics: Diagnostics) -> Response {
    let unknown = state.unknown_attributes();
    if !unknown.is_empty() {
        diagnostics.add_error(
            "Provider returned invalid result object after apply",
            format!(
                "After the apply operation, the provider still indicated unknown values for: {}.",
                unknown.join(", ")
            ),
        );
        return Response::failed(diagnostics);
    }
    let state = (!state.is_removed()).then_some(state);
    Response { state, diagnostics }
}
