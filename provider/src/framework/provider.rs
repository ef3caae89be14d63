use super::diag::Diagnostics;
use super::resource::{DataSource, Resource};
use super::schema::Schema;
use super::state::State;

pub type ResourceFactory<D> = fn() -> Box<dyn Resource<D>>;
pub type DataSourceFactory<D> = fn() -> Box<dyn DataSource<D>>;

/// The plugin-level component: owns the provider block schema, turns its
/// configuration into shared data, and lists the resources and data sources
/// that consume that data.
pub trait Provider {
    /// Handed to every resource and data source after a successful
    /// configure.
    type Data: Clone;

    /// Provider type name, the prefix of every resource type name.
    fn metadata(&self) -> String;

    fn schema(&self) -> Schema;

    fn configure(&self, req: &ConfigureRequest, resp: &mut ConfigureResponse<Self::Data>);

    fn resources(&self) -> Vec<ResourceFactory<Self::Data>>;

    fn data_sources(&self) -> Vec<DataSourceFactory<Self::Data>>;
}

#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub config: State,
}

#[derive(Debug, Clone)]
pub struct ConfigureResponse<D> {
    /// Left `None`, the provider stays unconfigured.
    pub data: Option<D>,
    pub diagnostics: Diagnostics,
}

impl<D> Default for ConfigureResponse<D> {
    fn default() -> Self {
        Self {
            data: None,
            diagnostics: Diagnostics::new(),
        }
    }
}
