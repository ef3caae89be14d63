//! The `todo_todo` data source: looks up one todo by id.

use todo_core::TodoApi;
use tracing::debug;

use crate::framework::{
    Attribute, DataSource, ReadDataSourceRequest, ReadDataSourceResponse, Schema, State,
};
use crate::model::TodoModel;

#[derive(Debug, Default)]
pub struct TodoDataSource {
    client: Option<TodoApi>,
}

impl TodoDataSource {
    pub fn boxed() -> Box<dyn DataSource<TodoApi>> {
        Box::new(Self::default())
    }
}

impl DataSource<TodoApi> for TodoDataSource {
    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_todo")
    }

    fn schema(&self) -> Schema {
        Schema::new("Fetch a todo.")
            .attribute(
                "id",
                Attribute::int64()
                    .description("The unique identifier for the todo.")
                    .required(),
            )
            .attribute(
                "description",
                Attribute::string()
                    .description("The description for the todo.")
                    .computed(),
            )
            .attribute(
                "completed",
                Attribute::bool()
                    .description("The completed status for the todo.")
                    .computed(),
            )
    }

    fn configure(&mut self, data: &TodoApi) {
        self.client = Some(data.clone());
    }

    fn read(&self, req: &ReadDataSourceRequest, resp: &mut ReadDataSourceResponse) {
        let Some(config) = resp.diagnostics.take(req.config.get::<TodoModel>()) else {
            return;
        };
        let Some(client) = self.client.as_ref() else {
            resp.diagnostics.add_error(
                "Unconfigured Todo API Client",
                "Expected a configured Todo API client. Please report this issue to the provider developers.",
            );
            return;
        };

        let id = config.id.value();
        debug!(id, "Reading todo data source");
        match client.find_todo(id) {
            Ok(item) => {
                if let Some(state) = resp.diagnostics.take(State::from_model(&TodoModel::from(item))) {
                    resp.state = state;
                }
            }
            Err(e) => resp.diagnostics.add_error("Unable to Read Todo", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_id_is_configurable() {
        let schema = TodoDataSource::default().schema();
        assert!(schema.attributes["id"].required);
        assert!(schema.attributes["description"].computed);
        assert!(schema.attributes["completed"].computed);
        assert_eq!(schema.attributes["id"].description, "The unique identifier for the todo.");
    }
}
