//! The `todo_todo` managed resource.

use todo_core::{NewItem, TodoApi};
use tracing::debug;

use crate::framework::{
    Attribute, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, Diagnostics,
    ImportStateRequest, ImportStateResponse, ReadRequest, ReadResponse, Resource, Schema, State,
    UpdateRequest, UpdateResponse, Value,
};
use crate::model::TodoModel;

#[derive(Debug, Default)]
pub struct TodoResource {
    client: Option<TodoApi>,
}

impl TodoResource {
    pub fn boxed() -> Box<dyn Resource<TodoApi>> {
        Box::new(Self::default())
    }

    fn client(&self, diagnostics: &mut Diagnostics) -> Option<&TodoApi> {
        if self.client.is_none() {
            diagnostics.add_error(
                "Unconfigured Todo API Client",
                "Expected a configured Todo API client. Please report this issue to the provider developers.",
            );
        }
        self.client.as_ref()
    }
}

fn write_state(state: &mut State, model: &TodoModel, diagnostics: &mut Diagnostics) {
    if let Some(written) = diagnostics.take(State::from_model(model)) {
        *state = written;
    }
}

impl Resource<TodoApi> for TodoResource {
    fn metadata(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_todo")
    }

    fn schema(&self) -> Schema {
        Schema::new("Manage a todo.")
            .attribute(
                "id",
                Attribute::int64()
                    .description("The unique identifier for the todo.")
                    .computed()
                    .use_state_for_unknown(),
            )
            .attribute(
                "description",
                Attribute::string()
                    .description("The description for the todo.")
                    .required(),
            )
            .attribute(
                "completed",
                Attribute::bool()
                    .description("The completed status for the todo.")
                    .required(),
            )
    }

    fn configure(&mut self, data: &TodoApi) {
        self.client = Some(data.clone());
    }

    fn create(&self, req: &CreateRequest, resp: &mut CreateResponse) {
        debug!("Preparing to create todo resource");
        let Some(plan) = resp.diagnostics.take(req.plan.get::<TodoModel>()) else {
            return;
        };
        let Some(client) = self.client(&mut resp.diagnostics) else {
            return;
        };

        let input = NewItem::new(plan.description.value(), plan.completed.value());
        let item = match client.add_one(&input) {
            Ok(item) => item,
            Err(e) => {
                resp.diagnostics.add_error(
                    "Error creating todo",
                    format!("Could not create todo, unexpected error: {e}"),
                );
                return;
            }
        };

        write_state(&mut resp.state, &TodoModel::from(item), &mut resp.diagnostics);
        debug!(success = true, "Created todo resource");
    }

    /// Any lookup failure means the todo is gone; it is dropped from state
    /// rather than reported.
    fn read(&self, req: &ReadRequest, resp: &mut ReadResponse) {
        debug!("Preparing to read todo resource");
        let Some(state) = resp.diagnostics.take(req.state.get::<TodoModel>()) else {
            return;
        };
        let Some(client) = self.client(&mut resp.diagnostics) else {
            return;
        };

        let id = state.id.value();
        let item = match client.find_todo(id) {
            Ok(item) => item,
            Err(e) => {
                debug!(id, error = %e, "Error reading todo, removing it from state");
                resp.state.remove_resource();
                return;
            }
        };

        write_state(&mut resp.state, &TodoModel::from(item), &mut resp.diagnostics);
        debug!(success = true, "Finished reading todo resource");
    }

    /// The update acknowledgement does not carry the item, so the new state
    /// comes from a follow-up lookup.
    fn update(&self, req: &UpdateRequest, resp: &mut UpdateResponse) {
        debug!("Preparing to update todo resource");
        let Some(plan) = resp.diagnostics.take(req.plan.get::<TodoModel>()) else {
            return;
        };
        let Some(client) = self.client(&mut resp.diagnostics) else {
            return;
        };

        let id = match plan.id {
            Value::Known(id) => id,
            Value::Null | Value::Unknown => {
                let Some(prior) = resp.diagnostics.take(req.prior_state.get::<TodoModel>()) else {
                    return;
                };
                prior.id.value()
            }
        };

        let input = NewItem::new(plan.description.value(), plan.completed.value());
        if let Err(e) = client.update_one(id, &input) {
            resp.diagnostics.add_error(
                "Error Updating Todo",
                format!("Could not update todo, unexpected error: {e}"),
            );
            return;
        }

        let item = match client.find_todo(id) {
            Ok(item) => item,
            Err(e) => {
                resp.diagnostics.add_error(
                    "Error Reading Todo",
                    format!("Could not read todo ID {id}: {e}"),
                );
                return;
            }
        };

        write_state(&mut resp.state, &TodoModel::from(item), &mut resp.diagnostics);
        debug!(success = true, "Updated todo resource");
    }

    fn delete(&self, req: &DeleteRequest, resp: &mut DeleteResponse) {
        debug!("Preparing to delete todo resource");
        let Some(state) = resp.diagnostics.take(req.state.get::<TodoModel>()) else {
            return;
        };
        let Some(client) = self.client(&mut resp.diagnostics) else {
            return;
        };

        if let Err(e) = client.destroy_one(state.id.value()) {
            resp.diagnostics.add_error(
                "Error Deleting todo",
                format!("Could not delete todo, unexpected error: {e}"),
            );
            return;
        }
        debug!(success = true, "Deleted todo resource");
    }

    /// Import identifiers are decimal integers.
    fn import_state(&self, req: &ImportStateRequest, resp: &mut ImportStateResponse) {
        let id = match req.id.parse::<i64>() {
            Ok(id) => id,
            Err(e) => {
                resp.diagnostics.add_error(
                    "Error importing todo",
                    format!("Could not import todo, unexpected error (ID should be an integer): {e}"),
                );
                return;
            }
        };
        if let Err(diag) = resp.state.set_attribute("id", id) {
            resp.diagnostics.push(diag);
        }
    }
}
