use serde::{Deserialize, Serialize};
use todo_core::Item;

use crate::framework::{BoolValue, Int64Value, StringValue, Value};

/// Attribute values of a todo, shared by the resource and the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoModel {
    #[serde(default)]
    pub id: Int64Value,
    #[serde(default)]
    pub description: StringValue,
    #[serde(default)]
    pub completed: BoolValue,
}

impl From<Item> for TodoModel {
    fn from(item: Item) -> Self {
        Self {
            id: Value::Known(item.id),
            description: Value::Known(item.description),
            completed: Value::Known(item.completed),
        }
    }
}
