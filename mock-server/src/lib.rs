use std::{collections::BTreeMap, ops::Bound, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Media type of every body this server produces.
pub const MEDIA_TYPE: &str = "application/spkane.todo-list.v1+json";

/// Page size for listings that do not pass `limit`.
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub description: String,
    pub completed: bool,
}

/// Insert and update payload. An `id` in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct FindParams {
    pub since: Option<i64>,
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    items: BTreeMap<i64, Item>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(find_todos).post(add_one))
        .route("/{id}", get(find_todo).put(update_one).delete(destroy_one))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "todo mock server listening");
    }
    axum::serve(listener, app()).await
}

/// JSON body tagged with the todo media type instead of `application/json`.
struct TodoJson<T>(T);

impl<T: Serialize> IntoResponse for TodoJson<T> {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, MEDIA_TYPE)], Json(self.0)).into_response()
    }
}

struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("item with id {id} not found"),
        }
    }

    fn unprocessable(message: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: i64::from(self.status.as_u16()),
            message: self.message,
        };
        (self.status, TodoJson(body)).into_response()
    }
}

fn validate(input: &ItemInput) -> Result<(), ApiFailure> {
    if input.description.is_empty() {
        return Err(ApiFailure::unprocessable("description must not be empty"));
    }
    Ok(())
}

async fn find_todos(State(db): State<Db>, Query(params): Query<FindParams>) -> TodoJson<Vec<Item>> {
    let store = db.read().await;
    let since = params.since.unwrap_or(0);
    let limit = params
        .limit
        .map_or(DEFAULT_LIMIT, |limit| usize::try_from(limit).unwrap_or(0));
    let items = store
        .items
        .range((Bound::Excluded(since), Bound::Unbounded))
        .take(limit)
        .map(|(_, item)| item.clone())
        .collect();
    TodoJson(items)
}

async fn add_one(
    State(db): State<Db>,
    Json(input): Json<ItemInput>,
) -> Result<(StatusCode, TodoJson<Item>), ApiFailure> {
    validate(&input)?;
    let mut store = db.write().await;
    store.last_id += 1;
    let item = Item {
        id: store.last_id,
        description: input.description,
        completed: input.completed,
    };
    store.items.insert(item.id, item.clone());
    info!(id = item.id, "added todo");
    Ok((StatusCode::CREATED, TodoJson(item)))
}

async fn find_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<TodoJson<Vec<Item>>, ApiFailure> {
    let store = db.read().await;
    let item = store.items.get(&id).cloned().ok_or_else(|| ApiFailure::not_found(id))?;
    Ok(TodoJson(vec![item]))
}

async fn update_one(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ItemInput>,
) -> Result<TodoJson<Item>, ApiFailure> {
    validate(&input)?;
    let mut store = db.write().await;
    let item = store.items.get_mut(&id).ok_or_else(|| ApiFailure::not_found(id))?;
    item.description = input.description;
    item.completed = input.completed;
    info!(id, "updated todo");
    Ok(TodoJson(item.clone()))
}

async fn destroy_one(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    store
        .items
        .remove(&id)
        .map(|_| {
            info!(id, "destroyed todo");
            StatusCode::NO_CONTENT
        })
        .ok_or_else(|| ApiFailure::not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_to_json() {
        let item = Item {
            id: 3,
            description: "Test".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["description"], "Test");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn item_input_ignores_id() {
        let input: ItemInput =
            serde_json::from_str(r#"{"id":99,"description":"Done","completed":true}"#).unwrap();
        assert_eq!(input.description, "Done");
        assert!(input.completed);
    }

    #[test]
    fn item_input_requires_completed() {
        let result: Result<ItemInput, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_description_is_rejected() {
        let input = ItemInput {
            description: String::new(),
            completed: false,
        };
        let err = validate(&input).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
