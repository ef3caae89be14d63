//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `TodoApi` glues the two halves to a `Transport`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiErrorBody, FindTodosParams, Item, NewItem};

/// Media type the todo server produces and consumes.
pub const MEDIA_TYPE: &str = "application/spkane.todo-list.v1+json";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_find_todos(&self, params: &FindTodosParams) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(since) = params.since {
            query.push(format!("since={since}"));
        }
        if let Some(limit) = params.limit {
            query.push(format!("limit={limit}"));
        }
        let mut url = format!("{}/", self.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_find_todo(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id), None)
    }

    pub fn build_add_one(&self, input: &NewItem) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(self.request(HttpMethod::Post, format!("{}/", self.base_url), Some(body)))
    }

    pub fn build_update_one(&self, id: i64, input: &NewItem) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(self.request(HttpMethod::Put, self.item_url(id), Some(body)))
    }

    pub fn build_destroy_one(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id), None)
    }

    pub fn parse_find_todos(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    /// The server answers a lookup with a one-element array; an empty array
    /// means the item is gone.
    pub fn parse_find_todo(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, 200)?;
        let items: Vec<Item> = decode(&response.body)?;
        items.into_iter().next().ok_or(ApiError::NotFound)
    }

    pub fn parse_add_one(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    /// The update body is not a reliable copy of the item, so only the
    /// status is checked.
    pub fn parse_update_one(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_destroy_one(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), MEDIA_TYPE.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), MEDIA_TYPE.to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::Deserialization)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let message = match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(error) => error.message,
        Err(_) => response.body.clone(),
    };
    Err(ApiError::Status {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8080")
    }

    #[test]
    fn build_find_todos_without_params() {
        let req = client().build_find_todos(&FindTodosParams::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/");
        assert!(req.body.is_none());
        assert_eq!(req.headers, vec![("accept".to_string(), MEDIA_TYPE.to_string())]);
    }

    #[test]
    fn build_find_todos_with_since_and_limit() {
        let params = FindTodosParams {
            since: Some(3),
            limit: Some(1),
        };
        let req = client().build_find_todos(&params);
        assert_eq!(req.url, "http://localhost:8080/?since=3&limit=1");
    }

    #[test]
    fn build_find_todo_uses_item_path() {
        let req = client().build_find_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/42");
    }

    #[test]
    fn build_add_one_sends_media_type_and_omits_id() {
        let req = client().build_add_one(&NewItem::new("Go Shopping", false)).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/");
        assert!(req
            .headers
            .contains(&("content-type".to_string(), MEDIA_TYPE.to_string())));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["description"], "Go Shopping");
        assert_eq!(body["completed"], false);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_one_targets_item() {
        let req = client()
            .build_update_one(7, &NewItem::new("Go shopping for avocados", true))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["completed"], true);
    }

    #[test]
    fn build_destroy_one_has_no_body() {
        let req = client().build_destroy_one(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn api_path_is_kept_and_trailing_slash_stripped() {
        let client = TodoClient::new("https://todo.example.com:9443/api/v1/");
        assert_eq!(client.base_url(), "https://todo.example.com:9443/api/v1");
        assert_eq!(
            client.build_find_todo(1).url,
            "https://todo.example.com:9443/api/v1/1"
        );
    }

    #[test]
    fn parse_find_todo_takes_first_item() {
        let response = HttpResponse::new(200, r#"[{"id":1,"description":"Test","completed":false}]"#);
        let item = client().parse_find_todo(response).unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.description, "Test");
    }

    #[test]
    fn parse_find_todo_empty_array_is_not_found() {
        let err = client().parse_find_todo(HttpResponse::new(200, "[]")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_find_todo_404_is_not_found() {
        let response = HttpResponse::new(404, r#"{"code":404,"message":"item 9 not found"}"#);
        let err = client().parse_find_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_add_one_wrong_status_uses_error_message() {
        let response = HttpResponse::new(422, r#"{"code":422,"message":"description is required"}"#);
        let err = client().parse_add_one(response).unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "description is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_add_one_wrong_status_keeps_raw_body() {
        let err = client()
            .parse_add_one(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(err.to_string(), "[500] internal error");
    }

    #[test]
    fn parse_update_one_ignores_body() {
        assert!(client().parse_update_one(HttpResponse::new(200, "")).is_ok());
    }

    #[test]
    fn parse_destroy_one_requires_204() {
        assert!(client().parse_destroy_one(HttpResponse::new(204, "")).is_ok());
        let err = client().parse_destroy_one(HttpResponse::new(200, "")).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 200, .. }));
    }

    #[test]
    fn parse_find_todos_bad_json() {
        let err = client()
            .parse_find_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
