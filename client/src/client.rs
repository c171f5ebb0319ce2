//! Request builder and response parser for the todos API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is a `build_*` /
//! `parse_*` pair so the I/O boundary stays explicit and both halves can be
//! tested without a network.

use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use todos_core::{CreateTodo, Identifier, LimitStatus, Todo, UpdateTodo};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/")
    }

    pub fn build_get_todo(&self, id: &Identifier) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/{id}"))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(input).map_err(ClientError::Serialization)?;
        Ok(self.with_json(HttpMethod::Post, "/", body))
    }

    pub fn build_update_todo(
        &self,
        id: &Identifier,
        input: &UpdateTodo,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(input).map_err(ClientError::Serialization)?;
        Ok(self.with_json(HttpMethod::Patch, &format!("/{id}"), body))
    }

    pub fn build_delete_todo(&self, id: &Identifier) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/{id}"))
    }

    pub fn build_clear_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Delete, "/")
    }

    pub fn build_limit_status(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/limit")
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ClientError> {
        parse_json(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ClientError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ClientError> {
        parse_json(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ClientError> {
        parse_json(response, 200)
    }

    /// Deleting an unknown id also succeeds.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response, 204)
    }

    pub fn parse_clear_todos(&self, response: HttpResponse) -> Result<(), ClientError> {
        check_status(&response, 204)
    }

    pub fn parse_limit_status(&self, response: HttpResponse) -> Result<LimitStatus, ClientError> {
        parse_json(response, 200)
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json(&self, method: HttpMethod, path: &str, body: String) -> HttpRequest {
        let (name, value) = JSON_CONTENT_TYPE;
        HttpRequest {
            headers: vec![(name.to_string(), value.to_string())],
            body: Some(body),
            ..self.bare(method, path)
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ClientError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(ClientError::Deserialization)
}

/// Map non-success status codes to the appropriate `ClientError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ClientError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ClientError::NotFound);
    }
    Err(ClientError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_formats_numeric_and_token_ids() {
        let c = client();
        assert_eq!(
            c.build_get_todo(&Identifier::Number(7)).path,
            "http://localhost:3000/7"
        );
        assert_eq!(
            c.build_get_todo(&Identifier::from("1a2b3c4d")).path,
            "http://localhost:3000/1a2b3c4d"
        );
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let req = client()
            .build_create_todo(&CreateTodo::titled("Buy milk"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk"}));
    }

    #[test]
    fn build_update_todo_uses_patch_and_skips_absent_fields() {
        let req = client()
            .build_update_todo(&Identifier::Number(1), &UpdateTodo::completed(true))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["completed"], true);
        assert!(body.get("title").is_none());
    }

    #[test]
    fn build_delete_and_clear() {
        let c = client();
        let one = c.build_delete_todo(&Identifier::Number(3));
        assert_eq!(one.method, HttpMethod::Delete);
        assert_eq!(one.path, "http://localhost:3000/3");
        let all = c.build_clear_todos();
        assert_eq!(all.method, HttpMethod::Delete);
        assert_eq!(all.path, "http://localhost:3000/");
    }

    #[test]
    fn build_limit_status_path() {
        assert_eq!(client().build_limit_status().path, "http://localhost:3000/limit");
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(response(200, r#"[{"id":1,"title":"Test","completed":false}]"#))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, Identifier::Number(1));
        assert_eq!(todos[0].title.as_deref(), Some("Test"));
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client().parse_get_todo(response(404, "")).unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[test]
    fn parse_create_todo_at_capacity() {
        let body = r#"{"error":"CAPACITY_EXCEEDED","message":"todos.api.limit=2, todos.size()=2"}"#;
        let err = client().parse_create_todo(response(400, body)).unwrap_err();
        match err {
            ClientError::HttpError { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("CAPACITY_EXCEEDED"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_update_todo_success() {
        let todo = client()
            .parse_update_todo(response(200, r#"{"id":"ab12cd34","title":"Updated","complete":true}"#))
            .unwrap();
        assert_eq!(todo.id, Identifier::from("ab12cd34"));
        assert!(todo.completed);
    }

    #[test]
    fn parse_delete_todo_success() {
        assert!(client().parse_delete_todo(response(204, "")).is_ok());
    }

    #[test]
    fn parse_limit_status_success() {
        let status = client()
            .parse_limit_status(response(200, r#"{"size":1,"limit":4}"#))
            .unwrap();
        assert_eq!(status, LimitStatus { size: 1, limit: 4 });
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        assert_eq!(client.build_limit_status().path, "http://localhost:3000/limit");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ClientError::Deserialization(_)));
    }
}
