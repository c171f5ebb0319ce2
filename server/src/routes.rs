use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use todos_core::{
    CreateTodo, Identifier, LimitStatus, StoreConfig, Todo, TodoStore, UpdateTodo,
};

use crate::error::ApiError;

pub type Store = Arc<TodoStore>;

pub fn app(store: Store) -> Router {
    Router::new()
        .route("/", get(list_todos).post(create_todo).delete(clear_todos))
        .route("/limit", get(limit_status))
        .route("/{id}", get(get_todo).patch(update_todo).delete(delete_todo))
        .with_state(store)
}

/// Router over a fresh store built from `config`.
pub fn app_with_config(config: StoreConfig) -> Router {
    app(Arc::new(TodoStore::new(config)))
}

async fn list_todos(State(store): State<Store>) -> Json<Vec<Todo>> {
    Json(store.list())
}

async fn create_todo(
    State(store): State<Store>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = store.insert(input)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn clear_todos(State(store): State<Store>) -> StatusCode {
    store.clear();
    StatusCode::NO_CONTENT
}

async fn limit_status(State(store): State<Store>) -> Json<LimitStatus> {
    let status = store.limit_status();
    tracing::info!(size = status.size, limit = status.limit, "checking limit");
    Json(status)
}

async fn get_todo(
    State(store): State<Store>,
    Path(raw): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = Identifier::parse(store.strategy(), &raw)?;
    Ok(Json(store.get(&id)?))
}

/// The body is read raw so that an empty body and a JSON `null` both reach
/// the store as a missing patch.
async fn update_todo(
    State(store): State<Store>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let patch = decode_patch(&body)?;
    let id = Identifier::parse(store.strategy(), &raw)?;
    Ok(Json(store.update(&id, patch)?))
}

async fn delete_todo(
    State(store): State<Store>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = Identifier::parse(store.strategy(), &raw)?;
    store.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

fn decode_patch(body: &[u8]) -> Result<Option<UpdateTodo>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadPayload(e.to_string()))
}
