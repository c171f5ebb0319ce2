//! Stateless client for the todos HTTP API.
//!
//! # Overview
//! `TodoClient` turns each operation into an `HttpRequest` (`build_*`) and
//! turns the matching `HttpResponse` back into typed values (`parse_*`). The
//! caller performs the round-trip, so this crate does no I/O.
//!
//! Payload and result types are shared with the server through `todos-core`.

pub mod client;
pub mod error;
pub mod http;

pub use client::TodoClient;
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use todos_core::{CreateTodo, Identifier, LimitStatus, Todo, UpdateTodo};
