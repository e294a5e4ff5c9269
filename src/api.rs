//! HTTP surface for the student records service.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /students` – Create a student. Returns the stored record including its new `id`.
//! - `GET /students` – List every stored student (`[]` when empty).
//! - `GET /students/:id` – Fetch one student.
//! - `PUT /students/:id` – Replace a student's fields; the path id always wins over any body `id`.
//! - `DELETE /students/:id` – Remove a student (`204 No Content`).
//! - `GET /students/summary/:id` – Return `{ "summary": ... }`, computing it on first request.
//! - `GET /metrics` – Observe store counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.
//!
//! Request bodies decode permissively: an empty or `null` body and missing or `null` fields
//! fall back to zero values, and unknown fields are ignored. An empty id segment
//! (`/students/`) is a malformed id. Only bodies that are not JSON, or carry a field of
//! the wrong JSON type, are rejected.

use crate::metrics::MetricsSnapshot;
use crate::records::{RecordsApi, StoreError, Student, StudentId, StudentInput};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Build the HTTP router exposing the records API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: RecordsApi + 'static,
{
    Router::new()
        .route(
            "/students",
            get(list_students::<S>).post(create_student::<S>),
        )
        .route(
            "/students/:id",
            get(get_student::<S>)
                .put(update_student::<S>)
                .delete(delete_student::<S>),
        )
        .route(
            "/students/",
            get(reject_missing_id)
                .put(reject_missing_id)
                .delete(reject_missing_id),
        )
        .route("/students/summary/:id", get(get_summary::<S>))
        .route("/students/summary/", get(reject_missing_id))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Create a student from the request body.
async fn create_student<S>(
    State(service): State<Arc<S>>,
    body: Bytes,
) -> Result<Json<Student>, AppError>
where
    S: RecordsApi,
{
    let input = decode_input(&body)?;
    Ok(Json(service.create_student(input).await))
}

/// List every stored student.
async fn list_students<S>(State(service): State<Arc<S>>) -> Json<Vec<Student>>
where
    S: RecordsApi,
{
    Json(service.list_students().await)
}

async fn get_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Student>, AppError>
where
    S: RecordsApi,
{
    let id = parse_id(&raw_id)?;
    Ok(Json(service.get_student(id).await?))
}

/// Replace a student's fields. The stored id is kept regardless of the body.
async fn update_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Student>, AppError>
where
    S: RecordsApi,
{
    let id = parse_id(&raw_id)?;
    let input = decode_input(&body)?;
    Ok(Json(service.update_student(id, input).await?))
}

async fn delete_student<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: RecordsApi,
{
    let id = parse_id(&raw_id)?;
    service.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Requests with an empty id segment (`/students/`) are malformed, not missing.
async fn reject_missing_id() -> AppError {
    AppError::InvalidIdentifier(String::new())
}

/// Response body for `GET /students/summary/:id`.
#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
}

/// Return the cached summary, generating it on first request.
async fn get_summary<S>(
    State(service): State<Arc<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: RecordsApi,
{
    let id = parse_id(&raw_id)?;
    let summary = service.student_summary(id).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: RecordsApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery.
async fn get_commands() -> Json<CommandsResponse> {
    let student_example = json!({
        "name": "Ann",
        "age": 20,
        "email": "a@x.com"
    });
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "create_student",
                method: "POST",
                path: "/students",
                description: "Store a new student. Response returns the record with its assigned id.",
                request_example: Some(student_example.clone()),
            },
            CommandDescriptor {
                name: "list_students",
                method: "GET",
                path: "/students",
                description: "Return every stored student.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_student",
                method: "GET",
                path: "/students/{id}",
                description: "Return one student by id.",
                request_example: None,
            },
            CommandDescriptor {
                name: "update_student",
                method: "PUT",
                path: "/students/{id}",
                description: "Replace every field of a student except its id. A cached summary is dropped unless supplied.",
                request_example: Some(student_example),
            },
            CommandDescriptor {
                name: "delete_student",
                method: "DELETE",
                path: "/students/{id}",
                description: "Remove a student. Ids are never reused.",
                request_example: None,
            },
            CommandDescriptor {
                name: "student_summary",
                method: "GET",
                path: "/students/summary/{id}",
                description: "Return { \"summary\": string }, generating and caching it on first request.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return store counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

fn parse_id(raw: &str) -> Result<StudentId, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

fn decode_input(body: &[u8]) -> Result<StudentInput, AppError> {
    let trimmed = body.trim_ascii();
    if trimmed.is_empty() || trimmed == b"null" {
        return Ok(StudentInput::default());
    }
    serde_json::from_slice(body).map_err(AppError::InvalidBody)
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
enum AppError {
    #[error("Invalid student ID: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidIdentifier(raw) => {
                tracing::debug!(raw_id = %raw, "Rejected malformed student id");
                (StatusCode::BAD_REQUEST, "Invalid student ID").into_response()
            }
            Self::InvalidBody(err) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {err}"),
            )
                .into_response(),
            Self::Store(StoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Student not found").into_response()
            }
            Self::Store(err @ StoreError::Summary(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
