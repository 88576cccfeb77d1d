//! `/api/notes` handlers.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use folio_core::{CreateNoteRequest, Note, UpdateNoteRequest};

use crate::error::{ApiError, ErrorResponse};
use crate::AppState;

/// Query string of the search endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring to look for in titles and block text.
    pub q: Option<String>,
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest("Invalid note ID".into()))
}

/// List all notes, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    responses(
        (status = 200, description = "All notes", body = [Note]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let notes = state.notes.list().await?;
    Ok(Json(notes))
}

/// Search notes by title and block content.
#[utoipa::path(
    get,
    path = "/api/notes/search",
    tag = "Notes",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching notes", body = [Note]),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn search_notes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query is required".into()))?;

    let start = Instant::now();
    let notes = state.notes.search(&query).await?;
    debug!(
        subsystem = "api",
        component = "notes",
        op = "search",
        query = %query,
        result_count = notes.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Search complete"
    );
    Ok(Json(notes))
}

/// Fetch one note.
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 400, description = "Non-integer id", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let note = state.notes.get(id).await?;
    Ok(Json(note))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Created note", body = Note),
        (status = 400, description = "Invalid body", body = ErrorResponse)
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let note = state.notes.create(req).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = note.id,
        "Note created"
    );
    Ok((StatusCode::CREATED, Json(note)))
}

/// Update title and/or replace the block array.
#[utoipa::path(
    patch,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i32, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = body?;
    let note = state.notes.update(id, req).await?;
    Ok(Json(note))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Non-integer id", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.notes.delete(id).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id = id,
        "Note deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
