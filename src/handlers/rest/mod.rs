use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use super::failure;
use crate::{
    dto::{
        DeleteEnvelope, FailureEnvelope, MessageResponse, NoteEnvelope, NoteListEnvelope,
        NoteRequest, NoteResponse, TestRecordEnvelope, TestRecordResponse,
    },
    service::NoteService,
};

/// Mount point of the JSON API, shared by the router and `Location` headers.
pub const API_PREFIX: &str = "/api";
pub const NOTES_PATH: &str = "/note";
pub const NOTE_PATH: &str = "/note/{id}";

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_notes,
        get_one_note,
        create_note,
        update_note,
        delete_note,
        crate::handlers::diagnostics::add_test_record,
        crate::handlers::diagnostics::hello_world,
        crate::handlers::diagnostics::cosmos_hello
    ),
    components(schemas(
        NoteResponse,
        NoteRequest,
        NoteListEnvelope,
        NoteEnvelope,
        DeleteEnvelope,
        FailureEnvelope,
        TestRecordResponse,
        TestRecordEnvelope,
        MessageResponse
    )),
    tags(
        (name = "notes", description = "Notes management API"),
        (name = "diagnostics", description = "Connectivity checks")
    )
)]
pub struct ApiDoc;

/// Parses the JSON body. An empty body and a `null` body both count as
/// "no note data".
fn note_body(body: &Bytes) -> Result<Option<NoteRequest>, Response> {
    if body.trim_ascii().is_empty() {
        return Ok(None);
    }

    match Json::<Option<NoteRequest>>::from_bytes(body) {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            tracing::warn!("Rejected note body: {}", rejection.body_text());
            Err((
                StatusCode::BAD_REQUEST,
                Json(FailureEnvelope::new(format!(
                    "Invalid note data: {}",
                    rejection.body_text()
                ))),
            )
                .into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/note",
    responses(
        (status = 200, description = "All notes", body = NoteListEnvelope),
        (status = 400, description = "Database error", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    tracing::info!("Retrieving all notes");

    match service.list_notes().await {
        Ok(response) => {
            let notes = response.resource;
            tracing::info!("Retrieved {} notes", notes.len());
            (
                StatusCode::OK,
                Json(NoteListEnvelope {
                    success: true,
                    count: notes.len(),
                    notes,
                }),
            )
                .into_response()
        }
        Err(e) => failure("retrieving notes", None, e),
    }
}

#[utoipa::path(
    get,
    path = "/api/note/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteEnvelope),
        (status = 404, description = "Note not found", body = FailureEnvelope),
        (status = 400, description = "Database error", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    tracing::info!("Retrieving note with ID: {id}");

    match service.get_note(&id).await {
        Ok(response) => {
            tracing::info!("Retrieved note with ID: {id}");
            (
                StatusCode::OK,
                Json(NoteEnvelope {
                    success: true,
                    message: None,
                    note: response.resource,
                    request_charge: response.request_charge,
                }),
            )
                .into_response()
        }
        Err(e) => failure("retrieving note", Some(&id), e),
    }
}

#[utoipa::path(
    post,
    path = "/api/note",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteEnvelope,
            headers(("Location" = String, description = "URL of the new note"))),
        (status = 400, description = "Invalid note data or database error", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    body: Bytes,
) -> Response {
    let request = match note_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    tracing::info!("Creating new note");

    match service.create_note(request).await {
        Ok(response) => {
            let note = response.resource;
            tracing::info!("Created note with ID: {}", note.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, format!("{API_PREFIX}{NOTES_PATH}/{}", note.id))],
                Json(NoteEnvelope {
                    success: true,
                    message: Some("Note created successfully".to_string()),
                    note,
                    request_charge: response.request_charge,
                }),
            )
                .into_response()
        }
        Err(e) => failure("creating note", None, e),
    }
}

#[utoipa::path(
    put,
    path = "/api/note/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteEnvelope),
        (status = 404, description = "Note not found", body = FailureEnvelope),
        (status = 400, description = "Invalid note data or database error", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let request = match note_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    tracing::info!("Updating note with ID: {id}");

    match service.update_note(&id, request).await {
        Ok(response) => {
            tracing::info!("Updated note with ID: {id}");
            (
                StatusCode::OK,
                Json(NoteEnvelope {
                    success: true,
                    message: Some("Note updated successfully".to_string()),
                    note: response.resource,
                    request_charge: response.request_charge,
                }),
            )
                .into_response()
        }
        Err(e) => failure("updating note", Some(&id), e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/note/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteEnvelope),
        (status = 404, description = "Note not found", body = FailureEnvelope),
        (status = 400, description = "Database error", body = FailureEnvelope),
        (status = 500, description = "Internal server error", body = FailureEnvelope)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    tracing::info!("Deleting note with ID: {id}");

    match service.delete_note(&id).await {
        Ok(response) => {
            tracing::info!("Deleted note with ID: {id}");
            (
                StatusCode::OK,
                Json(DeleteEnvelope {
                    success: true,
                    message: "Note deleted successfully".to_string(),
                    request_charge: response.request_charge,
                }),
            )
                .into_response()
        }
        Err(e) => failure("deleting note", Some(&id), e),
    }
}
