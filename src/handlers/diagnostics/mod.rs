use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use super::failure;
use crate::{
    dto::{MessageResponse, TestRecordEnvelope},
    service::NoteService,
};

#[utoipa::path(
    get,
    path = "/helloworld",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
    tag = "diagnostics"
)]
#[debug_handler]
pub async fn hello_world() -> Response {
    tracing::info!("HelloWorld endpoint was called");

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "helloworld".to_string(),
        }),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/cosmos",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
    tag = "diagnostics"
)]
#[debug_handler]
pub async fn cosmos_hello() -> Response {
    tracing::info!("Cosmos hello endpoint was called");

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "helloworld CosmosController Get".to_string(),
        }),
    )
        .into_response()
}

/// Writes a throwaway record to prove the database accepts writes.
#[utoipa::path(
    post,
    path = "/api/cosmos/add-test-record",
    responses(
        (status = 200, description = "Test record written", body = TestRecordEnvelope),
        (status = 400, description = "Database error", body = crate::dto::FailureEnvelope),
        (status = 500, description = "Internal server error", body = crate::dto::FailureEnvelope)
    ),
    tag = "diagnostics"
)]
#[debug_handler]
pub async fn add_test_record(State(service): State<Arc<NoteService>>) -> Response {
    tracing::info!("Adding test record");

    match service.add_test_record().await {
        Ok(response) => {
            let record = response.resource;
            tracing::info!("Added test record with ID: {}", record.id);
            (
                StatusCode::OK,
                Json(TestRecordEnvelope {
                    success: true,
                    message: "Test record added successfully".to_string(),
                    record,
                    request_charge: response.request_charge,
                }),
            )
                .into_response()
        }
        Err(e) => failure("adding test record", None, e),
    }
}
