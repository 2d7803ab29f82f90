//! HTTP API for the payloadgen CRUD engine.
//!
//! Thin glue: each route decodes the JSON body, hands it to
//! [`CrudService`], and encodes the result. Failures come back as an
//! [`ErrorEnvelope`] with 404 for missing records, 500 for storage
//! failures and 400 for everything else.

pub mod demo;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use payloadgen_engine::{
    CrudService, DeleteOutcome, EngineError, ErrorEnvelope, PageEnvelope, SaveOutcome,
};
use payloadgen_model::Instance;
use payloadgen_types::{Payload, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub use demo::demo_registry;

type Body = Result<Json<serde_json::Value>, JsonRejection>;

/// An engine failure on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.root_cause() {
            EngineError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(ErrorEnvelope::from(&self.0))).into_response()
    }
}

fn json_body(body: Body) -> Result<Value, ApiError> {
    body.map(|Json(json)| Value::from(json))
        .map_err(|rejection| ApiError(EngineError::InvalidPayload(rejection.body_text())))
}

fn object_body(body: Body) -> Result<Payload, ApiError> {
    match json_body(body)? {
        Value::Object(payload) => Ok(payload),
        other => Err(ApiError(EngineError::InvalidPayload(format!(
            "request body must be an object, found {}",
            other.kind_name()
        )))),
    }
}

async fn create_or_update(
    State(service): State<Arc<CrudService>>,
    body: Body,
) -> Result<Json<SaveOutcome>, ApiError> {
    let payload = service.prepare_payload(json_body(body)?)?;
    Ok(Json(service.save_or_update(&payload)?))
}

async fn read(
    State(service): State<Arc<CrudService>>,
    body: Body,
) -> Result<Json<Instance>, ApiError> {
    Ok(Json(service.find_by_id(&object_body(body)?)?))
}

async fn find_all(
    State(service): State<Arc<CrudService>>,
    body: Body,
) -> Result<Json<PageEnvelope>, ApiError> {
    Ok(Json(service.find_all(&object_body(body)?)?))
}

async fn delete_records(
    State(service): State<Arc<CrudService>>,
    body: Body,
) -> Result<Json<DeleteOutcome>, ApiError> {
    Ok(Json(service.delete(&object_body(body)?)?))
}

/// Build the HTTP API router over the given service.
pub fn build_router(service: Arc<CrudService>) -> Router {
    Router::new()
        .route("/api/crud/create_or_update", post(create_or_update))
        .route("/api/crud/read", get(read).post(read))
        .route("/api/crud/find_all", post(find_all))
        .route("/api/crud/delete", delete(delete_records))
        .with_state(service)
}
