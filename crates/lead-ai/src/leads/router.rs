use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{LeadId, LeadSubmission};
use super::repository::{LeadRepository, RepositoryError};
use super::service::{LeadService, LeadServiceError};

/// Router builder exposing HTTP endpoints for lead CRUD and CSV exchange.
pub fn lead_router<R>(service: Arc<LeadService<R>>) -> Router
where
    R: LeadRepository + 'static,
{
    Router::new()
        .route(
            "/api/leads",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/leads/:lead_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route("/api/leads/import", post(import_handler::<R>))
        .route("/api/leads/download", get(download_handler::<R>))
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.create(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<LeadService<R>>>) -> Response
where
    R: LeadRepository + 'static,
{
    match service.list() {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.get(&LeadId(lead_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Path(lead_id): Path<String>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.update(&LeadId(lead_id), submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.delete(&LeadId(lead_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn import_handler<R>(
    State(service): State<Arc<LeadService<R>>>,
    body: String,
) -> Response
where
    R: LeadRepository + 'static,
{
    match service.import_csv(Cursor::new(body.into_bytes())) {
        Ok(summary) => {
            let payload = json!({
                "message": "leads imported",
                "created": summary.created,
                "skipped": summary.skipped,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn download_handler<R>(State(service): State<Arc<LeadService<R>>>) -> Response
where
    R: LeadRepository + 'static,
{
    match service.export_csv() {
        Ok(rendered) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=leads.csv",
                ),
            ],
            rendered,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: LeadServiceError) -> Response {
    let status = match &error {
        LeadServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeadServiceError::Import(_) => StatusCode::BAD_REQUEST,
        LeadServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeadServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LeadServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
