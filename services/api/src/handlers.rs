//! Axum Handlers for the REST API
//!
//! Read-only course endpoints. `utoipa` doc comments generate the OpenAPI
//! documentation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    models::{CourseDocument, ErrorResponse, RootMessage},
    state::AppState,
};

pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { detail })).into_response()
            }
        }
    }
}

/// Liveness message.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = RootMessage)
    )
)]
pub async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: "MorbrorAppen Backend is running!".to_string(),
    })
}

/// List every course in the catalog.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "List of courses", body = [CourseDocument])
    )
)]
pub async fn list_courses(State(state): State<Arc<AppState>>) -> Json<Vec<CourseDocument>> {
    Json(state.catalog.documents().to_vec())
}

/// Get a specific course by its ID.
#[utoipa::path(
    get,
    path = "/courses/{id}",
    responses(
        (status = 200, description = "Course details", body = CourseDocument),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "Course ID")
    )
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let course = state.catalog.get(&id).cloned().ok_or_else(|| {
        debug!(course_id = %id, "Unknown course requested");
        ApiError::NotFound("Course not found".to_string())
    })?;

    Ok((StatusCode::OK, Json(course)))
}
