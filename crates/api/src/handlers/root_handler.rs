//! Service status handlers.

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use common::AppError;

use crate::state::AppState;
use crate::APP_NAME;

/// Plain status message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Meander API is running")]
    pub message: String,
}

/// Create status routes.
pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(root))
}

/// Report that the API is up
#[utoipa::path(
    get,
    path = "/",
    tag = "Status",
    responses(
        (status = 200, description = "API is running", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("{} is running", APP_NAME),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
