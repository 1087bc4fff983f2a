//! Route configuration.

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{not_found, root_routes};
use crate::middleware::cors_layer;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Status
        .merge(root_routes())
        // API documentation
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Global middleware, CORS outermost so preflights never reach routing
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
