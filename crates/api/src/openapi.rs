//! OpenAPI documentation configuration.
//!
//! Served as JSON at `/openapi.json` with Swagger UI at `/docs`.

use utoipa::{Modify, OpenApi};

use crate::handlers::root_handler;
use crate::{APP_DESCRIPTION, APP_NAME, APP_VERSION};

/// OpenAPI documentation for the Meander API
#[derive(OpenApi)]
#[openapi(
    paths(root_handler::root),
    components(schemas(root_handler::MessageResponse)),
    modifiers(&AppInfoAddon),
    tags(
        (name = "Status", description = "Service status")
    )
)]
pub struct ApiDoc;

/// Stamps the application name, version and description onto the document
struct AppInfoAddon;

impl Modify for AppInfoAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = APP_NAME.to_string();
        openapi.info.version = APP_VERSION.to_string();
        openapi.info.description = Some(APP_DESCRIPTION.to_string());
    }
}
