//! Meander API
//!
//! HTTP backend for the London itinerary planner.
//!
//! # Layout
//!
//! - **cli**: command-line arguments
//! - **commands**: CLI command implementations
//! - **handlers**: HTTP request handlers
//! - **middleware**: CORS policy
//! - **routes**: router assembly
//! - **state**: shared handler state
//! - **openapi**: generated API document
//! - **telemetry**: tracing subscriber setup
//!
//! Settings come from the `common` crate and are injected through
//! [`AppState`].

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use common::{AppError, AppResult, Settings};
pub use routes::create_router;
pub use state::AppState;

/// Application name reported by the API and its OpenAPI document.
pub const APP_NAME: &str = "Meander API";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-line description of the application.
pub const APP_DESCRIPTION: &str = "Backend API for London itinerary planner";
