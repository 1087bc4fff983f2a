//! HTTP request handlers.

pub mod root_handler;

pub use root_handler::{not_found, root_routes};
