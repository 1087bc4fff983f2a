//! Shared building blocks for the Meander services.
//!
//! This crate provides:
//! - Settings resolution from the environment and an optional `.env` file
//! - Unified error handling for HTTP responses

pub mod config;
pub mod error;

pub use config::{Settings, SkippedLine};
pub use error::{AppError, AppResult, ConfigError};
