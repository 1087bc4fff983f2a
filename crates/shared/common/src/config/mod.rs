//! Application configuration module
//!
//! Resolves [`Settings`] from the process environment and an optional
//! `.env` file.

mod constants;
mod settings;

pub use crate::error::ConfigError;
pub use constants::*;
pub use settings::{Settings, SkippedLine};
