//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `config` - Show the resolved settings

pub mod args;

pub use args::{Cli, Commands, ServeArgs};
