//! Configuration defaults.
//!
//! Every settings field that is not read from the environment falls back
//! to one of these values.

// =============================================================================
// Sources
// =============================================================================

/// Env file consulted by `Settings::load`, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Lowercase names of every recognised settings variable
pub const SETTINGS_FIELDS: [&str; 6] = [
    "tfl_app_id",
    "tfl_app_key",
    "database_url",
    "redis_url",
    "environment",
    "log_level",
];

// =============================================================================
// Storage
// =============================================================================

/// Default database connection URL (for development)
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./dev.db";

/// Default Redis URL (for development)
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

// =============================================================================
// Runtime
// =============================================================================

/// Default deployment environment name
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Environment name that switches on production behaviour
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// Default log verbosity
pub const DEFAULT_LOG_LEVEL: &str = "info";
