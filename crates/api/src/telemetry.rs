//! Tracing subscriber setup.

use common::Settings;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Filter used when the configured one cannot be parsed
const FALLBACK_FILTER: &str = "info";

/// A filter that was replaced by the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFilter {
    pub directive: String,
    pub reason: String,
}

/// Initialize tracing subscriber.
///
/// Verbose mode forces `debug`; otherwise `RUST_LOG` wins over the
/// configured log level. Production logs are emitted as JSON lines.
pub fn init_tracing(verbose: bool, settings: &Settings) {
    let (env_filter, rejected) = resolve_filter(
        verbose,
        std::env::var("RUST_LOG").ok(),
        settings.log_level(),
    );

    let json = settings.is_production();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();

    if let Some(rejected) = rejected {
        tracing::warn!(
            directive = %rejected.directive,
            reason = %rejected.reason,
            "Invalid log filter, falling back to {}",
            FALLBACK_FILTER
        );
    }
}

/// Build the filter, falling back to `info` when the directive is unusable.
pub fn resolve_filter(
    verbose: bool,
    rust_log: Option<String>,
    log_level: &str,
) -> (EnvFilter, Option<RejectedFilter>) {
    let rejected = match filter_directive(verbose, rust_log, log_level) {
        Ok(directive) => match EnvFilter::try_new(&directive) {
            Ok(filter) => return (filter, None),
            Err(e) => RejectedFilter {
                directive,
                reason: e.to_string(),
            },
        },
        Err(rejected) => rejected,
    };

    (EnvFilter::new(FALLBACK_FILTER), Some(rejected))
}

/// Pick the filter directive from the CLI flag, `RUST_LOG` and settings.
///
/// `RUST_LOG` may hold any filter syntax. The configured log level must be
/// a plain level name, since a bare word would otherwise parse as a target.
pub fn filter_directive(
    verbose: bool,
    rust_log: Option<String>,
    log_level: &str,
) -> Result<String, RejectedFilter> {
    if verbose {
        return Ok("debug".to_string());
    }

    match rust_log {
        Some(filter) if !filter.trim().is_empty() => Ok(filter),
        _ => {
            let level = normalize_level(log_level);
            match level.parse::<LevelFilter>() {
                Ok(_) => Ok(level),
                Err(e) => Err(RejectedFilter {
                    directive: level,
                    reason: e.to_string(),
                }),
            }
        }
    }
}

/// Map server-style level names onto tracing levels.
fn normalize_level(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    match level.as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        _ => level,
    }
}
