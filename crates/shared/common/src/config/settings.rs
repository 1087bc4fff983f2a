//! Application settings loaded from environment variables.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_ENVIRONMENT, DEFAULT_ENV_FILE, DEFAULT_LOG_LEVEL,
    DEFAULT_REDIS_URL, PRODUCTION_ENVIRONMENT, SETTINGS_FIELDS,
};
use crate::error::ConfigError;

/// Application configuration.
///
/// Resolved once at startup and read-only afterwards. Fields are private
/// so nothing can change a loaded value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    tfl_app_id: Option<String>,
    tfl_app_key: Option<String>,
    database_url: String,
    redis_url: String,
    environment: String,
    log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tfl_app_id: None,
            tfl_app_key: None,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("tfl_app_id", &self.tfl_app_id)
            .field("tfl_app_key", &self.tfl_app_key.as_ref().map(|_| "[REDACTED]"))
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment, falling back to `.env`
    /// in the working directory and then to the built-in defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `.env` exists but cannot be read, or if a
    /// value cannot be coerced to its field type.
    pub fn load() -> Result<Self, ConfigError> {
        let vars = unicode_vars(env::vars_os())?;
        Self::from_sources(Some(Path::new(DEFAULT_ENV_FILE)), vars)
    }

    /// Like [`Settings::load`], but hands back the skipped env file lines
    /// instead of logging them, for callers that set up logging afterwards.
    pub fn load_reporting() -> Result<(Self, Vec<SkippedLine>), ConfigError> {
        let vars = unicode_vars(env::vars_os())?;
        Self::from_sources_reporting(Some(Path::new(DEFAULT_ENV_FILE)), vars)
    }

    /// Resolve settings from an explicit set of variables, without an env file.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self::from_sources(None, vars)
    }

    /// Resolve settings from an optional env file and a set of variables.
    ///
    /// Names match case-insensitively. `vars` take precedence over entries
    /// in the env file; a missing env file is skipped.
    pub fn from_sources<I>(env_file: Option<&Path>, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (settings, skipped) = Self::from_sources_reporting(env_file, vars)?;
        for line in &skipped {
            line.warn();
        }
        tracing::debug!(?settings, "Settings resolved");

        Ok(settings)
    }

    /// Resolve settings as [`Settings::from_sources`] does, returning the
    /// malformed env file lines that were skipped.
    pub fn from_sources_reporting<I>(
        env_file: Option<&Path>,
        vars: I,
    ) -> Result<(Self, Vec<SkippedLine>), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut skipped = Vec::new();
        let mut resolved = match env_file {
            Some(path) => fold_keys(read_env_file(path, &mut skipped)?),
            None => BTreeMap::new(),
        };
        resolved.extend(fold_keys(vars));

        let settings: Settings = envy::from_iter(resolved)?;
        Ok((settings, skipped))
    }

    /// TfL application id, if configured.
    pub fn tfl_app_id(&self) -> Option<&str> {
        self.tfl_app_id.as_deref()
    }

    /// TfL application key, if configured.
    pub fn tfl_app_key(&self) -> Option<&str> {
        self.tfl_app_key.as_deref()
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }

    /// Deployment environment name (e.g. `development`, `production`).
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Log verbosity used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Whether the deployment environment is production.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT)
    }
}

fn is_settings_field(name: &str) -> bool {
    SETTINGS_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
}

/// Lowercase every recognised name and drop the rest.
///
/// When one name appears in several casings, the lexically first spelling
/// wins, so `ENVIRONMENT` beats `Environment` and `environment`.
fn fold_keys<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut sorted: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(key, _)| is_settings_field(key))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut folded = BTreeMap::new();
    for (key, value) in sorted {
        folded.entry(key.to_lowercase()).or_insert(value);
    }
    folded
}

/// Env file line that could not be parsed and was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub path: PathBuf,
    pub line: String,
    /// Byte offset of the parse error within the line
    pub index: usize,
}

impl SkippedLine {
    /// Report the skipped line through `tracing`.
    pub fn warn(&self) {
        tracing::warn!(
            path = %self.path.display(),
            line = %self.line,
            index = self.index,
            "Skipping malformed env file line"
        );
    }
}

/// Read `KEY=value` pairs from the env file; a missing file yields nothing.
fn read_env_file(
    path: &Path,
    skipped: &mut Vec<SkippedLine>,
) -> Result<Vec<(String, String)>, ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(Vec::new()),
        Err(e) => return Err(ConfigError::EnvFile(e)),
    };

    let mut vars = Vec::new();
    for entry in entries {
        match entry {
            Ok(pair) => vars.push(pair),
            Err(dotenvy::Error::LineParse(line, index)) => skipped.push(SkippedLine {
                path: path.to_path_buf(),
                line,
                index,
            }),
            Err(e) => return Err(ConfigError::EnvFile(e)),
        }
    }

    Ok(vars)
}

/// Keep the process variables representable as strings.
///
/// A non-unicode value under a settings name cannot become a `String`
/// field and is rejected; anything else that is not unicode is ignored.
fn unicode_vars<I>(vars: I) -> Result<Vec<(String, String)>, ConfigError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut unicode = Vec::new();
    for (key, value) in vars {
        let Ok(key) = key.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => unicode.push((key, value)),
            Err(_) if is_settings_field(&key) => {
                return Err(ConfigError::Validation(format!(
                    "{} is not valid unicode",
                    key
                )));
            }
            Err(_) => {}
        }
    }
    Ok(unicode)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::process;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static ENV_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Env file in the temp dir, removed on drop
    struct TempEnvFile(PathBuf);

    impl TempEnvFile {
        fn new(contents: &str) -> Self {
            let n = ENV_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
            let name = format!("meander-settings-{}-{}.env", process::id(), n);
            let path = env::temp_dir().join(name);
            fs::write(&path, contents).unwrap();
            Self(path)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempEnvFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn missing_env_file() -> PathBuf {
        env::temp_dir().join(format!("meander-missing-{}.env", process::id()))
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let missing = missing_env_file();
        let settings = Settings::from_sources(Some(missing.as_path()), Vec::new()).unwrap();

        assert_eq!(settings.environment(), "development");
        assert_eq!(settings.log_level(), "info");
        assert_eq!(settings.database_url(), "sqlite:///./dev.db");
        assert_eq!(settings.redis_url(), "redis://localhost:6379");
        assert_eq!(settings.tfl_app_id(), None);
        assert_eq!(settings.tfl_app_key(), None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_environment_variable_overrides_default() {
        let settings = Settings::from_vars(vars(&[("ENVIRONMENT", "production")])).unwrap();

        assert_eq!(settings.environment(), "production");
        assert_eq!(settings.log_level(), "info");
    }

    #[test]
    fn test_name_lookup_ignores_case() {
        for name in ["ENVIRONMENT", "Environment", "environment", "eNvIrOnMeNt"] {
            let settings = Settings::from_vars(vars(&[(name, "production")])).unwrap();
            assert_eq!(settings.environment(), "production", "name {}", name);
        }
    }

    #[test]
    fn test_uppercase_spelling_wins_over_other_casings() {
        let settings = Settings::from_vars(vars(&[
            ("environment", "staging"),
            ("ENVIRONMENT", "production"),
            ("Environment", "qa"),
        ]))
        .unwrap();

        assert_eq!(settings.environment(), "production");
    }

    #[test]
    fn test_all_fields_are_read() {
        let settings = Settings::from_vars(vars(&[
            ("TFL_APP_ID", "meander"),
            ("TFL_APP_KEY", "secret-key"),
            ("DATABASE_URL", "postgres://db/meander"),
            ("REDIS_URL", "redis://cache:6379"),
            ("ENVIRONMENT", "staging"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(settings.tfl_app_id(), Some("meander"));
        assert_eq!(settings.tfl_app_key(), Some("secret-key"));
        assert_eq!(settings.database_url(), "postgres://db/meander");
        assert_eq!(settings.redis_url(), "redis://cache:6379");
        assert_eq!(settings.environment(), "staging");
        assert_eq!(settings.log_level(), "debug");
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let settings = Settings::from_vars(vars(&[
            ("PATH", "/usr/bin"),
            ("HOME", "/root"),
            ("LOG_LEVEL", "warn"),
        ]))
        .unwrap();

        assert_eq!(settings.log_level(), "warn");
        assert_eq!(settings.environment(), "development");
    }

    #[test]
    fn test_env_file_seeds_unset_fields() {
        let file = TempEnvFile::new("LOG_LEVEL=debug\nredis_url=redis://cache:6379\n");
        let settings = Settings::from_sources(Some(file.path()), Vec::new()).unwrap();

        assert_eq!(settings.log_level(), "debug");
        assert_eq!(settings.redis_url(), "redis://cache:6379");
        assert_eq!(settings.environment(), "development");
    }

    #[test]
    fn test_process_variables_win_over_env_file() {
        let file = TempEnvFile::new("ENVIRONMENT=staging\nLOG_LEVEL=debug\n");
        let settings =
            Settings::from_sources(Some(file.path()), vars(&[("environment", "production")]))
                .unwrap();

        assert_eq!(settings.environment(), "production");
        assert_eq!(settings.log_level(), "debug");
    }

    #[test]
    fn test_malformed_env_file_lines_are_skipped() {
        let file = TempEnvFile::new(
            "LOG_LEVEL=debug\nthis is not valid\nREDIS_URL=redis://cache:6379\n",
        );
        let settings = Settings::from_sources(Some(file.path()), Vec::new()).unwrap();

        assert_eq!(settings.log_level(), "debug");
        assert_eq!(settings.redis_url(), "redis://cache:6379");
    }

    #[test]
    fn test_skipped_lines_are_reported() {
        let file = TempEnvFile::new("LOG_LEVEL=debug\nthis is not valid\n");
        let (settings, skipped) =
            Settings::from_sources_reporting(Some(file.path()), Vec::new()).unwrap();

        assert_eq!(settings.log_level(), "debug");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, file.path());
        assert!(skipped[0].line.contains("this is not valid"));
    }

    #[test]
    fn test_clean_env_file_reports_nothing() {
        let file = TempEnvFile::new("ENVIRONMENT=staging\n");
        let (_, skipped) =
            Settings::from_sources_reporting(Some(file.path()), Vec::new()).unwrap();

        assert!(skipped.is_empty());
    }

    #[test]
    fn test_unreadable_env_file_is_an_error() {
        let n = ENV_FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = env::temp_dir().join(format!("meander-env-dir-{}-{}", process::id(), n));
        fs::create_dir_all(&dir).unwrap();

        let result = Settings::from_sources(Some(dir.as_path()), Vec::new());
        let _ = fs::remove_dir(&dir);

        assert!(matches!(result, Err(ConfigError::EnvFile(_))));
    }

    #[test]
    fn test_loading_twice_yields_equal_settings() {
        let file = TempEnvFile::new("TFL_APP_ID=meander\n");
        let input = vars(&[("LOG_LEVEL", "debug")]);

        let first = Settings::from_sources(Some(file.path()), input.clone()).unwrap();
        let second = Settings::from_sources(Some(file.path()), input).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings::from_vars(vars(&[
            ("TFL_APP_ID", "meander"),
            ("TFL_APP_KEY", "secret-key"),
            ("DATABASE_URL", "postgres://user:hunter2@db/meander"),
        ]))
        .unwrap();
        let output = format!("{:?}", settings);

        assert!(output.contains("meander"));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("secret-key"));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn test_is_production_ignores_case() {
        let production = Settings::from_vars(vars(&[("ENVIRONMENT", "Production")])).unwrap();

        assert!(production.is_production());
        assert!(!Settings::default().is_production());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_settings_value_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let raw = vec![(
            OsString::from("LOG_LEVEL"),
            OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        )];
        let result = unicode_vars(raw);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_unrelated_value_is_ignored() {
        use std::os::unix::ffi::OsStringExt;

        let raw = vec![
            (OsString::from("SOME_BLOB"), OsString::from_vec(vec![0x80])),
            (OsString::from("LOG_LEVEL"), OsString::from("trace")),
        ];
        let unicode = unicode_vars(raw).unwrap();

        assert_eq!(unicode, vec![("LOG_LEVEL".to_string(), "trace".to_string())]);
    }
}
