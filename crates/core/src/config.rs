use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Effective runtime configuration. Precedence, lowest to highest:
/// built-in defaults, config file, `SHELFSCAN_*` environment variables,
/// programmatic overrides (CLI flags).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub scanner: ScannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ScannerConfig {
    pub queue_capacity: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub queue_capacity: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { path: PathBuf::from("catalog.toml") },
            scanner: ScannerConfig { queue_capacity: 32 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shelfscan.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = path;
            }
        }

        if let Some(scanner) = patch.scanner {
            if let Some(queue_capacity) = scanner.queue_capacity {
                self.scanner.queue_capacity = queue_capacity;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHELFSCAN_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("SHELFSCAN_SCANNER_QUEUE_CAPACITY") {
            self.scanner.queue_capacity =
                parse_usize("SHELFSCAN_SCANNER_QUEUE_CAPACITY", &value)?;
        }
        if let Some(value) = read_env("SHELFSCAN_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("SHELFSCAN_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = catalog_path;
        }
        if let Some(queue_capacity) = overrides.queue_capacity {
            self.scanner.queue_capacity = queue_capacity;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty".to_string(),
            ));
        }

        if self.scanner.queue_capacity == 0 || self.scanner.queue_capacity > 4096 {
            return Err(ConfigError::Validation(
                "scanner.queue_capacity must be in range 1..=4096".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shelfscan.toml"), PathBuf::from("config/shelfscan.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    scanner: Option<ScannerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ScannerPatch {
    queue_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let _guard = env_lock();
        clear_vars(&[
            "SHELFSCAN_CATALOG_PATH",
            "SHELFSCAN_SCANNER_QUEUE_CAPACITY",
            "SHELFSCAN_LOG_LEVEL",
            "SHELFSCAN_LOG_FORMAT",
        ]);

        let config = AppConfig::load(LoadOptions::default()).expect("defaults should validate");

        assert_eq!(config.catalog.path, PathBuf::from("catalog.toml"));
        assert_eq!(config.scanner.queue_capacity, 32);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn precedence_is_defaults_file_env_overrides() {
        let _guard = env_lock();

        env::set_var("SHELFSCAN_LOG_LEVEL", "warn");

        {
            let dir = TempDir::new().expect("tempdir");
            let path = dir.path().join("shelfscan.toml");
            fs::write(
                &path,
                r#"
[catalog]
path = "from-file.toml"

[logging]
level = "debug"
"#,
            )
            .expect("write config fixture");

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    catalog_path: Some(PathBuf::from("from-override.toml")),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .expect("config should load");

            assert_eq!(config.catalog.path, PathBuf::from("from-override.toml"));
            assert_eq!(config.logging.level, "warn", "env should win over file");
        }

        clear_vars(&["SHELFSCAN_LOG_LEVEL"]);
    }

    #[test]
    fn invalid_queue_capacity_env_is_a_typed_error() {
        let _guard = env_lock();

        env::set_var("SHELFSCAN_SCANNER_QUEUE_CAPACITY", "lots");

        let error = AppConfig::load(LoadOptions::default())
            .expect_err("non-numeric capacity should fail");

        clear_vars(&["SHELFSCAN_SCANNER_QUEUE_CAPACITY"]);
        assert!(matches!(
            error,
            ConfigError::InvalidEnvOverride { ref key, .. }
                if key == "SHELFSCAN_SCANNER_QUEUE_CAPACITY"
        ));
    }

    #[test]
    fn zero_queue_capacity_fails_validation() {
        let _guard = env_lock();

        env::set_var("SHELFSCAN_SCANNER_QUEUE_CAPACITY", "0");

        let error =
            AppConfig::load(LoadOptions::default()).expect_err("zero capacity should fail");

        clear_vars(&["SHELFSCAN_SCANNER_QUEUE_CAPACITY"]);
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("queue_capacity")
        ));
    }

    #[test]
    fn missing_required_config_file_is_reported() {
        let _guard = env_lock();

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent.toml");

        let error = AppConfig::load(LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("missing required file should fail");

        assert!(matches!(
            error,
            ConfigError::MissingConfigFile(ref missing) if missing == &path
        ));
    }
}
