use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;

use shelfscan_core::config::{AppConfig, ConfigOverrides, LoadOptions};

pub fn run(overrides: ConfigOverrides) -> String {
    let config = match AppConfig::load(LoadOptions {
        overrides: overrides.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        field_source(
            "catalog.path",
            overrides.catalog_path.as_ref().map(|_| "--catalog"),
            "SHELFSCAN_CATALOG_PATH",
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "scanner.queue_capacity",
        &config.scanner.queue_capacity.to_string(),
        field_source(
            "scanner.queue_capacity",
            overrides.queue_capacity.map(|_| "--queue-capacity"),
            "SHELFSCAN_SCANNER_QUEUE_CAPACITY",
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            overrides.log_level.as_ref().map(|_| "--log-level"),
            "SHELFSCAN_LOG_LEVEL",
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source(
            "logging.format",
            overrides.log_format.map(|_| "--log-format"),
            "SHELFSCAN_LOG_FORMAT",
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.join("\n")
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("  {key} = {value}  [{source}]")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shelfscan.toml"), PathBuf::from("config/shelfscan.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    override_flag: Option<&str>,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Overrides sit above env in the precedence chain, so an active flag
    // wins the attribution even when the env var is also set.
    if let Some(flag) = override_flag {
        return format!("override ({flag})");
    }

    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(doc: &Value, key_path: &str) -> bool {
    let mut current = doc;
    for segment in key_path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
