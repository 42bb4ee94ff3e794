use shelfscan_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shelfscan_core::load_path;

use crate::commands::CommandResult;

/// Validates the catalog resource end to end: config, file presence, parse,
/// field extraction, duplicate detection. Exit 2 on any load failure.
pub fn run(overrides: ConfigOverrides) -> CommandResult {
    let config = match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "check",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    match load_path(&config.catalog.path) {
        Ok(products) => CommandResult::success(
            "check",
            format!(
                "catalog `{}` loaded with {} record(s)",
                config.catalog.path.display(),
                products.len()
            ),
        ),
        Err(error) => CommandResult::failure("check", error.class(), error.to_string(), 2),
    }
}
