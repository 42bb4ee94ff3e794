use serde_json::json;

use shelfscan_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shelfscan_core::{load_path, Catalog};

use crate::commands::CommandResult;

/// One-shot point query against the catalog. Absence is a normal library
/// outcome; the CLI maps it to exit 1 so scripts can branch on it, and
/// keeps exit 2 for load failures.
pub fn run(identifier: &str, overrides: ConfigOverrides) -> CommandResult {
    let config = match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "lookup",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let catalog = match load_path(&config.catalog.path) {
        Ok(products) => Catalog::new(products),
        Err(error) => {
            return CommandResult::failure("lookup", error.class(), error.to_string(), 2);
        }
    };

    match catalog.lookup(identifier) {
        Some(product) => CommandResult::success_with_data(
            "lookup",
            format!("found catalog record for `{identifier}`"),
            json!({
                "id": product.id.as_str(),
                "name": product.name,
                "price": product.price,
                "weight": product.weight,
            }),
        ),
        None => CommandResult::failure(
            "lookup",
            "not_found",
            format!("no catalog record matches `{identifier}`"),
            1,
        ),
    }
}
