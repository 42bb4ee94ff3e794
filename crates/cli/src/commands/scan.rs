use std::io::{self, BufRead};
use std::sync::Arc;

use serde_json::json;

use shelfscan_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shelfscan_core::{load_path, Catalog};
use shelfscan_scanner::{ScanPipeline, ScriptedScanSource, TracingSink};

use crate::commands::CommandResult;

/// Runs decoded payloads through the full scan pipeline with the tracing
/// sink. Payloads come from the arguments, or from stdin lines when no
/// arguments are given.
pub fn run(payloads: Vec<String>, overrides: ConfigOverrides) -> CommandResult {
    let config = match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "scan",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    init_logging(&config);

    let catalog = match load_path(&config.catalog.path) {
        Ok(products) => Arc::new(Catalog::new(products)),
        Err(error) => {
            return CommandResult::failure("scan", error.class(), error.to_string(), 2);
        }
    };

    let payloads = if payloads.is_empty() {
        match read_stdin_payloads() {
            Ok(lines) => lines,
            Err(error) => {
                return CommandResult::failure(
                    "scan",
                    "stdin_read",
                    format!("failed to read payloads from stdin: {error}"),
                    3,
                );
            }
        }
    } else {
        payloads
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "scan",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let pipeline = ScanPipeline::new(catalog, config.scanner.queue_capacity);
    let source = Arc::new(ScriptedScanSource::new(payloads));
    let sink = Arc::new(TracingSink);

    match runtime.block_on(pipeline.run(source, sink)) {
        Ok(summary) => CommandResult::success_with_data(
            "scan",
            format!(
                "processed {} scan(s): {} found, {} not found",
                summary.processed, summary.found, summary.not_found
            ),
            json!({
                "processed": summary.processed,
                "found": summary.found,
                "not_found": summary.not_found,
            }),
        ),
        Err(error) => CommandResult::failure("scan", "pipeline", error.to_string(), 4),
    }
}

fn init_logging(config: &AppConfig) {
    use shelfscan_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init: the scan command may run more than once in-process (tests).
    let _ = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
}

fn read_stdin_payloads() -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
