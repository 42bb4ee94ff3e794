use serde::Serialize;

use shelfscan_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shelfscan_core::load_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, overrides: ConfigOverrides) -> String {
    let report = build_report(overrides);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(overrides: ConfigOverrides) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_resource(&config));
            checks.push(check_catalog_load(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_resource",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_load",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_resource(config: &AppConfig) -> DoctorCheck {
    if config.catalog.path.is_file() {
        DoctorCheck {
            name: "catalog_resource",
            status: CheckStatus::Pass,
            details: format!("catalog resource present at `{}`", config.catalog.path.display()),
        }
    } else {
        DoctorCheck {
            name: "catalog_resource",
            status: CheckStatus::Fail,
            details: format!("catalog resource missing at `{}`", config.catalog.path.display()),
        }
    }
}

fn check_catalog_load(config: &AppConfig) -> DoctorCheck {
    match load_path(&config.catalog.path) {
        Ok(products) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Pass,
            details: format!("catalog loads cleanly with {} record(s)", products.len()),
        },
        Err(error) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: format!("{} ({})", error, error.class()),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let status = match check.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "SKIP",
        };
        lines.push(format!("  [{status}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}

fn escape_json(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}
