pub mod catalog;
pub mod config;
pub mod doctor;
pub mod metrics;
pub mod recommend;

use recommender_core::config::{AppConfig, LoadOptions};
use recommender_core::Catalog;
use serde::Serialize;

pub const EXIT_CONFIG_FAILURE: u8 = 2;
pub const EXIT_CATALOG_FAILURE: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn output(output: String) -> Self {
        Self { exit_code: 0, output }
    }
}

/// Loads config and catalog, or the failure result the command should print.
pub(crate) fn load_catalog(
    command: &str,
    options: LoadOptions,
) -> Result<(AppConfig, Catalog), CommandResult> {
    let config = AppConfig::load(options).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG_FAILURE)
    })?;
    let catalog = config.recommender.load_catalog().map_err(|error| {
        CommandResult::failure(command, "catalog_load", error.to_string(), EXIT_CATALOG_FAILURE)
    })?;
    Ok((config, catalog))
}

pub(crate) fn to_pretty_json<T: Serialize>(command: &str, value: &T) -> CommandResult {
    match serde_json::to_string_pretty(value) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure(command, "serialization", error.to_string(), 1),
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
