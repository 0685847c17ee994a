use std::env;
use std::fs;
use std::path::Path;

use recommender_core::config::{
    resolve_config_path, AppConfig, LoadOptions, ENV_ALIASES, ENV_BINDINGS,
};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG_FAILURE};

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG_FAILURE,
            )
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, env_key) in ENV_BINDINGS {
        lines.push(render_line(
            key_path,
            &effective_value(&config, key_path),
            field_source(
                key_path,
                Some(env_key),
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        ));
    }

    CommandResult::output(lines.join("\n"))
}

fn effective_value(config: &AppConfig, key_path: &str) -> String {
    match key_path {
        "server.bind_address" => config.server.bind_address.clone(),
        "server.port" => config.server.port.to_string(),
        "server.graceful_shutdown_secs" => config.server.graceful_shutdown_secs.to_string(),
        "recommender.top_n" => config.recommender.top_n.to_string(),
        "recommender.seed" => config
            .recommender
            .seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "<entropy>".to_string()),
        "recommender.rating_weight" => config.recommender.rating_weight.to_string(),
        "recommender.catalog_path" => config
            .recommender
            .catalog_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<embedded demo catalog>".to_string()),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format),
        _ => "<unknown>".to_string(),
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let alias_key =
        ENV_ALIASES.iter().find(|(alias_path, _)| *alias_path == key_path).map(|(_, key)| *key);
    for env_key in env_key.into_iter().chain(alias_key) {
        if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
            return format!("env ({env_key})");
        }
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

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
