use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::scoring::{DEFAULT_RATING_WEIGHT, DEFAULT_SEED, DEFAULT_TOP_N};

pub const MAX_TOP_N: usize = 50;

/// Config keys paired with the environment variable that overrides them.
pub const ENV_BINDINGS: &[(&str, &str)] = &[
    ("server.bind_address", "RECOMMENDER_SERVER_BIND_ADDRESS"),
    ("server.port", "RECOMMENDER_SERVER_PORT"),
    ("server.graceful_shutdown_secs", "RECOMMENDER_SERVER_GRACEFUL_SHUTDOWN_SECS"),
    ("recommender.top_n", "RECOMMENDER_TOP_N"),
    ("recommender.seed", "RECOMMENDER_SEED"),
    ("recommender.rating_weight", "RECOMMENDER_RATING_WEIGHT"),
    ("recommender.catalog_path", "RECOMMENDER_CATALOG_PATH"),
    ("logging.level", "RECOMMENDER_LOGGING_LEVEL"),
    ("logging.format", "RECOMMENDER_LOGGING_FORMAT"),
];

/// Shorter names honoured when the bound variable is unset.
pub const ENV_ALIASES: &[(&str, &str)] =
    &[("logging.level", "RECOMMENDER_LOG_LEVEL"), ("logging.format", "RECOMMENDER_LOG_FORMAT")];

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub recommender: RecommenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommenderConfig {
    pub top_n: usize,
    /// `None` seeds every request from OS entropy.
    pub seed: Option<u64>,
    pub rating_weight: f64,
    /// Embedded demo catalog when unset.
    pub catalog_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub top_n: Option<usize>,
    /// `Some(None)` turns seeding off.
    pub seed: Option<Option<u64>>,
    pub catalog_path: Option<PathBuf>,
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
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            recommender: RecommenderConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            seed: Some(DEFAULT_SEED),
            rating_weight: DEFAULT_RATING_WEIGHT,
            catalog_path: None,
        }
    }
}

impl RecommenderConfig {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::demo()),
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
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("recommender.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(recommender) = patch.recommender {
            if let Some(top_n) = recommender.top_n {
                self.recommender.top_n = top_n;
            }
            if let Some(seed) = recommender.seed {
                self.recommender.seed = match seed {
                    SeedPatch::Fixed(seed) => Some(seed),
                    SeedPatch::Keyword(value) => parse_seed("recommender.seed", &value)?,
                };
            }
            if let Some(rating_weight) = recommender.rating_weight {
                self.recommender.rating_weight = rating_weight;
            }
            if let Some(catalog_path) = recommender.catalog_path {
                self.recommender.catalog_path = Some(catalog_path);
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

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for (key_path, env_key) in ENV_BINDINGS {
            let alias = ENV_ALIASES.iter().find(|(alias_path, _)| alias_path == key_path);
            let found = read_env(env_key).map(|value| (*env_key, value)).or_else(|| {
                alias.and_then(|(_, alias_key)| read_env(alias_key).map(|value| (*alias_key, value)))
            });

            if let Some((source_key, value)) = found {
                self.apply_env_value(key_path, source_key, value)?;
            }
        }

        Ok(())
    }

    fn apply_env_value(
        &mut self,
        key_path: &str,
        env_key: &str,
        value: String,
    ) -> Result<(), ConfigError> {
        match key_path {
            "server.bind_address" => self.server.bind_address = value,
            "server.port" => self.server.port = parse_u16(env_key, &value)?,
            "server.graceful_shutdown_secs" => {
                self.server.graceful_shutdown_secs = parse_u64(env_key, &value)?
            }
            "recommender.top_n" => self.recommender.top_n = parse_usize(env_key, &value)?,
            "recommender.seed" => self.recommender.seed = parse_seed(env_key, &value)?,
            "recommender.rating_weight" => {
                self.recommender.rating_weight = parse_f64(env_key, &value)?
            }
            "recommender.catalog_path" => {
                self.recommender.catalog_path = Some(PathBuf::from(value))
            }
            "logging.level" => self.logging.level = value,
            "logging.format" => self.logging.format = value.parse()?,
            other => {
                return Err(ConfigError::Validation(format!(
                    "environment binding `{env_key}` targets unknown key `{other}`"
                )))
            }
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(top_n) = overrides.top_n {
            self.recommender.top_n = top_n;
        }
        if let Some(seed) = overrides.seed {
            self.recommender.seed = seed;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.recommender.catalog_path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_recommender(&self.recommender)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Explicit path if it exists, otherwise `recommender.toml` or `config/recommender.toml`.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("recommender.toml"), PathBuf::from("config/recommender.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommender(recommender: &RecommenderConfig) -> Result<(), ConfigError> {
    if recommender.top_n == 0 || recommender.top_n > MAX_TOP_N {
        return Err(ConfigError::Validation(format!(
            "recommender.top_n must be in range 1..={MAX_TOP_N}"
        )));
    }

    let weight = recommender.rating_weight;
    if !weight.is_finite() || weight <= 0.0 || weight > DEFAULT_RATING_WEIGHT {
        return Err(ConfigError::Validation(format!(
            "recommender.rating_weight must be in range (0, {DEFAULT_RATING_WEIGHT}] so scores stay below 1.0"
        )));
    }

    if let Some(path) = &recommender.catalog_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "recommender.catalog_path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| invalid_override(key, value))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| invalid_override(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

/// Accepts a number or one of `off`, `none`, `entropy`.
pub fn parse_seed(key: &str, value: &str) -> Result<Option<u64>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "none" | "entropy" => Ok(None),
        other => other.parse::<u64>().map(Some).map_err(|_| invalid_override(key, value)),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    recommender: Option<RecommenderPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommenderPatch {
    top_n: Option<usize>,
    seed: Option<SeedPatch>,
    rating_weight: Option<f64>,
    catalog_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeedPatch {
    Fixed(u64),
    Keyword(String),
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
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, ENV_ALIASES, ENV_BINDINGS,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn clear_bound_vars() {
        for (_, var) in ENV_BINDINGS.iter().chain(ENV_ALIASES) {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn write_config(dir: &TempDir, contents: &str) -> Result<PathBuf, String> {
        let path = dir.path().join("recommender.toml");
        fs::write(&path, contents).map_err(|err| err.to_string())?;
        Ok(path)
    }

    #[test]
    fn defaults_match_dashboard_behaviour() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.recommender.top_n == 4, "default top_n should be 4")?;
        ensure(config.recommender.seed == Some(42), "default seed should be 42")?;
        ensure(config.recommender.catalog_path.is_none(), "demo catalog should be the default")?;
        ensure(config.server.port == 8080, "default port should be 8080")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        env::set_var("TEST_RECOMMENDER_CATALOG", "/srv/catalog.toml");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = write_config(
                &dir,
                r#"
[recommender]
catalog_path = "${TEST_RECOMMENDER_CATALOG}"
seed = 7
"#,
            )?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.recommender.catalog_path == Some(PathBuf::from("/srv/catalog.toml")),
                "catalog path should be interpolated from environment",
            )?;
            ensure(config.recommender.seed == Some(7), "file seed should be applied")
        })();

        clear_vars(&["TEST_RECOMMENDER_CATALOG"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = write_config(&dir, "[server]\nbind_address = \"${TEST_UNSET_BIND}\"\n")?;

        let result =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        ensure(
            matches!(result, Err(ConfigError::MissingEnvInterpolation { ref var }) if var == "TEST_UNSET_BIND"),
            "unset interpolation variable should be named in the error",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        env::set_var("RECOMMENDER_LOG_LEVEL", "warn");
        env::set_var("RECOMMENDER_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["RECOMMENDER_LOG_LEVEL", "RECOMMENDER_LOG_FORMAT"]);
        result
    }

    #[test]
    fn every_env_binding_is_applied() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let samples = [
            ("server.bind_address", "0.0.0.0"),
            ("server.port", "9000"),
            ("server.graceful_shutdown_secs", "3"),
            ("recommender.top_n", "7"),
            ("recommender.seed", "9"),
            ("recommender.rating_weight", "0.1"),
            ("recommender.catalog_path", "/srv/catalog.toml"),
            ("logging.level", "debug"),
            ("logging.format", "json"),
        ];
        for (key_path, var) in ENV_BINDINGS {
            let value = samples
                .iter()
                .find(|(sample_key, _)| sample_key == key_path)
                .map(|(_, value)| *value)
                .ok_or_else(|| format!("no sample value for `{key_path}`"))?;
            env::set_var(var, value);
        }

        let result = AppConfig::load(LoadOptions::default());
        clear_bound_vars();
        let config = result.map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.server.bind_address == "0.0.0.0", "bind address should come from env")?;
        ensure(config.server.port == 9000, "port should come from env")?;
        ensure(config.server.graceful_shutdown_secs == 3, "grace period should come from env")?;
        ensure(config.recommender.top_n == 7, "top_n should come from env")?;
        ensure(config.recommender.seed == Some(9), "seed should come from env")?;
        ensure(config.recommender.rating_weight == 0.1, "rating weight should come from env")?;
        ensure(
            config.recommender.catalog_path == Some(PathBuf::from("/srv/catalog.toml")),
            "catalog path should come from env",
        )?;
        ensure(config.logging.level == "debug", "log level should come from env")?;
        ensure(matches!(config.logging.format, LogFormat::Json), "log format should come from env")
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        env::set_var("RECOMMENDER_TOP_N", "6");
        env::set_var("RECOMMENDER_SERVER_PORT", "9090");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = write_config(
                &dir,
                r#"
[server]
port = 8181
bind_address = "0.0.0.0"

[recommender]
top_n = 3

[logging]
level = "warn"
"#,
            )?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    port: Some(7070),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.server.port == 7070, "override port should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.recommender.top_n == 6, "env top_n should win over file")?;
            ensure(config.server.bind_address == "0.0.0.0", "file bind address should apply")
        })();

        clear_vars(&["RECOMMENDER_TOP_N", "RECOMMENDER_SERVER_PORT"]);
        result
    }

    #[test]
    fn seed_can_be_disabled_from_env_and_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = write_config(&dir, "[recommender]\nseed = \"off\"\n")?;
        let from_file =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .map_err(|err| format!("config load failed: {err}"))?;
        ensure(from_file.recommender.seed.is_none(), "file keyword should disable seeding")?;

        env::set_var("RECOMMENDER_SEED", "entropy");
        let from_env = AppConfig::load(LoadOptions::default());
        clear_vars(&["RECOMMENDER_SEED"]);
        let from_env = from_env.map_err(|err| format!("config load failed: {err}"))?;
        ensure(from_env.recommender.seed.is_none(), "env keyword should disable seeding")
    }

    #[test]
    fn invalid_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        env::set_var("RECOMMENDER_SEED", "forty-two");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["RECOMMENDER_SEED"]);

        ensure(
            matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "RECOMMENDER_SEED"),
            "malformed seed should be reported as an invalid override",
        )
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let zero_top_n = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { top_n: Some(0), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        });
        ensure(
            matches!(zero_top_n, Err(ConfigError::Validation(ref message)) if message.contains("recommender.top_n")),
            "validation failure should mention recommender.top_n",
        )?;

        env::set_var("RECOMMENDER_RATING_WEIGHT", "0.5");
        let heavy_weight = AppConfig::load(LoadOptions::default());
        clear_vars(&["RECOMMENDER_RATING_WEIGHT"]);
        ensure(
            matches!(heavy_weight, Err(ConfigError::Validation(ref message)) if message.contains("rating_weight")),
            "validation failure should mention rating_weight",
        )
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_bound_vars();

        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/recommender.toml")),
            require_file: true,
            ..LoadOptions::default()
        });
        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should fail",
        )
    }
}
