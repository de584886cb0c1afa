use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::sources::FileConfig;
use super::{
    Config, ConfigLoadError, ConfigMetadata, ConfigWarnings, CorsConfig,
    DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DatabaseConfig,
    PlayerStatusConfig, ServerConfig,
};

pub const CONFIG_PATH_VAR: &str = "REELMARK_CONFIG";

#[derive(Debug, Clone, Default)]
pub struct ConfigLoaderOptions {
    /// TOML file to read. Falls back to `REELMARK_CONFIG` when unset.
    pub config_path: Option<PathBuf>,
    /// `.env` file to load. Falls back to `./.env` if present.
    pub env_file: Option<PathBuf>,
}

/// Loaded configuration plus non-fatal findings worth logging.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
    /// Replaces the process environment when set.
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options, env: None }
    }

    /// Reads variables from `env` only; `.env` files are ignored.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;

        let config_path = self
            .options
            .config_path
            .clone()
            .or_else(|| self.var(CONFIG_PATH_VAR).map(PathBuf::from));
        let file = match &config_path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let dev_mode = self
            .bool_var("DEV_MODE")?
            .or(file.dev_mode)
            .unwrap_or(false);

        let server = ServerConfig {
            host: self
                .var("SERVER_HOST")
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match self.var("SERVER_PORT") {
                Some(raw) => parse_number("SERVER_PORT", &raw)?,
                None => file.server.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let database = DatabaseConfig {
            url: self.var("DATABASE_URL").or(file.database.url),
            max_connections: match self.var("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => parse_number("DATABASE_MAX_CONNECTIONS", &raw)?,
                None => file
                    .database
                    .max_connections
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            },
            run_migrations: self
                .bool_var("RUN_MIGRATIONS")?
                .or(file.database.run_migrations)
                .unwrap_or(true),
        };

        let cors = CorsConfig {
            allowed_origins: self
                .var("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_csv(&raw))
                .or(file.cors.allowed_origins)
                .unwrap_or_default(),
        };

        let defaults = PlayerStatusConfig::default();
        let player_status = PlayerStatusConfig {
            ttl: self
                .duration_setting(
                    "PLAYER_STATUS_TTL",
                    file.player_status.ttl.as_deref(),
                )?
                .unwrap_or(defaults.ttl),
            sweep_interval: self
                .duration_setting(
                    "PLAYER_STATUS_SWEEP_INTERVAL",
                    file.player_status.sweep_interval.as_deref(),
                )?
                .unwrap_or(defaults.sweep_interval),
        };

        if database.url.is_none() && !dev_mode {
            return Err(ConfigLoadError::MissingDatabaseUrl);
        }
        if player_status.sweep_interval.is_zero() {
            return Err(ConfigLoadError::InvalidValue {
                key: "PLAYER_STATUS_SWEEP_INTERVAL",
                value: "0s".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let config = Config {
            server,
            database,
            cors,
            player_status,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };
        let warnings = collect_warnings(&config);

        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.env.is_some() {
            return Ok(false);
        }
        match &self.options.env_file {
            Some(path) => dotenvy::from_path(path)
                .map(|()| true)
                .map_err(|source| ConfigLoadError::EnvFile {
                    path: path.clone(),
                    source,
                }),
            None => Ok(dotenvy::dotenv().is_ok()),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        let value = match &self.env {
            Some(env) => env.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|value| !value.trim().is_empty())
    }

    fn bool_var(&self, key: &'static str) -> Result<Option<bool>, ConfigLoadError> {
        self.var(key)
            .map(|raw| {
                parse_bool(&raw).ok_or_else(|| ConfigLoadError::InvalidValue {
                    key,
                    value: raw.clone(),
                    reason: "expected true/false".to_string(),
                })
            })
            .transpose()
    }

    fn duration_setting(
        &self,
        key: &'static str,
        file_value: Option<&str>,
    ) -> Result<Option<Duration>, ConfigLoadError> {
        let Some(raw) = self.var(key).or_else(|| file_value.map(str::to_owned))
        else {
            return Ok(None);
        };
        humantime::parse_duration(raw.trim())
            .map(Some)
            .map_err(|err| ConfigLoadError::InvalidValue {
                key,
                value: raw.clone(),
                reason: err.to_string(),
            })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_warnings(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.database.url.is_none() {
        warnings.push(
            "No database configured; progress is kept in memory only",
            Some("set DATABASE_URL to persist data"),
        );
    }
    if config.dev_mode {
        warnings.push("DEV_MODE is enabled; CORS is permissive", None);
    } else if config.cors.is_wildcard_included() {
        warnings.push(
            "CORS_ALLOWED_ORIGINS contains '*'",
            Some("list explicit origins in production"),
        );
    }
    if config.player_status.sweep_interval > config.player_status.ttl {
        warnings.push(
            "Player status sweep interval exceeds the TTL",
            Some("expired entries will linger until the next sweep"),
        );
    }

    warnings
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigLoadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| ConfigLoadError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off`, case-insensitively.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}
