use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Serve Swagger UI under `/swagger-ui`
    #[serde(default)]
    pub swagger: bool,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Connection string, required by the `mongo` backend
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_name")]
    pub collection: String,
    /// Provision the collection through the Cosmos DB custom action with `_id`
    /// as the shard key
    #[serde(default)]
    pub shard_by_id: bool,
    /// Ask Cosmos DB for the request charge after every operation
    #[serde(default)]
    pub request_charge: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0} must be set for the mongo backend")]
    Missing(&'static str),
}

const fn default_port() -> u16 {
    8000
}

fn default_name() -> String {
    "notes".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            swagger: false,
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            uri: None,
            name: default_name(),
            collection: default_name(),
            shard_by_id: false,
            request_charge: false,
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" | "cosmos" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("invalid database backend: {s}")),
        }
    }
}

/// Loads the config file named by `NOTES_SERVICE_CONFIG` (default
/// `config.yaml`), or defaults when there is none, then applies
/// environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path =
        env::var("NOTES_SERVICE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    let config = if Path::new(&config_path).exists() {
        load_file(&config_path)?
    } else {
        tracing::warn!(
            "Config file '{}' not found, reading configuration from the environment",
            config_path
        );
        Config::default()
    };

    apply_env(config, |key| env::var(key).ok())
}

fn load_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn apply_env(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    if let Some(port) = var("NOTES_PORT") {
        config.port = parse("NOTES_PORT", port)?;
    }
    if let Some(swagger) = var("NOTES_SWAGGER") {
        config.swagger = parse("NOTES_SWAGGER", swagger)?;
    }
    if let Some(backend) = var("NOTES_DATABASE_BACKEND") {
        config.database.backend = parse("NOTES_DATABASE_BACKEND", backend)?;
    }
    if let Some(uri) = var("NOTES_DATABASE_URI") {
        config.database.uri = Some(uri);
    }
    if let Some(name) = var("NOTES_DATABASE_NAME") {
        config.database.name = name;
    }
    if let Some(collection) = var("NOTES_COLLECTION_NAME") {
        config.database.collection = collection;
    }
    if let Some(shard_by_id) = var("NOTES_SHARD_BY_ID") {
        config.database.shard_by_id = parse("NOTES_SHARD_BY_ID", shard_by_id)?;
    }
    if let Some(request_charge) = var("NOTES_REQUEST_CHARGE") {
        config.database.request_charge = parse("NOTES_REQUEST_CHARGE", request_charge)?;
    }

    if config.database.backend == Backend::Mongo && config.database.uri.is_none() {
        return Err(ConfigError::Missing("NOTES_DATABASE_URI"));
    }

    Ok(config)
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
