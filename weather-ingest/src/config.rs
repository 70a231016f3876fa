use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    // Defaults to 5432 when not set.
    pub port: Option<u16>,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub listen: Option<String>,
    pub database: DatabaseConfig,
    // Maximum request body size in bytes. Requests exceeding this will return 413 Payload Too Large.
    // If not set, defaults to 1 MiB (1_048_576 bytes).
    pub max_request_body_bytes: Option<usize>,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Loads the config file and applies environment overrides.
    ///
    /// `WEATHER_INGEST_DB_PASSWORD` replaces the file's password so the
    /// credential does not have to live on disk.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut cfg = Self::from_file(path)?;
        if let Ok(password) = std::env::var("WEATHER_INGEST_DB_PASSWORD") {
            cfg.database.password = password;
        }
        Ok(cfg)
    }
}
