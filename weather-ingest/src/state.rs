use crate::config::Config;
use sqlx::postgres::PgConnectOptions;
use tracing::{debug, info};

pub struct AppState {
    // Prepared connect options; every request opens its own connection.
    pub connect: PgConnectOptions,
    pub max_request_body_bytes: usize,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let db = &cfg.database;
        if db.host.is_empty() {
            anyhow::bail!("database host must not be empty");
        }
        if db.dbname.is_empty() {
            anyhow::bail!("database name must not be empty");
        }
        let port = db.port.unwrap_or(5432);
        let connect = PgConnectOptions::new()
            .host(&db.host)
            .port(port)
            .database(&db.dbname)
            .username(&db.user)
            .password(&db.password);
        info!("Database target: {}:{}/{}", db.host, port, db.dbname);

        // Default to 1 MiB if not specified; one reading is well under 100 bytes.
        const DEFAULT_MAX_BODY_BYTES: usize = 1_048_576; // 1 MiB
        let max_request_body_bytes = cfg.max_request_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES);
        debug!("Maximum request body size: {} bytes", max_request_body_bytes);

        Ok(AppState {
            connect,
            max_request_body_bytes,
        })
    }
}
