// src/config.rs

use std::env;

use dotenvy::dotenv;

/// Origins allowed by CORS when `CORS_ORIGINS` is not set (CRA and Vite dev servers).
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
];

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub rust_log: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            rust_log: "info".to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        // Logging is not up yet, so an unparsable PORT silently falls back.
        let port = env::var("PORT")
            .ok()
            .and_then(|raw| parse_port(&raw))
            .unwrap_or(defaults.port);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_origins);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        Self {
            database_url,
            rust_log,
            port,
            cors_origins,
            log_dir,
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse().ok()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
