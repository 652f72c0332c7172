use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_DB_HOST: &str = "db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url_from(
            std::env::var("DATABASE_URL").ok(),
            std::env::var("DB_HOST").ok(),
        );
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a port number: {v}"))?,
            Err(_) => 8000,
        };
        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled around `DB_HOST`.
pub fn database_url_from(database_url: Option<String>, db_host: Option<String>) -> String {
    match database_url.filter(|u| !u.trim().is_empty()) {
        Some(url) => url,
        None => {
            let host = db_host
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_HOST.to_string());
            format!("postgres://postgres:postgres@{host}:5432/calculator_db")
        }
    }
}
