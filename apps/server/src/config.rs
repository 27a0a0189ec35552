use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub snapshot_path: String,
    pub snapshot_version: String,
    pub settings_path: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("VENUEMAP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid VENUEMAP_LISTEN_ADDR")?;
        let db_path = std::env::var("VENUEMAP_DB_PATH").unwrap_or_else(|_| "./db/venues.db".into());
        let snapshot_path =
            std::env::var("VENUEMAP_SNAPSHOT_PATH").unwrap_or_else(|_| "data/taxonomy.json".into());
        let snapshot_version =
            std::env::var("VENUEMAP_SNAPSHOT_VERSION").unwrap_or_else(|_| "bootstrap".into());
        let settings_path = std::env::var("VENUEMAP_SETTINGS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());
        let cors_allow = std::env::var("VENUEMAP_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_secs: u64 = std::env::var("VENUEMAP_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .unwrap_or(30);
        Ok(Self {
            listen_addr,
            db_path,
            snapshot_path,
            snapshot_version,
            settings_path,
            cors_allow,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
