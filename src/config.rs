use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub geocode_base_url: String,
    pub geocode_user_agent: String,
    pub geocode_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.db?mode=rwc".to_string());

        let geocode_base_url = std::env::var("GEOCODE_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let geocode_user_agent =
            std::env::var("GEOCODE_USER_AGENT").unwrap_or_else(|_| "Mozilla/5.0".to_string());

        let geocode_timeout_secs: u64 =
            std::env::var("GEOCODE_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            geocode_base_url,
            geocode_user_agent,
            geocode_timeout: Duration::from_secs(geocode_timeout_secs),
        })
    }
}
