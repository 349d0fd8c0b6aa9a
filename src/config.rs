use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Runtime configuration, resolved once at startup. Nothing else in the
/// process reads the environment after this.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub store_url: Url,
    pub store_api_key: String,
    pub store_table: String,
    pub store_timeout: Duration,
}

fn read_env(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn read_env_required(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{key} must be set"))
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        let host = read_env("RELAY_HOST", "0.0.0.0");
        let port: u16 = std::env::var("RELAY_PORT")
            .or_else(|_| std::env::var("PORT")) // fallback for platforms that provide PORT
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let raw_url = read_env_required("SUPABASE_URL")?;
        let store_url = Url::parse(&raw_url)
            .with_context(|| format!("SUPABASE_URL is not a valid URL: {raw_url}"))?;
        let store_api_key = read_env_required("SUPABASE_API_KEY")?;
        let store_table = read_env("SUPABASE_TABLE", "Data");

        let store_timeout_secs: u64 = read_env("STORE_TIMEOUT_SECS", "10").parse().unwrap_or(10);

        Ok(Self {
            host,
            port,
            store_url,
            store_api_key,
            store_table,
            store_timeout: Duration::from_secs(store_timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
