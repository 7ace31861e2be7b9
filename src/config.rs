use anyhow::{Context, Result};

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "game.db";
pub const DEFAULT_FRONTEND_DIR: &str = "frontend";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// IP literal or host name, resolved when the server binds.
    pub host: String,
    pub port: u16,
    /// SQLite file holding the `players` table.
    pub db_path: PathBuf,
    /// Directory of the game client; its `index.html` is the catch-all page.
    pub frontend_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(port) => port.parse().with_context(|| format!("Invalid PORT: {port}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            db_path: var("GAME_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()).into(),
            frontend_dir: var("FRONTEND_DIR").unwrap_or_else(|| DEFAULT_FRONTEND_DIR.to_string()).into(),
        })
    }

    /// Resolves `host:port` to the first address it maps to.
    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Could not resolve HOST: {}", self.host))?
            .next()
            .with_context(|| format!("HOST {} resolved to no address", self.host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[tokio::test]
    async fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr().await.unwrap().to_string(), "0.0.0.0:3000");
        assert_eq!(config.db_path, PathBuf::from("game.db"));
        assert_eq!(config.frontend_dir, PathBuf::from("frontend"));
    }

    #[tokio::test]
    async fn port_is_read_from_environment() {
        let config = config_from(&[("PORT", "8080"), ("HOST", "127.0.0.1")]).unwrap();
        assert_eq!(config.bind_addr().await.unwrap().to_string(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn host_name_is_resolved() {
        let config = config_from(&[("PORT", "8080"), ("HOST", "localhost")]).unwrap();

        let addr = config.bind_addr().await.unwrap();

        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        let config = config_from(&[("PORT", "  ")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }
}
