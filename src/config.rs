use std::net::SocketAddr;

use thiserror::Error;

pub const LISTEN_ADDR_VAR: &str = "RENTBUY_LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("RENTBUY_LISTEN_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(LISTEN_ADDR_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidListenAddr(raw))?;
        Ok(Self { listen_addr })
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.listen_addr.set_port(port);
        }
        self
    }
}
