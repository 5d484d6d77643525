//! Process configuration read from the environment.
//!
//! `PORT` selects the listening port (default 3000) and `HOST` the
//! interface (default all interfaces).  Empty values count as unset.

use crate::error::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            config.port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort {
                    value: value.clone(),
                    source,
                })?;
        }
        if let Some(value) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            config.host = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(value.clone()))?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
