//! Server configuration

use std::net::SocketAddr;

use crate::error::{AtelierError, Result};

pub const BIND_ADDR_ENV: &str = "ATELIER_BIND_ADDR";
pub const ROUTE_ENV: &str = "ATELIER_ROUTE";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_ROUTE: &str = "/api/gemini";

/// Where the HTTP endpoint listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            route: DEFAULT_ROUTE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `ATELIER_BIND_ADDR` and `ATELIER_ROUTE`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var(BIND_ADDR_ENV).ok().as_deref(),
            std::env::var(ROUTE_ENV).ok().as_deref(),
        )
    }

    pub fn from_values(bind_addr: Option<&str>, route: Option<&str>) -> Result<Self> {
        let bind_addr = bind_addr.unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr.parse().map_err(|e| {
            AtelierError::ConfigurationError(format!("Invalid bind address `{bind_addr}`: {e}"))
        })?;

        let route = match route.map(str::trim) {
            None | Some("") => DEFAULT_ROUTE.to_string(),
            Some(r) if r.starts_with('/') => r.to_string(),
            Some(r) => format!("/{r}"),
        };

        Ok(Self { bind_addr, route })
    }
}
