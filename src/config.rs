use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const STARTUP_GREETING: &str = "Hello from Cloud Run! The container started successfully and is listening for HTTP requests on $PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. An unset or empty
    /// `PORT` falls back to [`DEFAULT_PORT`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup(PORT_VAR) {
            Some(value) if !value.trim().is_empty() => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Parsing {PORT_VAR} value {value:?}"))?,
            _ => DEFAULT_PORT,
        };
        Ok(Self {
            host: DEFAULT_HOST,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Second startup line, logged right after [`STARTUP_GREETING`].
    pub fn listening_message(&self) -> String {
        format!("Listening on port {}", self.port)
    }
}
