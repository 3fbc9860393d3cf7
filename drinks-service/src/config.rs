use anyhow::{Context, Result};
use common_auth::JwtConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Insert the demo drink at startup.
    pub seed_demo: bool,
    pub jwt: JwtConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let host: IpAddr = host.parse().with_context(|| format!("invalid HOST '{host}'"))?;
        let port = match env::var("PORT") {
            Ok(value) => value.parse().with_context(|| format!("invalid PORT '{value}'"))?,
            Err(_) => 5000,
        };
        let seed_demo = env::var("DRINKS_SEED_DEMO")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let jwt = JwtConfig::from_env()?;

        Ok(Self { host, port, seed_demo, jwt })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
