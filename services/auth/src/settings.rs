//! HTTP server settings
//!
//! Loaded with the `config` crate from `SERVER_*` environment variables on
//! top of built-in defaults.

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind (`SERVER_HOST`, default: 0.0.0.0)
    pub host: String,
    /// Port to bind (`SERVER_PORT`, default: 3000)
    pub port: u16,
    /// Add the `Secure` attribute to auth cookies (`SERVER_SECURE_COOKIES`, default: false)
    pub secure_cookies: bool,
}

impl ServerSettings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("secure_cookies", false)?
            .add_source(Environment::with_prefix("SERVER"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
