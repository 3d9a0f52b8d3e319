use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Base URLs for the downstream services.
///
/// In cluster deployments these are injected as the `AUTH_URL` and
/// `IMAGE_URL` secrets; the fallbacks point at the conventional cluster DNS
/// names on the service port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub auth_url: String,
    pub image_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://auth-service.prod-auth.svc.cluster.local:80".to_string(),
            image_url: "http://image-service.prod-image.svc.cluster.local:80".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Platform environment variables `PORT`, `AUTH_URL`, `IMAGE_URL`
    /// 2. `MAINAPI_*` environment variables
    /// 3. Config file (if provided)
    /// 4. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        // Load config file if provided
        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (MAINAPI_SERVER_PORT, etc.)
        builder = builder.add_source(
            Environment::with_prefix("MAINAPI")
                .separator("_")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_platform_env()?;
        Ok(config)
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(Some(path))
    }

    /// Apply the unprefixed variables the deployment platform injects.
    ///
    /// K8s secrets provide `AUTH_URL` and `IMAGE_URL`; `PORT` comes from the
    /// pod spec. These take precedence over every other source.
    fn apply_platform_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| {
                config::ConfigError::Message(format!("invalid PORT value: {port:?}"))
            })?;
        }
        if let Ok(url) = std::env::var("AUTH_URL") {
            self.services.auth_url = url;
        }
        if let Ok(url) = std::env::var("IMAGE_URL") {
            self.services.image_url = url;
        }
        Ok(())
    }

    /// Get HTTP listen address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
