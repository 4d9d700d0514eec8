//! Configuration management for the backend core
//!
//! This module handles loading, validation, and management of the
//! access-control subsystem configuration.

pub mod models;

pub use models::*;

use crate::utils::error::{FinanceError, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the backend core
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Redis configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Permission cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FinanceError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| FinanceError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Ok(environment) = env::var("UFM_ENVIRONMENT") {
            config.environment = environment
                .parse()
                .map_err(|e| FinanceError::Config(format!("Invalid environment: {}", e)))?;
        }
        if let Ok(level) = env::var("UFM_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(redis_url) = env::var("UFM_REDIS_URL") {
            config.redis.url = redis_url;
        }
        if let Ok(enabled) = env::var("UFM_REDIS_ENABLED") {
            config.redis.enabled = enabled
                .parse()
                .map_err(|e| FinanceError::Config(format!("Invalid redis enabled flag: {}", e)))?;
        }
        if let Ok(ttl) = env::var("UFM_CACHE_TTL") {
            config.cache.ttl = ttl
                .parse()
                .map_err(|e| FinanceError::Config(format!("Invalid cache TTL: {}", e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.redis
            .validate()
            .map_err(FinanceError::Config)?;
        self.cache
            .validate()
            .map_err(FinanceError::Config)?;
        Ok(())
    }
}
