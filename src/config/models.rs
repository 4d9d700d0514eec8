//! Configuration model definitions

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (used when RUST_LOG is unset)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis URL
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Enable Redis (if false, use the in-memory cache backend)
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,
    /// Connect/operation timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            enabled: default_redis_enabled(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

impl RedisConfig {
    /// Merge Redis configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != default_redis_url() {
            self.url = other.url;
        }
        if !other.enabled {
            self.enabled = other.enabled;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        self
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.url.is_empty() {
            return Err("Redis URL cannot be empty when Redis is enabled".to_string());
        }
        if self.connection_timeout == 0 {
            return Err("Redis connection timeout must be at least 1 second".to_string());
        }
        Ok(())
    }
}

/// Permission cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds for effective permission sets
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
    /// Application-wide key prefix
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_cache_ttl(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    /// Merge cache configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.ttl != default_cache_ttl() {
            self.ttl = other.ttl;
        }
        if other.key_prefix != default_key_prefix() {
            self.key_prefix = other.key_prefix;
        }
        self
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl == 0 {
            return Err("Cache TTL must be at least 1 second".to_string());
        }
        if self.key_prefix.is_empty() {
            return Err("Cache key prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_enabled() -> bool {
    true
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_key_prefix() -> String {
    "ufm:".to_string()
}
