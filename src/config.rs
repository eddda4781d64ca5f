use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expires_in_secs: i64,
    pub bcrypt_cost: u32,
    pub kafka_enabled: bool,
    pub kafka_brokers: String,
    pub kafka_client_id: String,
    pub kafka_group_id: String,
    pub elasticsearch_enabled: bool,
    pub elasticsearch_node: String,
    pub cache_ttl: Duration,
    pub stats_cron: String,
}

impl AppConfig {
    /// Load configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let or = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: or("HOST", "0.0.0.0"),
            port: parse("PORT", or("PORT", "8080"))?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expires_in_secs: parse("JWT_EXPIRES_IN_SECS", or("JWT_EXPIRES_IN_SECS", "86400"))?,
            bcrypt_cost: parse("BCRYPT_COST", or("BCRYPT_COST", "10"))?,
            kafka_enabled: flag("KAFKA_ENABLED", or("KAFKA_ENABLED", "false"))?,
            kafka_brokers: or("KAFKA_BROKERS", "localhost:9092"),
            kafka_client_id: or("KAFKA_CLIENT_ID", "tracker-commerce"),
            kafka_group_id: or("KAFKA_GROUP_ID", "notification-consumer-group"),
            elasticsearch_enabled: flag(
                "ELASTICSEARCH_ENABLED",
                or("ELASTICSEARCH_ENABLED", "false"),
            )?,
            elasticsearch_node: or("ELASTICSEARCH_NODE", "http://localhost:9200"),
            cache_ttl: Duration::from_secs(parse("CACHE_TTL_SECS", or("CACHE_TTL_SECS", "300"))?),
            stats_cron: or("STATS_CRON", "0 0 3 * * *"),
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
