//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Notification dispatch configuration.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Notification dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Locale used for default message bodies and hint strings.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Maximum delivery attempts per logical notification before the
    /// retry sweep stops picking it up.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// SMTP settings for the email channel. Channel disabled when absent.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    /// SMS gateway settings. Channel disabled when absent.
    #[serde(default)]
    pub sms: Option<GatewayConfig>,
    /// Push gateway settings. Channel disabled when absent.
    #[serde(default)]
    pub push: Option<GatewayConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            max_retry_attempts: default_max_retry_attempts(),
            smtp: None,
            sms: None,
            push: None,
        }
    }
}

/// SMTP settings for the email channel.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Username, when the relay requires authentication.
    #[serde(default)]
    pub username: Option<String>,
    /// Password, when the relay requires authentication.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outgoing mail.
    pub from_address: String,
}

/// HTTP gateway settings (SMS and push channels).
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway endpoint URL.
    pub url: String,
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

const fn default_max_retry_attempts() -> u32 {
    3
}

const fn default_smtp_port() -> u16 {
    587
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `LICREG_ENV`)
    /// 3. Environment variables with `LICREG_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("LICREG_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LICREG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LICREG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults() {
        let cfg = NotificationConfig::default();
        assert_eq!(cfg.default_locale, "en");
        assert_eq!(cfg.max_retry_attempts, 3);
        assert!(cfg.smtp.is_none());
        assert!(cfg.sms.is_none());
    }
}
