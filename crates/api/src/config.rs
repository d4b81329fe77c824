use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,
    /// SMS delivery configuration
    #[serde(default)]
    pub sms: SmsConfig,
    /// Fallback values for settings not stored in the database.
    /// Also seeded into the settings table at startup.
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Repository read cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// TTL for cached reads. 0 keeps entries until a write invalidates them.
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Settings shared by the batch jobs.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJobConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_job_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: i64,

    #[serde(default = "default_max_retries")]
    pub max_retries: i64,
}

impl Default for BatchJobConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_job_interval(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsConfig {
    #[serde(default)]
    pub recurring_donations: BatchJobConfig,

    #[serde(default)]
    pub message_dispatch: BatchJobConfig,

    #[serde(default)]
    pub payout_batch: BatchJobConfig,
}

/// Email service configuration for outbound messages.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: sendgrid, or console (for development)
    #[serde(default = "default_console_provider")]
    pub provider: String,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,

    #[serde(default = "default_sendgrid_base_url")]
    pub sendgrid_base_url: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_console_provider(),
            sendgrid_api_key: String::new(),
            sendgrid_base_url: default_sendgrid_base_url(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Only `console` is supported.
    #[serde(default = "default_console_provider")]
    pub provider: String,

    #[serde(default)]
    pub sender_number: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_console_provider(),
            sender_number: String::new(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_job_interval() -> u64 {
    60
}
fn default_batch_size() -> i64 {
    50
}
fn default_max_retries() -> i64 {
    3
}
fn default_console_provider() -> String {
    "console".to_string()
}
fn default_sendgrid_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}
fn default_sender_email() -> String {
    "noreply@donate.example.org".to_string()
}
fn default_sender_name() -> String {
    "Donation Platform".to_string()
}
fn default_provider_timeout() -> u64 {
    10
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with DONATE__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("DONATE").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds from embedded defaults so tests do not depend on config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [cache]
            enabled = true
            default_ttl_secs = 300

            [jobs.message_dispatch]
            interval_secs = 30
            batch_size = 25
            max_retries = 5

            [email]
            enabled = false
            provider = "console"
            sender_email = "test@example.com"
            sender_name = "Test"

            [settings]
            BaseUrl = "https://donate.example.org"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "DONATE__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        for (name, job) in [
            ("recurring_donations", &self.jobs.recurring_donations),
            ("message_dispatch", &self.jobs.message_dispatch),
            ("payout_batch", &self.jobs.payout_batch),
        ] {
            if job.interval_secs == 0 || job.batch_size < 1 || job.max_retries < 1 {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "jobs.{} needs interval_secs, batch_size and max_retries of at least 1",
                    name
                )));
            }
        }

        match self.email.provider.as_str() {
            "console" => {}
            "sendgrid" if !self.email.sendgrid_api_key.is_empty() => {}
            "sendgrid" => {
                return Err(ConfigValidationError::MissingRequired(
                    "email.sendgrid_api_key is required for the sendgrid provider".to_string(),
                ))
            }
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown email provider '{}'",
                    other
                )))
            }
        }

        if self.sms.provider != "console" {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Unknown sms provider '{}'",
                self.sms.provider
            )));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid socket address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[("database.url", "sqlite::memory:")])
            .expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(300)));
        assert!(config
            .settings
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case("BaseUrl") && v == "https://donate.example.org"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_job_defaults_and_overrides() {
        let config = Config::load_for_test(&[("database.url", "sqlite::memory:")])
            .expect("Failed to load config");

        assert_eq!(config.jobs.recurring_donations.batch_size, 50);
        assert_eq!(config.jobs.recurring_donations.max_retries, 3);
        assert_eq!(config.jobs.message_dispatch.batch_size, 25);
        assert_eq!(config.jobs.message_dispatch.max_retries, 5);
        assert!(config.jobs.payout_batch.enabled);
    }

    #[test]
    fn test_config_env_override() {
        let config = Config::load_for_test(&[
            ("database.url", "sqlite::memory:"),
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("cache.default_ttl_secs", "0"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.cache.ttl(), None);
    }

    #[test]
    fn test_config_validation_missing_db_url() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("DONATE__DATABASE__URL"));
    }

    #[test]
    fn test_config_validation_invalid_pool_settings() {
        let config = Config::load_for_test(&[
            ("database.url", "sqlite::memory:"),
            ("database.min_connections", "100"),
            ("database.max_connections", "10"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("min_connections"));
    }

    #[test]
    fn test_config_validation_sendgrid_requires_key() {
        let config = Config::load_for_test(&[
            ("database.url", "sqlite::memory:"),
            ("email.provider", "sendgrid"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("sendgrid_api_key"));
    }

    #[test]
    fn test_config_validation_rejects_zero_batch() {
        let config = Config::load_for_test(&[
            ("database.url", "sqlite::memory:"),
            ("jobs.payout_batch.batch_size", "0"),
        ])
        .expect("Failed to load config");

        assert!(config.validate().unwrap_err().to_string().contains("payout_batch"));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[
            ("database.url", "sqlite::memory:"),
            ("server.host", "127.0.0.1"),
            ("server.port", "3000"),
        ])
        .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }
}
