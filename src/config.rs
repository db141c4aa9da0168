use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub probe: ProbeConfig,
    pub monitor: MonitorConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Redsky product-detail endpoint. Overridable so tests can point the
    /// prober at a local mock server.
    pub endpoint: String,
    pub api_key: String,
    pub store_id: String,
    pub visitor_id: String,
    /// The upstream rejects requests without a recognizable browser signature.
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Delay between full cycles, seconds.
    pub cycle_interval_secs: u64,
    /// Politeness delay between products within a cycle, seconds.
    pub product_delay_secs: u64,
    /// Repeat-notification cooldown window, seconds.
    pub cooldown_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub desktop: DesktopConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesktopConfig {
    pub enabled: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
    pub username: String,
    pub avatar_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "WATCHER_"
            .add_source(Environment::with_prefix("WATCHER").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate database configuration
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max_connections must be greater than 0".into(),
            ));
        }

        // Validate probe configuration
        if Url::parse(&self.probe.endpoint).is_err() {
            return Err(ConfigError::Message("Invalid probe endpoint URL".into()));
        }

        if self.probe.api_key.is_empty() {
            return Err(ConfigError::Message("Probe api_key must not be empty".into()));
        }

        if self.probe.user_agent.is_empty() {
            return Err(ConfigError::Message(
                "Probe user_agent must not be empty".into(),
            ));
        }

        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Probe timeout_secs must be greater than 0".into(),
            ));
        }

        // Validate monitor configuration
        if self.monitor.cycle_interval_secs == 0 {
            return Err(ConfigError::Message(
                "Monitor cycle_interval_secs must be greater than 0".into(),
            ));
        }

        if self.monitor.cooldown_secs == 0 {
            return Err(ConfigError::Message(
                "Monitor cooldown_secs must be greater than 0".into(),
            ));
        }

        // Validate notification configuration
        if let Some(webhook_url) = &self.notifications.discord.webhook_url {
            if Url::parse(webhook_url).is_err() {
                return Err(ConfigError::Message(
                    "Invalid Discord webhook URL in configuration".into(),
                ));
            }
        }

        Ok(())
    }
}
