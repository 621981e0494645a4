use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub restaurant: RestaurantConfig,
    #[serde(default)]
    pub live: LiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantConfig {
    pub name: String,
    /// Origin encoded into table QR codes, e.g. `https://order.example.com`
    pub public_base_url: String,
    /// Number of tables listed on the landing view
    pub table_count: u32,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: "Resto Chen".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            table_count: 8,
        }
    }
}

/// Tuning for live order / waiter-call subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on change-feed driven refreshes per subscriber
    #[serde(default = "default_events_per_second")]
    pub events_per_second: u32,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_events_per_second() -> u32 {
    10
}

fn default_channel_capacity() -> usize {
    256
}

fn default_heartbeat_secs() -> u64 {
    15
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            events_per_second: default_events_per_second(),
            channel_capacity: default_channel_capacity(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => toml::from_str(&config_str).map_err(|e| {
                AppError::ConfigError(format!("Failed to parse {config_path}: {e}"))
            })?,
            // no file: env vars and defaults only
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(
                        "DATABASE_URL is not set and no config.toml was found".to_string(),
                    )
                })?;
                Config::with_database_url(database_url)
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Cannot read config file {config_path}: {e}"
                )));
            }
        };

        // env always wins, even when the file exists
        config.apply_env_overrides(|name| env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn with_database_url(url: impl Into<String>) -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: url.into(),
                max_connections: 10,
            },
            restaurant: RestaurantConfig::default(),
            live: LiveConfig::default(),
        }
    }

    pub fn apply_env_overrides<F>(&mut self, get_env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
            value.and_then(|v| v.parse::<T>().ok())
        }

        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = parsed(get_env("SERVER_PORT")) {
            self.server.port = p;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = parsed(get_env("DB_MAX_CONNECTIONS")) {
            self.database.max_connections = mc;
        }
        if let Some(v) = get_env("RESTAURANT_NAME") {
            self.restaurant.name = v;
        }
        if let Some(v) = get_env("APP_URL") {
            self.restaurant.public_base_url = v;
        }
        if let Some(n) = parsed(get_env("TABLE_COUNT")) {
            self.restaurant.table_count = n;
        }
        if let Some(n) = parsed(get_env("LIVE_POLL_INTERVAL_MS")) {
            self.live.poll_interval_ms = n;
        }
        if let Some(n) = parsed(get_env("LIVE_EVENTS_PER_SECOND")) {
            self.live.events_per_second = n;
        }
        if let Some(n) = parsed(get_env("LIVE_CHANNEL_CAPACITY")) {
            self.live.channel_capacity = n;
        }
        if let Some(n) = parsed(get_env("LIVE_HEARTBEAT_SECS")) {
            self.live.heartbeat_secs = n;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::ConfigError("database.url is empty".into()));
        }
        if self.live.poll_interval_ms == 0 {
            return Err(AppError::ConfigError(
                "live.poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.live.events_per_second == 0 {
            return Err(AppError::ConfigError(
                "live.events_per_second must be greater than 0".into(),
            ));
        }
        if self.live.channel_capacity == 0 {
            return Err(AppError::ConfigError(
                "live.channel_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
