//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and passed explicitly to
//! every component that needs it.
//!
//! ## Storage
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379/0"
//! # or
//! export REDIS_HOST="localhost"
//! export REDIS_PORT="6379"
//! export REDIS_PASSWORD=""
//! export REDIS_DB="0"
//! ```
//!
//! Without Redis the service falls back to an in-process store, which loses all
//! state on restart.
//!
//! ## Optional Variables
//!
//! - `KV_KEY_PREFIX` - Namespace for every stored key (default: `sitebot:`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `HTTP_TIMEOUT_SECS` - Outbound request timeout (default: 30)
//! - `SITEMAP_MAX_DEPTH` - Sitemap index nesting limit (default: 3, max: 10)
//! - `CHILD_FETCH_DELAY_MS` - Pause between child sitemap fetches (default: 500)
//! - `FEED_DELAY_MS` - Pause between feeds in a scheduled run (default: 2000)
//! - `SEARCH_DOMAIN_DELAY_MS` - Pause between monitored domains (default: 2000)
//! - `BATCH_DELAY_MS` - Pause between items of a batch request (default: 300)
//! - `SCHEDULE_INTERVAL_SECS` - Run the sitemap check periodically
//! - `SERPER_API_KEY` - Search API key (search returns nothing without it)
//!
//! ## Notification channels
//!
//! A channel is enabled when all of its required variables are set.
//!
//! - Feishu: `FEISHU_WEBHOOK`, optional `FEISHU_SECRET`
//! - Telegram: `TELEGRAM_BOT_TOKEN`, `TELEGRAM_TARGET_CHAT`
//! - Email: `EMAIL_API_KEY`, `EMAIL_SENDER`, `EMAIL_TO` (comma separated),
//!   optional `EMAIL_API_URL`
//! - Status webhook: `STATUS_WEBHOOK_URL`

use anyhow::Result;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.smtp2go.com/v3/email/send";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeishuConfig {
    pub webhook_url: String,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub api_key: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub api_url: String,
}

/// Notification channel settings. `None` means the channel is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    pub feishu: Option<FeishuConfig>,
    pub telegram: Option<TelegramConfig>,
    pub email: Option<EmailConfig>,
    pub status_webhook: Option<String>,
    /// Channels with some but not all required variables, and what is missing.
    pub incomplete: Vec<String>,
}

impl NotificationConfig {
    /// Names of the enabled channels.
    pub fn enabled_channels(&self) -> Vec<&'static str> {
        let mut channels = Vec::new();
        if self.feishu.is_some() {
            channels.push("feishu");
        }
        if self.telegram.is_some() {
            channels.push("telegram");
        }
        if self.email.is_some() {
            channels.push("email");
        }
        if self.status_webhook.is_some() {
            channels.push("webhook");
        }
        channels
    }
}

/// Timing and depth limits of monitoring runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub max_depth: usize,
    pub child_fetch_delay: Duration,
    pub feed_delay: Duration,
    pub search_domain_delay: Duration,
    pub batch_delay: Duration,
    /// Interval of the built-in scheduler; `None` disables it.
    pub schedule_interval: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            child_fetch_delay: Duration::from_millis(500),
            feed_delay: Duration::from_millis(2000),
            search_domain_delay: Duration::from_millis(2000),
            batch_delay: Duration::from_millis(300),
            schedule_interval: None,
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub http_timeout_secs: u64,
    pub serper_api_key: Option<String>,
    pub monitor: MonitorConfig,
    pub notifications: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "sitebot:".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            http_timeout_secs: 30,
            serper_api_key: None,
            monitor: MonitorConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = MonitorConfig::default();

        let monitor = MonitorConfig {
            max_depth: env_parse("SITEMAP_MAX_DEPTH").unwrap_or(defaults.max_depth),
            child_fetch_delay: env_millis("CHILD_FETCH_DELAY_MS")
                .unwrap_or(defaults.child_fetch_delay),
            feed_delay: env_millis("FEED_DELAY_MS").unwrap_or(defaults.feed_delay),
            search_domain_delay: env_millis("SEARCH_DOMAIN_DELAY_MS")
                .unwrap_or(defaults.search_domain_delay),
            batch_delay: env_millis("BATCH_DELAY_MS").unwrap_or(defaults.batch_delay),
            schedule_interval: env_parse::<u64>("SCHEDULE_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        Ok(Self {
            redis_url: Self::load_redis_url(),
            key_prefix: env::var("KV_KEY_PREFIX").unwrap_or_else(|_| "sitebot:".to_string()),
            listen_addr: env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS").unwrap_or(30),
            serper_api_key: env_non_empty("SERPER_API_KEY"),
            monitor,
            notifications: Self::load_notifications(),
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Some(url) = env_non_empty("REDIS_URL") {
            return Some(url);
        }

        let host = env_non_empty("REDIS_HOST")?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match env_non_empty("REDIS_PASSWORD") {
            Some(pwd) => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            None => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    fn load_notifications() -> NotificationConfig {
        let mut incomplete = Vec::new();

        let feishu = env_non_empty("FEISHU_WEBHOOK").map(|webhook_url| FeishuConfig {
            webhook_url,
            secret: env_non_empty("FEISHU_SECRET"),
        });
        if feishu.is_none() && env_non_empty("FEISHU_SECRET").is_some() {
            incomplete.push("feishu: FEISHU_SECRET set without FEISHU_WEBHOOK".to_string());
        }

        let telegram = match (
            env_non_empty("TELEGRAM_BOT_TOKEN"),
            env_non_empty("TELEGRAM_TARGET_CHAT"),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                api_url: env_non_empty("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            }),
            (None, None) => None,
            (Some(_), None) => {
                incomplete.push("telegram: TELEGRAM_TARGET_CHAT is missing".to_string());
                None
            }
            (None, Some(_)) => {
                incomplete.push("telegram: TELEGRAM_BOT_TOKEN is missing".to_string());
                None
            }
        };

        let email_vars = [
            ("EMAIL_API_KEY", env_non_empty("EMAIL_API_KEY")),
            ("EMAIL_SENDER", env_non_empty("EMAIL_SENDER")),
            ("EMAIL_TO", env_non_empty("EMAIL_TO")),
        ];
        let email = match email_vars.clone() {
            [(_, Some(api_key)), (_, Some(sender)), (_, Some(to))] => Some(EmailConfig {
                api_key,
                sender,
                recipients: split_list(&to),
                api_url: env_non_empty("EMAIL_API_URL")
                    .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            }),
            _ => {
                let missing: Vec<&str> = email_vars
                    .iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                if missing.len() < email_vars.len() {
                    incomplete.push(format!("email: {} missing", missing.join(", ")));
                }
                None
            }
        };

        NotificationConfig {
            feishu,
            telegram,
            email,
            status_webhook: env_non_empty("STATUS_WEBHOOK_URL"),
            incomplete,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not a socket address
    /// - the Redis URL has a foreign scheme
    /// - `http_timeout_secs` is zero
    /// - `max_depth` is outside `1..=10`
    /// - a notification channel is only partly configured
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref redis_url) = self.redis_url
            && !redis_url.starts_with("redis://")
            && !redis_url.starts_with("rediss://")
        {
            anyhow::bail!(
                "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                mask_connection_string(redis_url)
            );
        }

        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than 0");
        }

        if !(1..=10).contains(&self.monitor.max_depth) {
            anyhow::bail!(
                "SITEMAP_MAX_DEPTH must be between 1 and 10, got {}",
                self.monitor.max_depth
            );
        }

        if !self.notifications.incomplete.is_empty() {
            anyhow::bail!(
                "Incomplete notification channel configuration: {}",
                self.notifications.incomplete.join("; ")
            );
        }

        if self.notifications.enabled_channels().is_empty() {
            tracing::warn!("No notification channel configured, changes will only be logged");
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        if let Some(ref redis_url) = self.redis_url {
            tracing::info!("  Redis: {}", mask_connection_string(redis_url));
        } else {
            tracing::info!("  Redis: disabled (in-memory store)");
        }

        tracing::info!("  Key prefix: {}", self.key_prefix);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  HTTP timeout: {}s", self.http_timeout_secs);
        tracing::info!("  Sitemap max depth: {}", self.monitor.max_depth);
        tracing::info!(
            "  Search API: {}",
            if self.serper_api_key.is_some() {
                "configured"
            } else {
                "not configured"
            }
        );
        match self.monitor.schedule_interval {
            Some(interval) => tracing::info!("  Scheduler: every {}s", interval.as_secs()),
            None => tracing::info!("  Scheduler: disabled"),
        }
        tracing::info!(
            "  Channels: [{}]",
            self.notifications.enabled_channels().join(", ")
        );
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Masks sensitive information in connection strings for logging.
///
/// Replaces password with `***` in URLs like:
/// - `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// Expects environment variables to be already loaded (e.g., via
/// `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const CHANNEL_VARS: [&str; 10] = [
        "FEISHU_WEBHOOK",
        "FEISHU_SECRET",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_TARGET_CHAT",
        "TELEGRAM_API_URL",
        "EMAIL_API_KEY",
        "EMAIL_SENDER",
        "EMAIL_TO",
        "EMAIL_API_URL",
        "STATUS_WEBHOOK_URL",
    ];

    fn clear_channel_vars() {
        // SAFETY: callers are #[serial]
        unsafe {
            for var in CHANNEL_VARS {
                env::remove_var(var);
            }
        }
    }

    fn test_config() -> Config {
        Config {
            redis_url: None,
            key_prefix: "sitebot:".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            http_timeout_secs: 30,
            serper_api_key: None,
            monitor: MonitorConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );
        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "127.0.0.1:8080".to_string();

        config.redis_url = Some("http://localhost:6379".to_string());
        assert!(config.validate().is_err());
        config.redis_url = Some("rediss://localhost:6379".to_string());
        assert!(config.validate().is_ok());

        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 5;

        config.monitor.max_depth = 0;
        assert!(config.validate().is_err());
        config.monitor.max_depth = 11;
        assert!(config.validate().is_err());
        config.monitor.max_depth = 10;
        assert!(config.validate().is_ok());

        config.notifications.incomplete = vec!["telegram: chat missing".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("REDIS_URL");
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
            env::remove_var("REDIS_PASSWORD");
        }

        assert_eq!(
            Config::load_redis_url().unwrap(),
            "redis://redis-host:6380/1"
        );

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        assert_eq!(
            Config::load_redis_url().unwrap(),
            "redis://:secret@redis-host:6380/1"
        );

        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        assert_eq!(
            Config::load_redis_url().unwrap(),
            "redis://redis-host:6380/1"
        );

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
        assert!(Config::load_redis_url().is_none());
    }

    #[test]
    #[serial]
    fn test_channels_enabled_only_when_complete() {
        clear_channel_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("FEISHU_WEBHOOK", "https://open.feishu.cn/hook/x");
            env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
            env::set_var("TELEGRAM_TARGET_CHAT", "-100");
            env::set_var("EMAIL_API_KEY", "key");
            env::set_var("EMAIL_SENDER", "bot@example.com");
            env::set_var("EMAIL_TO", "a@example.com, b@example.com,");
        }

        let notifications = Config::load_notifications();
        assert_eq!(
            notifications.enabled_channels(),
            vec!["feishu", "telegram", "email"]
        );
        assert!(notifications.incomplete.is_empty());

        let email = notifications.email.unwrap();
        assert_eq!(email.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(email.api_url, DEFAULT_EMAIL_API_URL);

        clear_channel_vars();
    }

    #[test]
    #[serial]
    fn test_half_configured_channels_are_reported() {
        clear_channel_vars();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
            env::set_var("EMAIL_SENDER", "bot@example.com");
        }

        let notifications = Config::load_notifications();
        assert!(notifications.enabled_channels().is_empty());
        assert_eq!(notifications.incomplete.len(), 2);
        assert!(notifications.incomplete[0].starts_with("telegram"));
        assert!(notifications.incomplete[1].contains("EMAIL_API_KEY"));

        clear_channel_vars();
    }

    #[test]
    #[serial]
    fn test_monitor_defaults_and_overrides() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("SITEMAP_MAX_DEPTH", "5");
            env::set_var("FEED_DELAY_MS", "not-a-number");
            env::set_var("SCHEDULE_INTERVAL_SECS", "0");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.monitor.max_depth, 5);
        assert_eq!(config.monitor.feed_delay, Duration::from_millis(2000));
        assert!(config.monitor.schedule_interval.is_none());

        unsafe {
            env::remove_var("SITEMAP_MAX_DEPTH");
            env::remove_var("FEED_DELAY_MS");
            env::remove_var("SCHEDULE_INTERVAL_SECS");
        }
    }
}
