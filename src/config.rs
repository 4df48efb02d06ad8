//! Configuration loaded from environment variables with sensible defaults.
//!
//! Everything is read once at startup into plain structs; components never
//! touch the environment themselves.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Monitor settings.
///
/// Environment variables:
/// - `MONITOR_HOST`: host to probe (default: "8.8.8.8")
/// - `PING_INTERVAL`: seconds between probes (default: 1)
/// - `PROBE_TIMEOUT`: per-probe timeout in seconds (default: 5)
/// - `MAX_FAILURES`: consecutive failures before a DOWN alert (default: 3)
/// - `SUMMARY_INTERVAL`: samples between periodic status lines (default: 60)
/// - `ERROR_BACKOFF`: seconds to pause after an unexpected error (default: 5)
/// - `LOG_LEVEL`: tracing filter (default: "info")
/// - `LOG_DIR`: log file directory (default: "logs")
/// - `HEALTH_PORT`: liveness endpoint port (default: 8000)
/// - `HOSTNAME`: container id reported in alerts (default: "unknown")
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub host: String,
    pub ping_interval: Duration,
    pub probe_timeout: Duration,
    pub max_failures: u32,
    pub summary_interval: u64,
    pub error_backoff: Duration,
    pub log_level: String,
    pub log_dir: String,
    pub health_port: u16,
    pub container_id: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "8.8.8.8".to_string(),
            ping_interval: Duration::from_secs(1),
            probe_timeout: Duration::from_secs(5),
            max_failures: 3,
            summary_interval: 60,
            error_backoff: Duration::from_secs(5),
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            health_port: 8000,
            container_id: "unknown".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            host: env_string("MONITOR_HOST", defaults.host),
            ping_interval: Duration::from_secs(env_parse("PING_INTERVAL", 1u64).max(1)),
            probe_timeout: Duration::from_secs(env_parse("PROBE_TIMEOUT", 5u64).max(1)),
            max_failures: env_parse("MAX_FAILURES", 3u32).max(1),
            summary_interval: env_parse("SUMMARY_INTERVAL", 60u64).max(1),
            error_backoff: Duration::from_secs(env_parse("ERROR_BACKOFF", 5u64).max(1)),
            log_level: env_string("LOG_LEVEL", defaults.log_level),
            log_dir: env_string("LOG_DIR", defaults.log_dir),
            health_port: env_parse("HEALTH_PORT", 8000u16),
            container_id: env_string("HOSTNAME", defaults.container_id),
        }
    }
}

/// Alert channel credentials and endpoints. A channel is active only when
/// its required fields are present.
///
/// Environment variables:
/// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`
/// - `WEBHOOK_URL`
/// - `WHATSAPP_API_URL` (default: "http://evolution-api:8080"),
///   `WHATSAPP_API_KEY`, `WHATSAPP_INSTANCE` (default: "ping-monitor"),
///   `WHATSAPP_NUMBER`
/// - `NODE_ENV`: environment tag in webhook payloads (default: "production")
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub webhook_url: Option<String>,
    pub whatsapp_api_url: String,
    pub whatsapp_token: Option<String>,
    pub whatsapp_instance: String,
    pub whatsapp_number: Option<String>,
    pub environment: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            webhook_url: None,
            whatsapp_api_url: "http://evolution-api:8080".to_string(),
            whatsapp_token: None,
            whatsapp_instance: "ping-monitor".to_string(),
            whatsapp_number: None,
            environment: "production".to_string(),
        }
    }
}

impl AlertConfig {
    /// Load channel configuration from environment variables.
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok(),
            webhook_url: env::var("WEBHOOK_URL").ok(),
            whatsapp_api_url: env_string("WHATSAPP_API_URL", defaults.whatsapp_api_url),
            whatsapp_token: env::var("WHATSAPP_API_KEY").ok(),
            whatsapp_instance: env_string("WHATSAPP_INSTANCE", defaults.whatsapp_instance),
            whatsapp_number: env::var("WHATSAPP_NUMBER").ok(),
            environment: env_string("NODE_ENV", defaults.environment),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

/// Parse a numeric variable, keeping the default (with a warning) on junk.
fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_monitor_config() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.host, "8.8.8.8");
        assert_eq!(cfg.ping_interval, Duration::from_secs(1));
        assert_eq!(cfg.probe_timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_failures, 3);
        assert_eq!(cfg.summary_interval, 60);
        assert_eq!(cfg.error_backoff, Duration::from_secs(5));
        assert_eq!(cfg.health_port, 8000);
    }

    #[test]
    fn test_default_alert_config_has_no_active_channels() {
        let cfg = AlertConfig::default();
        assert!(cfg.telegram_bot_token.is_none());
        assert!(cfg.webhook_url.is_none());
        assert!(cfg.whatsapp_token.is_none());
        assert_eq!(cfg.whatsapp_api_url, "http://evolution-api:8080");
        assert_eq!(cfg.whatsapp_instance, "ping-monitor");
        assert_eq!(cfg.environment, "production");
    }
}
