use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Files loaded once at startup and embedded into every widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_bold_font")]
    pub bold_font: PathBuf,
    #[serde(default = "default_regular_font")]
    pub regular_font: PathBuf,
    #[serde(default = "default_background")]
    pub background: PathBuf,
    #[serde(default = "default_dark_background")]
    pub dark_background: PathBuf,
    #[serde(default = "default_inverted_background")]
    pub inverted_background: PathBuf,
    #[serde(default = "default_logo")]
    pub logo: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// How long a rendered widget is served from memory before regeneration
    #[serde(default = "default_widget_cache_ttl", with = "duration_serde::duration")]
    pub cache_ttl: Duration,
    /// Maximum number of rendered widgets kept in memory
    #[serde(default = "default_widget_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_avatar_cdn_base_url")]
    pub cdn_base_url: String,
    #[serde(default = "default_avatar_size")]
    pub size: u32,
    #[serde(default = "default_avatar_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
}

/// Sample deliveries sent by the test webhook endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Name the payloads are signed with
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Public site root, used for bot links and the logo
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_webhook_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
}

// Database defaults
fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Asset defaults
fn default_bold_font() -> PathBuf {
    PathBuf::from(DEFAULT_BOLD_FONT_PATH)
}

fn default_regular_font() -> PathBuf {
    PathBuf::from(DEFAULT_REGULAR_FONT_PATH)
}

fn default_background() -> PathBuf {
    PathBuf::from(DEFAULT_BACKGROUND_PATH)
}

fn default_dark_background() -> PathBuf {
    PathBuf::from(DEFAULT_DARK_BACKGROUND_PATH)
}

fn default_inverted_background() -> PathBuf {
    PathBuf::from(DEFAULT_INVERTED_BACKGROUND_PATH)
}

fn default_logo() -> PathBuf {
    PathBuf::from(DEFAULT_LOGO_PATH)
}

// Widget defaults
fn default_widget_cache_ttl() -> Duration {
    humantime::parse_duration(DEFAULT_WIDGET_CACHE_TTL).unwrap_or(Duration::from_secs(15 * 60))
}

fn default_widget_cache_capacity() -> usize {
    DEFAULT_WIDGET_CACHE_CAPACITY
}

// Avatar defaults
fn default_avatar_cdn_base_url() -> String {
    DEFAULT_AVATAR_CDN_BASE_URL.to_string()
}

fn default_avatar_size() -> u32 {
    DEFAULT_AVATAR_SIZE
}

fn default_avatar_timeout() -> Duration {
    humantime::parse_duration(DEFAULT_AVATAR_TIMEOUT).unwrap_or(Duration::from_secs(10))
}

// Webhook defaults
fn default_site_name() -> String {
    DEFAULT_SITE_NAME.to_string()
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_webhook_timeout() -> Duration {
    humantime::parse_duration(DEFAULT_WEBHOOK_TIMEOUT).unwrap_or(Duration::from_secs(10))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: Some(DEFAULT_MAX_CONNECTIONS),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            bold_font: default_bold_font(),
            regular_font: default_regular_font(),
            background: default_background(),
            dark_background: default_dark_background(),
            inverted_background: default_inverted_background(),
            logo: default_logo(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_widget_cache_ttl(),
            cache_capacity: default_widget_cache_capacity(),
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            cdn_base_url: default_avatar_cdn_base_url(),
            size: default_avatar_size(),
            timeout: default_avatar_timeout(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            site_url: default_site_url(),
            timeout: default_webhook_timeout(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.web.port, DEFAULT_PORT);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.widget.cache_ttl, Duration::from_secs(900));
        assert_eq!(config.widget.cache_capacity, DEFAULT_WIDGET_CACHE_CAPACITY);
        assert_eq!(config.avatar.size, 256);
        assert_eq!(config.webhook.site_name, DEFAULT_SITE_NAME);
        assert_eq!(config.webhook.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_partial_sections_are_merged_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            port = 8080

            [widget]
            cache_ttl = "1m"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, DEFAULT_HOST);
        assert_eq!(config.widget.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.widget.cache_capacity, DEFAULT_WIDGET_CACHE_CAPACITY);
    }

    #[test]
    #[traced_test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::load_from_file(path).unwrap();

        assert_eq!(config.web.port, DEFAULT_PORT);
        assert!(std::path::Path::new(path).exists());
        assert!(logs_contain("Created default config file"));

        let reloaded = Config::load_from_file(path).unwrap();
        assert_eq!(reloaded.widget.cache_ttl, config.widget.cache_ttl);
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.widget.cache_ttl, Config::default().widget.cache_ttl);
        assert_eq!(parsed.assets.logo, PathBuf::from(DEFAULT_LOGO_PATH));
    }
}
