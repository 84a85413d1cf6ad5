/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/botlist.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

// Asset defaults
pub const DEFAULT_BOLD_FONT_PATH: &str = "./assets/fonts/bold.ttf";
pub const DEFAULT_REGULAR_FONT_PATH: &str = "./assets/fonts/regular.ttf";
pub const DEFAULT_BACKGROUND_PATH: &str = "./assets/images/background.svg";
pub const DEFAULT_DARK_BACKGROUND_PATH: &str = "./assets/images/background-dark.svg";
pub const DEFAULT_INVERTED_BACKGROUND_PATH: &str = "./assets/images/background-inverted.svg";
pub const DEFAULT_LOGO_PATH: &str = "./assets/images/logo.png";

// Widget defaults
pub const DEFAULT_WIDGET_CACHE_TTL: &str = "15m";
pub const DEFAULT_WIDGET_CACHE_CAPACITY: usize = 1024;

// Avatar CDN defaults
pub const DEFAULT_AVATAR_CDN_BASE_URL: &str = "https://cdn.discordapp.com";
pub const DEFAULT_AVATAR_SIZE: u32 = 256;
pub const DEFAULT_AVATAR_TIMEOUT: &str = "10s";

// Test webhook defaults
pub const DEFAULT_SITE_NAME: &str = "botlist.space";
pub const DEFAULT_SITE_URL: &str = "https://botlist.space";
pub const DEFAULT_WEBHOOK_TIMEOUT: &str = "10s";
