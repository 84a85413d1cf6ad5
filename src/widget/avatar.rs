//! Bot avatar download from the Discord CDN

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::assets::EncodedImage;
use crate::config::AvatarConfig;
use crate::errors::{WidgetError, WidgetResult};
use crate::models::BotRecord;

/// Supplies the avatar image embedded into a bot's widget
#[async_trait]
pub trait AvatarSource: Send + Sync {
    async fn fetch(&self, bot: &BotRecord) -> WidgetResult<EncodedImage>;
}

#[derive(Clone)]
pub struct CdnAvatarClient {
    client: reqwest::Client,
    base_url: String,
    size: u32,
}

impl CdnAvatarClient {
    pub fn new(config: &AvatarConfig) -> WidgetResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| WidgetError::upstream_fetch(&config.cdn_base_url, e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.cdn_base_url.trim_end_matches('/').to_string(),
            size: config.size,
        })
    }

    /// Animated hashes (`a_` prefix) are served as GIF, others as PNG; bots
    /// without an avatar get the first default avatar.
    pub fn avatar_url(&self, bot: &BotRecord) -> String {
        match bot.avatar.as_deref() {
            Some(hash) if !hash.is_empty() => {
                let extension = if hash.starts_with("a_") { "gif" } else { "png" };
                format!(
                    "{}/avatars/{}/{}.{}?size={}",
                    self.base_url, bot.id, hash, extension, self.size
                )
            }
            _ => format!("{}/embed/avatars/0.png", self.base_url),
        }
    }
}

#[async_trait]
impl AvatarSource for CdnAvatarClient {
    async fn fetch(&self, bot: &BotRecord) -> WidgetResult<EncodedImage> {
        let url = self.avatar_url(bot);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WidgetError::upstream_fetch(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::upstream_fetch(&url, format!("HTTP {status}")));
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .filter(|value| value.starts_with("image/"))
            .map(str::to_string)
            .unwrap_or_else(|| {
                if url.contains(".gif") { "image/gif" } else { "image/png" }.to_string()
            });

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WidgetError::upstream_fetch(&url, e.to_string()))?;

        debug!(bot_id = %bot.id, %url, bytes = bytes.len(), "Fetched avatar");

        Ok(EncodedImage::from_bytes(mime, &bytes))
    }
}
