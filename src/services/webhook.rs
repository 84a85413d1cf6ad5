//! Sample upvote deliveries for bot owners testing their webhook receivers
//!
//! Discord webhook URLs get an embed message, every other URL gets the JSON
//! upvote body real upvotes are delivered with, filled with placeholder data.

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::WebhookConfig;
use crate::errors::WebhookError;

const FORBIDDEN_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];
const DISCORD_HOSTS: [&str; 2] = ["discordapp.com", "discord.com"];
const PLACEHOLDER_ID: &str = "xxxxxxxxxxxx";
const PLACEHOLDER_AUTHORIZATION: &str = "xxxxxxxxxxxxxxxxxxxxxxxxxxx";
const SAMPLE_USER_AVATAR: &str = "https://cdn.discordapp.com/avatars/508415615036424192/c353400784a3bf7a261c103438cd1456.png?size=256";
const EMBED_COLOR: u32 = 0x222222;

/// Payload shape picked for a receiver URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTarget {
    Discord,
    Generic,
}

/// Validates a caller supplied receiver URL and picks the payload for it
pub fn classify(url: Option<&str>) -> Result<(&str, WebhookTarget), WebhookError> {
    let url = url
        .filter(|url| !url.is_empty())
        .ok_or(WebhookError::MissingUrl)?;

    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return Err(WebhookError::InvalidScheme);
    };

    if FORBIDDEN_HOSTS.iter().any(|host| url.contains(host)) {
        return Err(WebhookError::ForbiddenHost);
    }

    let target = if is_discord_webhook(rest) {
        WebhookTarget::Discord
    } else {
        WebhookTarget::Generic
    };
    Ok((url, target))
}

/// `<discord host>/api/webhooks/<numeric id>/<token>`
fn is_discord_webhook(rest: &str) -> bool {
    DISCORD_HOSTS.iter().any(|host| {
        rest.strip_prefix(host)
            .and_then(|path| path.strip_prefix("/api/webhooks/"))
            .and_then(|path| path.split_once('/'))
            .is_some_and(|(id, _)| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    })
}

#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    site_name: String,
    site_url: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build webhook HTTP client")?;

        Ok(Self::with_client(client, config))
    }

    /// Uses a preconfigured HTTP client, e.g. one with DNS overrides
    pub fn with_client(client: reqwest::Client, config: &WebhookConfig) -> Self {
        Self {
            client,
            site_name: config.site_name.clone(),
            site_url: config.site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Posts a sample upvote to `url`. Any transport failure or non-2xx answer
    /// is reported as [`WebhookError::Delivery`].
    pub async fn send_test(
        &self,
        url: Option<&str>,
        bot_id: Option<&str>,
    ) -> Result<WebhookTarget, WebhookError> {
        let (url, target) = classify(url)?;
        let bot_id = bot_id.filter(|id| !id.is_empty()).unwrap_or(PLACEHOLDER_ID);
        let now = Utc::now();

        debug!(%url, ?target, bot_id, "Sending test webhook");

        let request = match target {
            WebhookTarget::Discord => self.client.post(url).json(&self.discord_payload(bot_id, now)),
            WebhookTarget::Generic => self
                .client
                .post(url)
                .header(
                    USER_AGENT,
                    format!("{} Webhooks ({})", self.site_name, self.site_url),
                )
                .header(AUTHORIZATION, PLACEHOLDER_AUTHORIZATION)
                .json(&self.upvote_payload(bot_id, now)),
        };

        request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| WebhookError::Delivery(e.to_string()))?;

        info!(?target, bot_id, "Test webhook delivered");
        Ok(target)
    }

    fn logo_url(&self) -> String {
        format!("{}/img/logo.png", self.site_url)
    }

    fn discord_payload(&self, bot_id: &str, now: DateTime<Utc>) -> Value {
        json!({
            "username": self.site_name,
            "avatar_url": self.logo_url(),
            "embeds": [{
                "title": format!("{} Upvote", self.site_name),
                "color": EMBED_COLOR,
                "url": format!("{}/bot/{}", self.site_url, bot_id),
                "fields": [
                    { "name": "User", "value": "SomeUser#1234", "inline": true },
                    { "name": "Bot", "value": "MyBot#9876", "inline": true }
                ],
                "thumbnail": { "url": self.logo_url() },
                "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true)
            }]
        })
    }

    fn upvote_payload(&self, bot_id: &str, now: DateTime<Utc>) -> Value {
        json!({
            "bot": bot_id,
            "site": self.site_name,
            "timestamp": now.timestamp_millis(),
            "user": {
                "id": PLACEHOLDER_ID,
                "username": "SomeUser",
                "discriminator": "1234",
                "avatar": SAMPLE_USER_AVATAR,
                "short_description": "I'm just an example user, I don't really exist."
            }
        })
    }
}
