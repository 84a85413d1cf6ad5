//! Domain models shared by the repositories, the widget pipeline and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single upvote cast on a bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upvote {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Bot document as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub approved: bool,
    pub avatar_child_friendly: bool,
    pub certified: bool,
    pub short_description: String,
    pub full_description: String,
    /// Library id
    pub library: Option<String>,
    pub links: serde_json::Value,
    pub prefix: String,
    /// Tag ids
    pub tags: Vec<String>,
    pub shards: Option<Vec<i64>>,
    pub server_count: Option<i64>,
    /// Owner user ids
    pub owners: Vec<String>,
    pub upvotes: Vec<Upvote>,
    pub vanity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BotRecord {
    pub fn upvote_count(&self) -> usize {
        self.upvotes.len()
    }

    /// Reported server count, falling back to the sum of per-shard counts.
    /// The sum saturates at `i64::MAX`.
    pub fn effective_server_count(&self) -> Option<i64> {
        self.server_count.or_else(|| {
            self.shards
                .as_ref()
                .map(|shards| shards.iter().fold(0i64, |total, n| total.saturating_add(*n)))
        })
    }
}

/// Public view of a user, also used for bot owners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub short_description: Option<String>,
}

/// Public view of a bot with library, tags and owners resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub approved: bool,
    pub avatar_child_friendly: bool,
    pub certified: bool,
    pub short_description: String,
    pub full_description: String,
    /// Library name
    pub library: Option<String>,
    pub links: serde_json::Value,
    pub prefix: String,
    /// Tag names
    pub tags: Vec<String>,
    pub shards: Option<Vec<i64>>,
    pub server_count: Option<i64>,
    pub owners: Vec<UserSummary>,
    pub vanity: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Online/total check counters for a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uptime {
    pub online: i64,
    pub total: i64,
}

impl Uptime {
    /// Fraction of checks that found the bot online, `None` before the first check
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.online as f64 / self.total as f64)
    }

    /// Whole percentage as shown on widgets
    pub fn percent(&self) -> Option<i64> {
        self.ratio().map(|ratio| (ratio * 100.0).round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_bots: u64,
    pub approved_bots: u64,
    pub unapproved_bots: u64,
    pub tags: u64,
    pub users: u64,
}

/// Minimal approved bot for tests
#[cfg(test)]
pub(crate) fn test_bot(id: &str) -> BotRecord {
    BotRecord {
        id: id.into(),
        username: "Bot".into(),
        discriminator: "0001".into(),
        avatar: None,
        approved: true,
        avatar_child_friendly: true,
        certified: false,
        short_description: String::new(),
        full_description: String::new(),
        library: None,
        links: serde_json::json!({}),
        prefix: "!".into(),
        tags: vec![],
        shards: None,
        server_count: None,
        owners: vec![],
        upvotes: vec![],
        vanity: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
