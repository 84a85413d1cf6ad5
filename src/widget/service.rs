//! Widget orchestration: lookup, cache, single flight and generation

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::assets::WidgetAssets;
use super::avatar::AvatarSource;
use super::cache::{CacheEntry, CacheKey, WidgetCache};
use super::frame::stack_blocks;
use super::layout::{TextLayout, layout_text};
use super::optimizer::optimize;
use super::options::WidgetOptions;
use super::style::{StyleRegistry, WidgetBindings};
use crate::config::WidgetConfig;
use crate::database::repositories::BotSeaOrmRepository;
use crate::errors::{WidgetError, WidgetResult};
use crate::models::{BotRecord, Uptime};
use crate::utils::short_number;

pub const TEXT_MAX_WIDTH: f64 = 322.0;
pub const TITLE_FONT_SIZE: f64 = 36.0;
pub const BODY_FONT_SIZE: f64 = 16.0;
pub const DESCRIPTION_MAX_LINES: usize = 3;
const SHORT_NUMBER_PRECISION: f64 = 0.01;

/// Snapshot of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WidgetStats {
    pub hits: u64,
    pub misses: u64,
    pub generated: u64,
    pub cached: usize,
}

/// The three text blocks of a card before they are stacked
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub title: TextLayout,
    pub description: TextLayout,
    pub stats: TextLayout,
}

pub struct WidgetService {
    bots: BotSeaOrmRepository,
    avatars: Arc<dyn AvatarSource>,
    assets: WidgetAssets,
    styles: StyleRegistry,
    cache: WidgetCache,
    ttl: Duration,
    in_flight: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    generated: AtomicU64,
}

impl WidgetService {
    pub fn new(
        bots: BotSeaOrmRepository,
        avatars: Arc<dyn AvatarSource>,
        assets: WidgetAssets,
        styles: StyleRegistry,
        config: &WidgetConfig,
    ) -> Self {
        Self {
            bots,
            avatars,
            assets,
            styles,
            cache: WidgetCache::new(config.cache_capacity),
            ttl: config.cache_ttl,
            in_flight: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            generated: AtomicU64::new(0),
        }
    }

    /// Returns the optimised SVG for `bot_ref` (id or vanity slug) drawn in
    /// `style`, serving a fresh cached copy when one exists.
    ///
    /// Concurrent misses for the same key wait on one generation instead of
    /// each producing their own. Failures are never cached.
    pub async fn render<'a, I>(&self, bot_ref: &str, style: &str, query: I) -> WidgetResult<Bytes>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let bot = self
            .bots
            .find_by_id_or_vanity(bot_ref)
            .await?
            .ok_or_else(|| WidgetError::BotNotFound(bot_ref.to_string()))?;

        let options = WidgetOptions::from_query(query);

        if !self.styles.contains(style) {
            return Err(WidgetError::UnknownStyle(style.to_string()));
        }

        let key = CacheKey::new(&bot.id, style, &options);

        if let Some(svg) = self.fresh(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "Widget cache hit");
            return Ok(svg);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let flight = self.acquire_in_flight_lock(&key).await;
        let result = {
            let _guard = flight.lock().await;

            match self.fresh(&key).await {
                Some(svg) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(%key, "Widget generated by a concurrent request");
                    Ok(svg)
                }
                None => self.generate_and_store(&bot, style, &options, &key).await,
            }
        };
        self.release_in_flight_lock(&key, &flight).await;

        result
    }

    pub async fn stats(&self) -> WidgetStats {
        WidgetStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            cached: self.cache.len().await,
        }
    }

    /// Lays out the card text for `bot_ref` without rendering or caching it
    pub async fn layout(&self, bot_ref: &str) -> WidgetResult<CardLayout> {
        let bot = self
            .bots
            .find_by_id_or_vanity(bot_ref)
            .await?
            .ok_or_else(|| WidgetError::BotNotFound(bot_ref.to_string()))?;
        let uptime = self.bots.find_uptime(&bot.id).await?;

        Ok(self.layout_card(&bot, uptime.as_ref()))
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    async fn fresh(&self, key: &CacheKey) -> Option<Bytes> {
        self.cache
            .get(key)
            .await
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.svg)
    }

    async fn generate_and_store(
        &self,
        bot: &BotRecord,
        style: &str,
        options: &WidgetOptions,
        key: &CacheKey,
    ) -> WidgetResult<Bytes> {
        let svg = Bytes::from(self.generate(bot, style, options).await?);

        self.cache.set(key.clone(), CacheEntry::new(svg.clone())).await;
        self.generated.fetch_add(1, Ordering::Relaxed);
        info!(%key, bytes = svg.len(), "Generated widget");

        Ok(svg)
    }

    async fn generate(
        &self,
        bot: &BotRecord,
        style: &str,
        options: &WidgetOptions,
    ) -> WidgetResult<String> {
        let uptime = self.bots.find_uptime(&bot.id).await?;
        let avatar = self.avatars.fetch(bot).await?;

        let card = self.layout_card(bot, uptime.as_ref());
        let text = stack_blocks(&card.title, &card.description, &card.stats);

        let svg = self.styles.render(
            style,
            &WidgetBindings {
                bot,
                text: &text,
                options,
                avatar: &avatar,
                images: &self.assets.images,
            },
        )?;

        optimize(&svg)
    }

    fn layout_card(&self, bot: &BotRecord, uptime: Option<&Uptime>) -> CardLayout {
        CardLayout {
            title: layout_text(
                self.assets.bold.as_ref(),
                &bot.username,
                TITLE_FONT_SIZE,
                TEXT_MAX_WIDTH,
                1,
            ),
            description: layout_text(
                self.assets.regular.as_ref(),
                &bot.short_description,
                BODY_FONT_SIZE,
                TEXT_MAX_WIDTH,
                DESCRIPTION_MAX_LINES,
            ),
            stats: layout_text(
                self.assets.regular.as_ref(),
                &stats_line(bot, uptime),
                BODY_FONT_SIZE,
                TEXT_MAX_WIDTH,
                1,
            ),
        }
    }

    async fn acquire_in_flight_lock(&self, key: &CacheKey) -> Arc<Mutex<()>> {
        let mut guard = self.in_flight.lock().await;
        guard
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the map entry once no other request holds a handle to it.
    async fn release_in_flight_lock(&self, key: &CacheKey, flight: &Arc<Mutex<()>>) {
        let mut guard = self.in_flight.lock().await;
        let idle = guard
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, flight) && Arc::strong_count(flight) == 2);
        if idle {
            guard.remove(key);
        }
    }
}

/// `"<n> upvotes"`, then servers when known and non-zero, then uptime when
/// at least one check was recorded
pub fn stats_line(bot: &BotRecord, uptime: Option<&Uptime>) -> String {
    let mut line = format!(
        "{} upvotes",
        short_number(bot.upvote_count() as u64, SHORT_NUMBER_PRECISION)
    );

    if let Some(servers) = bot.effective_server_count().filter(|count| *count > 0) {
        line.push_str(&format!(
            "  |  {} servers",
            short_number(servers as u64, SHORT_NUMBER_PRECISION)
        ));
    }

    if let Some(percent) = uptime.and_then(Uptime::percent) {
        line.push_str(&format!("  |  {percent}% uptime"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Upvote, test_bot};
    use chrono::Utc;

    fn upvotes(count: usize) -> Vec<Upvote> {
        (0..count)
            .map(|i| Upvote {
                id: i.to_string(),
                timestamp: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_stats_line_upvotes_only() {
        let bot = test_bot("1");
        assert_eq!(stats_line(&bot, None), "0 upvotes");
    }

    #[test]
    fn test_stats_line_with_servers_and_uptime() {
        let mut bot = test_bot("1");
        bot.upvotes = upvotes(1234);
        bot.server_count = Some(1500);

        let line = stats_line(&bot, Some(&Uptime { online: 99, total: 100 }));

        assert_eq!(line, "1.23K upvotes  |  1.5K servers  |  99% uptime");
    }

    #[test]
    fn test_stats_line_sums_shards() {
        let mut bot = test_bot("1");
        bot.shards = Some(vec![10, 20, 30]);

        assert_eq!(stats_line(&bot, None), "0 upvotes  |  60 servers");
    }

    #[test]
    fn test_stats_line_skips_zero_servers_and_empty_uptime() {
        let mut bot = test_bot("1");
        bot.server_count = Some(0);

        let line = stats_line(&bot, Some(&Uptime { online: 0, total: 0 }));

        assert_eq!(line, "0 upvotes");
    }
}
