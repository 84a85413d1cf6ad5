//! SeaORM-based bot repository
//!
//! Bots reference libraries, tags and owners by id. Profiles are assembled by
//! loading the bots first and then batch loading every referenced row with one
//! `IN` query per table, preserving the order in which each bot lists them.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use super::user::UserSeaOrmRepository;
use crate::entities::bots::{ShardList, StringList, UpvoteList};
use crate::entities::prelude::{Bots, Libraries, Tags, Uptime as UptimeEntity, Users};
use crate::entities::{bots, libraries, tags, uptime};
use crate::errors::RepositoryResult;
use crate::models::{BotProfile, BotRecord, Statistics, Uptime};

#[derive(Clone)]
pub struct BotSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
    users: UserSeaOrmRepository,
}

impl BotSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        let users = UserSeaOrmRepository::new(connection.clone());
        Self { connection, users }
    }

    /// Find a bot by its primary id only
    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<BotRecord>> {
        let model = Bots::find_by_id(id.to_string())
            .one(&*self.connection)
            .await?;
        Ok(model.map(Self::model_to_domain))
    }

    /// Find a bot whose id or vanity slug equals `reference`.
    ///
    /// When one bot's id and another bot's vanity both match, the id wins.
    pub async fn find_by_id_or_vanity(&self, reference: &str) -> RepositoryResult<Option<BotRecord>> {
        let mut models = Bots::find()
            .filter(
                Condition::any()
                    .add(bots::Column::Id.eq(reference))
                    .add(bots::Column::Vanity.eq(reference)),
            )
            .all(&*self.connection)
            .await?;

        models.sort_by_key(|m| m.id != reference);
        Ok(models.into_iter().next().map(Self::model_to_domain))
    }

    pub async fn find_uptime(&self, bot_id: &str) -> RepositoryResult<Option<Uptime>> {
        let model = UptimeEntity::find_by_id(bot_id.to_string())
            .one(&*self.connection)
            .await?;
        Ok(model.map(|m| Uptime {
            online: m.online,
            total: m.total,
        }))
    }

    /// Joined public view of a single bot
    pub async fn find_profile(&self, id: &str) -> RepositoryResult<Option<BotProfile>> {
        let Some(model) = Bots::find_by_id(id.to_string())
            .one(&*self.connection)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.resolve_profiles(vec![model]).await?.into_iter().next())
    }

    /// Joined public view of every bot, oldest first
    pub async fn list_profiles(&self) -> RepositoryResult<Vec<BotProfile>> {
        let models = Bots::find()
            .order_by_asc(bots::Column::CreatedAt)
            .order_by_asc(bots::Column::Id)
            .all(&*self.connection)
            .await?;

        self.resolve_profiles(models).await
    }

    /// Joined public view of every bot listing `user_id` as an owner
    pub async fn profiles_by_owner(&self, user_id: &str) -> RepositoryResult<Vec<BotProfile>> {
        // Owners live in a JSON column, which has no portable containment query
        let models: Vec<bots::Model> = Bots::find()
            .order_by_asc(bots::Column::CreatedAt)
            .order_by_asc(bots::Column::Id)
            .all(&*self.connection)
            .await?
            .into_iter()
            .filter(|m| m.owners.0.iter().any(|owner| owner == user_id))
            .collect();

        self.resolve_profiles(models).await
    }

    pub async fn statistics(&self) -> RepositoryResult<Statistics> {
        let conn = &*self.connection;

        let total_bots = Bots::find().count(conn).await?;
        let approved_bots = Bots::find()
            .filter(bots::Column::Approved.eq(true))
            .count(conn)
            .await?;
        let tags = Tags::find().count(conn).await?;
        let users = Users::find().count(conn).await?;

        Ok(Statistics {
            total_bots,
            approved_bots,
            unapproved_bots: total_bots.saturating_sub(approved_bots),
            tags,
            users,
        })
    }

    pub async fn insert(&self, bot: &BotRecord) -> RepositoryResult<BotRecord> {
        let active_model = bots::ActiveModel {
            id: Set(bot.id.clone()),
            username: Set(bot.username.clone()),
            discriminator: Set(bot.discriminator.clone()),
            avatar: Set(bot.avatar.clone()),
            approved: Set(bot.approved),
            avatar_child_friendly: Set(bot.avatar_child_friendly),
            certified: Set(bot.certified),
            short_description: Set(bot.short_description.clone()),
            full_description: Set(bot.full_description.clone()),
            library: Set(bot.library.clone()),
            links: Set(bot.links.clone()),
            prefix: Set(bot.prefix.clone()),
            tags: Set(StringList(bot.tags.clone())),
            shards: Set(bot.shards.clone().map(ShardList)),
            server_count: Set(bot.server_count),
            owners: Set(StringList(bot.owners.clone())),
            upvotes: Set(UpvoteList(bot.upvotes.clone())),
            vanity: Set(bot.vanity.clone()),
            created_at: Set(bot.created_at),
            updated_at: Set(bot.updated_at),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    /// Insert or overwrite the uptime counters of a bot
    pub async fn save_uptime(&self, bot_id: &str, counters: Uptime) -> RepositoryResult<()> {
        let active_model = uptime::ActiveModel {
            id: Set(bot_id.to_string()),
            online: Set(counters.online),
            total: Set(counters.total),
        };

        UptimeEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(uptime::Column::Id)
                    .update_columns([uptime::Column::Online, uptime::Column::Total])
                    .to_owned(),
            )
            .exec(&*self.connection)
            .await?;
        Ok(())
    }

    pub async fn insert_tag(&self, id: &str, name: &str) -> RepositoryResult<()> {
        tags::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
        }
        .insert(&*self.connection)
        .await?;
        Ok(())
    }

    pub async fn insert_library(&self, id: &str, name: &str) -> RepositoryResult<()> {
        libraries::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
        }
        .insert(&*self.connection)
        .await?;
        Ok(())
    }

    async fn resolve_profiles(&self, models: Vec<bots::Model>) -> RepositoryResult<Vec<BotProfile>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: Vec<String> = models
            .iter()
            .flat_map(|m| m.owners.0.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let tag_ids: Vec<String> = models
            .iter()
            .flat_map(|m| m.tags.0.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let library_ids: Vec<String> = models
            .iter()
            .filter_map(|m| m.library.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let owners = self.users.find_many(&owner_ids).await?;
        let tag_names = self.tag_names(&tag_ids).await?;
        let library_names = self.library_names(&library_ids).await?;

        debug!(
            bots = models.len(),
            owners = owners.len(),
            tags = tag_names.len(),
            libraries = library_names.len(),
            "Resolved bot profile references"
        );

        Ok(models
            .into_iter()
            .map(|m| BotProfile {
                library: m
                    .library
                    .as_ref()
                    .and_then(|id| library_names.get(id).cloned()),
                tags: m
                    .tags
                    .0
                    .iter()
                    .filter_map(|id| tag_names.get(id).cloned())
                    .collect(),
                owners: m
                    .owners
                    .0
                    .iter()
                    .filter_map(|id| owners.get(id).cloned())
                    .collect(),
                id: m.id,
                username: m.username,
                discriminator: m.discriminator,
                avatar: m.avatar,
                approved: m.approved,
                avatar_child_friendly: m.avatar_child_friendly,
                certified: m.certified,
                short_description: m.short_description,
                full_description: m.full_description,
                links: m.links,
                prefix: m.prefix,
                shards: m.shards.map(|s| s.0),
                server_count: m.server_count,
                vanity: m.vanity,
                created_at: m.created_at,
                updated_at: m.updated_at,
            })
            .collect())
    }

    async fn tag_names(&self, ids: &[String]) -> RepositoryResult<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = Tags::find()
            .filter(tags::Column::Id.is_in(ids.iter().cloned()))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
    }

    async fn library_names(&self, ids: &[String]) -> RepositoryResult<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let models = Libraries::find()
            .filter(libraries::Column::Id.is_in(ids.iter().cloned()))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
    }

    fn model_to_domain(model: bots::Model) -> BotRecord {
        BotRecord {
            id: model.id,
            username: model.username,
            discriminator: model.discriminator,
            avatar: model.avatar,
            approved: model.approved,
            avatar_child_friendly: model.avatar_child_friendly,
            certified: model.certified,
            short_description: model.short_description,
            full_description: model.full_description,
            library: model.library,
            links: model.links,
            prefix: model.prefix,
            tags: model.tags.0,
            shards: model.shards.map(|s| s.0),
            server_count: model.server_count,
            owners: model.owners.0,
            upvotes: model.upvotes.0,
            vanity: model.vanity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
