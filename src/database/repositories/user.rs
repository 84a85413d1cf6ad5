//! SeaORM-based user repository

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{prelude::Users, users};
use crate::errors::RepositoryResult;
use crate::models::UserSummary;

#[derive(Clone)]
pub struct UserSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl UserSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<UserSummary>> {
        let model = Users::find_by_id(id.to_string())
            .one(&*self.connection)
            .await?;
        Ok(model.map(Self::model_to_domain))
    }

    /// Batch lookup keyed by id; unknown ids are simply absent from the map
    pub async fn find_many(&self, ids: &[String]) -> RepositoryResult<HashMap<String, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = Users::find()
            .filter(users::Column::Id.is_in(ids.iter().cloned()))
            .all(&*self.connection)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (m.id.clone(), Self::model_to_domain(m)))
            .collect())
    }

    pub async fn insert(&self, user: &UserSummary) -> RepositoryResult<UserSummary> {
        let active_model = users::ActiveModel {
            id: Set(user.id.clone()),
            username: Set(user.username.clone()),
            discriminator: Set(user.discriminator.clone()),
            avatar: Set(user.avatar.clone()),
            short_description: Set(user.short_description.clone()),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    fn model_to_domain(model: users::Model) -> UserSummary {
        UserSummary {
            id: model.id,
            username: model.username,
            discriminator: model.discriminator,
            avatar: model.avatar,
            short_description: model.short_description,
        }
    }
}
