//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::user::{UserProfile, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user;

use super::db_err;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: user::Model) -> UserProfile {
    UserProfile {
        id: m.id,
        name: m.name,
        email: m.email,
        phone: m.phone,
        password_hash: m.password_hash,
        created_at: m.created_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, u: UserProfile) -> DomainResult<()> {
        debug!("Saving user: {}", u.id);
        let model = user::ActiveModel {
            id: Set(u.id),
            name: Set(u.name),
            email: Set(u.email),
            phone: Set(u.phone),
            password_hash: Set(u.password_hash),
            created_at: Set(u.created_at),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_ascii_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update_contact(&self, id: &str, name: &str, phone: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        };
        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.phone = Set(phone.to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
