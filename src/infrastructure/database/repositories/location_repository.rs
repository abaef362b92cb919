//! SeaORM implementation of LocationRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::location::{GeoPoint, Location, LocationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::location;

use super::db_err;

pub struct SeaOrmLocationRepository {
    db: DatabaseConnection,
}

impl SeaOrmLocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: location::Model) -> Location {
    Location {
        id: m.id,
        name: m.name,
        address: m.address,
        geolocation: GeoPoint {
            latitude: m.latitude,
            longitude: m.longitude,
        },
        capacity: m.capacity,
        features: serde_json::from_str(&m.features).unwrap_or_default(),
        image_url: m.image_url,
    }
}

fn domain_to_active(l: &Location) -> location::ActiveModel {
    location::ActiveModel {
        id: Set(l.id.clone()),
        name: Set(l.name.clone()),
        address: Set(l.address.clone()),
        latitude: Set(l.geolocation.latitude),
        longitude: Set(l.geolocation.longitude),
        capacity: Set(l.capacity),
        features: Set(serde_json::to_string(&l.features).unwrap_or_else(|_| "[]".to_string())),
        image_url: Set(l.image_url.clone()),
    }
}

// ── LocationRepository impl ─────────────────────────────────────

#[async_trait]
impl LocationRepository for SeaOrmLocationRepository {
    async fn save(&self, l: Location) -> DomainResult<()> {
        debug!("Saving location: {}", l.id);

        let existing = location::Entity::find_by_id(&l.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let model = domain_to_active(&l);
        if existing.is_some() {
            model.update(&self.db).await.map_err(db_err)?;
        } else {
            model.insert(&self.db).await.map_err(db_err)?;
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Location>> {
        let model = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Location>> {
        let models = location::Entity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn compare_and_set_capacity(
        &self,
        id: &str,
        expected: i32,
        new: i32,
    ) -> DomainResult<bool> {
        // single conditional UPDATE, the row count tells us who won
        let result = location::Entity::update_many()
            .col_expr(location::Column::Capacity, Expr::value(new))
            .filter(location::Column::Id.eq(id))
            .filter(location::Column::Capacity.eq(expected))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 1 {
            return Ok(true);
        }
        let exists = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if exists {
            Ok(false)
        } else {
            Err(DomainError::NotFound {
                entity: "Location",
                field: "id",
                value: id.to_string(),
            })
        }
    }
}
