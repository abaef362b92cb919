//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::booking::{
    BookingRepository, BookingStatus, PaymentMethod, PaymentStatus, PickupDetails, Reservation,
    ServiceType, UnitSize,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::booking;

use super::db_err;

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> Reservation {
    let pickup_details = match (&m.pickup_address, m.pickup_fee) {
        (Some(address), Some(fee)) => Some(PickupDetails {
            address: address.clone(),
            fee,
        }),
        _ => None,
    };
    Reservation {
        id: m.id,
        location_id: m.location_id,
        location_name: m.location_name,
        unit_size: UnitSize::from_str(&m.unit_size),
        start_date: m.start_date,
        end_date: m.end_date,
        total_price: m.total_price,
        service_type: ServiceType::from_str(&m.service_type),
        pickup_details,
        payment_method: PaymentMethod::from_str(&m.payment_method),
        payment_status: PaymentStatus::from_str(&m.payment_status),
        booking_status: BookingStatus::from_str(&m.booking_status),
        user_id: m.user_id,
        created_at: m.created_at,
        original_booking_id: m.original_booking_id,
        is_extension: m.is_extension,
    }
}

fn domain_to_active(r: &Reservation) -> booking::ActiveModel {
    booking::ActiveModel {
        id: Set(r.id.clone()),
        location_id: Set(r.location_id.clone()),
        location_name: Set(r.location_name.clone()),
        unit_size: Set(r.unit_size.as_str().to_string()),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        total_price: Set(r.total_price),
        service_type: Set(r.service_type.as_str().to_string()),
        pickup_address: Set(r.pickup_details.as_ref().map(|p| p.address.clone())),
        pickup_fee: Set(r.pickup_details.as_ref().map(|p| p.fee)),
        payment_method: Set(r.payment_method.as_str().to_string()),
        payment_status: Set(r.payment_status.as_str().to_string()),
        booking_status: Set(r.booking_status.as_str().to_string()),
        user_id: Set(r.user_id.clone()),
        created_at: Set(r.created_at),
        original_booking_id: Set(r.original_booking_id.clone()),
        is_extension: Set(r.is_extension),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, r: Reservation) -> DomainResult<()> {
        debug!("Saving reservation: {}", r.id);
        domain_to_active(&r).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = booking::Entity::find()
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        let existing = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            });
        };
        let mut active: booking::ActiveModel = existing.into();
        active.booking_status = Set(status.as_str().to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn merge_extension(
        &self,
        id: &str,
        expected_end: DateTime<Utc>,
        expected_total: i64,
        new_end: DateTime<Utc>,
        added_price: i64,
    ) -> DomainResult<bool> {
        // conditional UPDATE on the expected end and total, losing a race
        // affects zero rows
        let result = booking::Entity::update_many()
            .col_expr(booking::Column::EndDate, Expr::value(new_end))
            .col_expr(
                booking::Column::TotalPrice,
                Expr::value(expected_total + added_price),
            )
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::EndDate.eq(expected_end))
            .filter(booking::Column::TotalPrice.eq(expected_total))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 1 {
            return Ok(true);
        }
        let exists = booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if exists {
            Ok(false)
        } else {
            Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
        }
    }
}
