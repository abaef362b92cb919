//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub location_id: String,
    pub location_name: String,

    /// Unit size: small, medium, large
    pub unit_size: String,

    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    /// Whole rupiah
    pub total_price: i64,

    /// Service type: self-dropoff, pickup
    pub service_type: String,

    #[sea_orm(nullable)]
    pub pickup_address: Option<String>,
    #[sea_orm(nullable)]
    pub pickup_fee: Option<i64>,

    /// Payment method: online, on-site
    pub payment_method: String,
    /// Payment status: paid, unpaid_on_site
    pub payment_status: String,
    /// Booking status: active, checked_in, completed, cancelled
    pub booking_status: String,

    pub user_id: String,
    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub original_booking_id: Option<String>,
    pub is_extension: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
