//! Create bookings table
//!
//! Reservation ledger. Extensions land as their own rows referencing the
//! original booking, whose end date and total are merged in place.

use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_locations::Locations;
use super::m20240301_000002_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::LocationId).string().not_null())
                    .col(ColumnDef::new(Bookings::LocationName).string().not_null())
                    .col(ColumnDef::new(Bookings::UnitSize).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::ServiceType).string().not_null())
                    .col(ColumnDef::new(Bookings::PickupAddress).string())
                    .col(ColumnDef::new(Bookings::PickupFee).big_integer())
                    .col(ColumnDef::new(Bookings::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentStatus).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::BookingStatus)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Bookings::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::OriginalBookingId).string())
                    .col(
                        ColumnDef::new(Bookings::IsExtension)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_location")
                            .from(Bookings::Table, Bookings::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::BookingStatus)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_end_date")
                    .table(Bookings::Table)
                    .col(Bookings::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    LocationId,
    LocationName,
    UnitSize,
    StartDate,
    EndDate,
    TotalPrice,
    ServiceType,
    PickupAddress,
    PickupFee,
    PaymentMethod,
    PaymentStatus,
    BookingStatus,
    UserId,
    CreatedAt,
    OriginalBookingId,
    IsExtension,
}
