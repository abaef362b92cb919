//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::location::LocationRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::location_repository::SeaOrmLocationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
pub struct SeaOrmRepositoryProvider {
    locations: Arc<SeaOrmLocationRepository>,
    bookings: Arc<SeaOrmBookingRepository>,
    users: Arc<SeaOrmUserRepository>,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            locations: Arc::new(SeaOrmLocationRepository::new(db.clone())),
            bookings: Arc::new(SeaOrmBookingRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db)),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn locations(&self) -> Arc<dyn LocationRepository> {
        self.locations.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }
}
