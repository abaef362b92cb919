//! Repository access for the application layer

use std::sync::Arc;

use crate::domain::booking::BookingRepository;
use crate::domain::location::LocationRepository;
use crate::domain::user::UserRepository;
use crate::shared::errors::DomainError;

pub type DomainResult<T> = Result<T, DomainError>;

/// Single handle the services use to reach every repository. Implemented
/// by both the in-memory store and the database layer.
pub trait RepositoryProvider: Send + Sync {
    fn locations(&self) -> Arc<dyn LocationRepository>;
    fn bookings(&self) -> Arc<dyn BookingRepository>;
    fn users(&self) -> Arc<dyn UserRepository>;
}
