//! Domain model: entities, value objects and repository interfaces

pub mod booking;
pub mod location;
pub mod pricing;
pub mod repositories;
pub mod user;

pub use crate::shared::errors::DomainError;
pub use repositories::{DomainResult, RepositoryProvider};
