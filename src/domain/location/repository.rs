//! Location repository interface

use async_trait::async_trait;

use super::model::Location;
use crate::domain::DomainResult;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Insert or replace a location
    async fn save(&self, location: Location) -> DomainResult<()>;

    /// Find location by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Location>>;

    /// All locations
    async fn find_all(&self) -> DomainResult<Vec<Location>>;

    /// Conditionally set capacity from `expected` to `new`.
    ///
    /// Returns `false` when the stored capacity no longer equals
    /// `expected`; the caller re-reads and retries.
    async fn compare_and_set_capacity(
        &self,
        id: &str,
        expected: i32,
        new: i32,
    ) -> DomainResult<bool>;
}
