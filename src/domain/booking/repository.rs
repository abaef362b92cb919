//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{BookingStatus, Reservation};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new reservation row (extensions are new rows too)
    async fn save(&self, reservation: Reservation) -> DomainResult<()>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations belonging to a user, newest first
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;

    /// All reservations (any user, any status)
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// Change the lifecycle status of a reservation
    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()>;

    /// Conditionally merge an extension into the original row.
    ///
    /// Sets `end_date = new_end` and `total_price = expected_total +
    /// added_price` iff the row still holds `(expected_end,
    /// expected_total)`. Returns `false` when a concurrent writer changed
    /// the row first; the caller re-reads and retries.
    async fn merge_extension(
        &self,
        id: &str,
        expected_end: DateTime<Utc>,
        expected_total: i64,
        new_end: DateTime<Utc>,
        added_price: i64,
    ) -> DomainResult<bool>;
}
