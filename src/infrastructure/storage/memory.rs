//! In-memory storage backend
//!
//! DashMap-backed implementation of every repository, used by tests and
//! by the `memory` database mode for local development. The conditional
//! updates rely on DashMap's per-shard locking: `get_mut` holds the shard
//! write lock for the duration of the compare and the write, which makes
//! each compare-and-set atomic.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;

use crate::domain::booking::{BookingRepository, BookingStatus, Reservation};
use crate::domain::location::{Location, LocationRepository};
use crate::domain::user::{UserProfile, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    locations: Arc<DashMap<String, Location>>,
    bookings: Arc<DashMap<String, Reservation>>,
    users: Arc<DashMap<String, UserProfile>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationRepository for InMemoryStorage {
    async fn save(&self, location: Location) -> DomainResult<()> {
        debug!("Saving location {}", location.id);
        self.locations.insert(location.id.clone(), location);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Location>> {
        Ok(self.locations.get(id).map(|e| e.value().clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Location>> {
        Ok(self.locations.iter().map(|e| e.value().clone()).collect())
    }

    async fn compare_and_set_capacity(
        &self,
        id: &str,
        expected: i32,
        new: i32,
    ) -> DomainResult<bool> {
        match self.locations.get_mut(id) {
            Some(mut entry) => {
                if entry.capacity != expected {
                    return Ok(false);
                }
                entry.capacity = new;
                Ok(true)
            }
            None => Err(DomainError::NotFound {
                entity: "Location",
                field: "id",
                value: id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryStorage {
    async fn save(&self, reservation: Reservation) -> DomainResult<()> {
        debug!("Saving reservation {}", reservation.id);
        self.bookings.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.bookings.get(id).map(|e| e.value().clone()))
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let mut result: Vec<Reservation> = self
            .bookings
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.bookings.iter().map(|e| e.value().clone()).collect())
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        match self.bookings.get_mut(id) {
            Some(mut entry) => {
                entry.booking_status = status;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            }),
        }
    }

    async fn merge_extension(
        &self,
        id: &str,
        expected_end: DateTime<Utc>,
        expected_total: i64,
        new_end: DateTime<Utc>,
        added_price: i64,
    ) -> DomainResult<bool> {
        match self.bookings.get_mut(id) {
            Some(mut entry) => {
                if entry.end_date != expected_end || entry.total_price != expected_total {
                    return Ok(false);
                }
                entry.end_date = new_end;
                entry.total_price = expected_total + added_price;
                Ok(true)
            }
            None => Err(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn save(&self, user: UserProfile) -> DomainResult<()> {
        debug!("Saving user {}", user.id);
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.users.get(id).map(|e| e.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().email.eq_ignore_ascii_case(email))
            .map(|e| e.value().clone()))
    }

    async fn update_contact(&self, id: &str, name: &str, phone: &str) -> DomainResult<()> {
        match self.users.get_mut(id) {
            Some(mut entry) => {
                entry.name = name.to_string();
                entry.phone = phone.to_string();
                Ok(())
            }
            None => Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            }),
        }
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn locations(&self) -> Arc<dyn LocationRepository> {
        Arc::new(self.clone())
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        Arc::new(self.clone())
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(self.clone())
    }
}

// ── Tests ──────────────────────────────────────────────────────
