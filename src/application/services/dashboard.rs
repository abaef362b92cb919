//! Customer dashboard read-model
//!
//! The dashboard shows a user's reservations with the expiring ones on
//! top. Snapshots are always derived fresh from the full reservation set;
//! the watcher recomputes one whenever a relevant event lands on the bus
//! instead of patching the previous view.

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::expiry::{scan_expiring, ExpiringBooking};
use crate::domain::booking::{BookingRepository, Reservation};
use crate::domain::DomainResult;
use crate::notifications::{EventSubscriber, SharedEventBus};

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Newest first
    pub reservations: Vec<Reservation>,
    /// Soonest first
    pub expiring: Vec<ExpiringBooking>,
}

pub struct DashboardService {
    bookings: Arc<dyn BookingRepository>,
    events: SharedEventBus,
}

impl DashboardService {
    pub fn new(bookings: Arc<dyn BookingRepository>, events: SharedEventBus) -> Self {
        Self { bookings, events }
    }

    pub async fn snapshot(&self, user_id: &str) -> DomainResult<DashboardSnapshot> {
        let reservations = self.bookings.find_for_user(user_id).await?;
        let expiring = scan_expiring(&reservations, Utc::now());
        Ok(DashboardSnapshot {
            reservations,
            expiring,
        })
    }

    /// Live view for one user. Each relevant bus event produces a fresh
    /// snapshot.
    pub fn watch(&self, user_id: impl Into<String>) -> DashboardWatcher {
        DashboardWatcher {
            user_id: user_id.into(),
            bookings: self.bookings.clone(),
            subscriber: self.events.subscribe(),
        }
    }
}

pub struct DashboardWatcher {
    user_id: String,
    bookings: Arc<dyn BookingRepository>,
    subscriber: EventSubscriber,
}

impl DashboardWatcher {
    /// Wait for the next event concerning this user and return the
    /// recomputed snapshot. `None` when the bus shuts down.
    pub async fn next(&mut self) -> Option<DomainResult<DashboardSnapshot>> {
        loop {
            let message = self.subscriber.recv().await?;
            match message.event.user_id() {
                Some(user) if user == self.user_id => {}
                Some(_) => continue,
                // capacity changes and errors refresh everyone
                None => {}
            }
            let snapshot = async {
                let reservations = self.bookings.find_for_user(&self.user_id).await?;
                let expiring = scan_expiring(&reservations, Utc::now());
                Ok(DashboardSnapshot {
                    reservations,
                    expiring,
                })
            }
            .await;
            return Some(snapshot);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{
        BookingStatus, PaymentMethod, PaymentStatus, ServiceType, UnitSize,
    };
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::notifications::{create_event_bus, Event};
    use chrono::Duration;

    fn reservation(id: &str, user_id: &str, end_in: Duration) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: id.into(),
            location_id: "loc-1".into(),
            location_name: "Kuta Storage Hub".into(),
            unit_size: UnitSize::Small,
            start_date: now - Duration::days(1),
            end_date: now + end_in,
            total_price: 75_000,
            service_type: ServiceType::SelfDropoff,
            pickup_details: None,
            payment_method: PaymentMethod::OnSite,
            payment_status: PaymentStatus::UnpaidOnSite,
            booking_status: BookingStatus::Active,
            user_id: user_id.into(),
            created_at: now - Duration::days(1),
            original_booking_id: None,
            is_extension: false,
        }
    }

    #[tokio::test]
    async fn snapshot_splits_out_expiring() {
        let storage = InMemoryStorage::new();
        storage
            .bookings()
            .save(reservation("soon", "user-1", Duration::days(2)))
            .await
            .unwrap();
        storage
            .bookings()
            .save(reservation("later", "user-1", Duration::days(30)))
            .await
            .unwrap();
        let service = DashboardService::new(storage.bookings(), create_event_bus());

        let snapshot = service.snapshot("user-1").await.unwrap();
        assert_eq!(snapshot.reservations.len(), 2);
        assert_eq!(snapshot.expiring.len(), 1);
        assert_eq!(snapshot.expiring[0].reservation.id, "soon");
    }

    #[tokio::test]
    async fn watcher_refreshes_on_own_events_only() {
        let storage = InMemoryStorage::new();
        let bus = create_event_bus();
        let service = DashboardService::new(storage.bookings(), bus.clone());
        let mut watcher = service.watch("user-1");

        // someone else's booking is ignored
        bus.publish(Event::BookingCreated {
            booking_id: "bk-other".into(),
            user_id: "user-2".into(),
            location_id: "loc-1".into(),
            total_price: 75_000,
        });
        // then ours lands
        storage
            .bookings()
            .save(reservation("bk-1", "user-1", Duration::days(3)))
            .await
            .unwrap();
        bus.publish(Event::BookingCreated {
            booking_id: "bk-1".into(),
            user_id: "user-1".into(),
            location_id: "loc-1".into(),
            total_price: 75_000,
        });

        let snapshot = tokio::time::timeout(std::time::Duration::from_millis(200), watcher.next())
            .await
            .expect("Timeout")
            .expect("Bus closed")
            .unwrap();
        assert_eq!(snapshot.reservations.len(), 1);
        assert_eq!(snapshot.reservations[0].id, "bk-1");
    }
}
