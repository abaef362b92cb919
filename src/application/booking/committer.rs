//! Reservation committer
//!
//! Turns a validated draft into a durable reservation. The sequence is
//! fixed: resolve the account (provisioning one for guests), price the
//! draft, charge online payments, persist the row, then run the shared
//! state update (capacity decrement for new bookings, merge into the
//! original row for extensions) as an optimistic compare-and-set with
//! retries. A failure after payment leaves the written state as-is and is
//! surfaced for manual reconciliation; nothing here retries a charge.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::counter;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::application::identity::IdentityService;
use crate::application::ports::{PaymentGateway, PaymentOutcome};
use crate::domain::booking::{
    BookingStatus, PaymentMethod, PaymentStatus, PickupDetails, Reservation,
};
use crate::domain::pricing::{PriceBreakdown, PricingTable};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, SharedEventBus};
use crate::shared::retry::{retry_optimistic, Attempt, RetryConfig};

use super::draft::{BookingDraft, SessionContext};

const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BookingService {
    provider: Arc<dyn RepositoryProvider>,
    identity: Arc<IdentityService>,
    payment: Arc<dyn PaymentGateway>,
    pricing: PricingTable,
    events: SharedEventBus,
    retry: RetryConfig,
    network_timeout: Duration,
    /// Commit keys currently being processed, to swallow double submits
    in_flight: DashMap<String, ()>,
}

/// Removes the in-flight key on every exit path, success or failure.
struct CommitGuard<'a> {
    key: String,
    in_flight: &'a DashMap<String, ()>,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

impl BookingService {
    pub fn new(
        provider: Arc<dyn RepositoryProvider>,
        identity: Arc<IdentityService>,
        payment: Arc<dyn PaymentGateway>,
        pricing: PricingTable,
        events: SharedEventBus,
    ) -> Self {
        Self {
            provider,
            identity,
            payment,
            pricing,
            events,
            retry: RetryConfig::default(),
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            in_flight: DashMap::new(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Commit a draft. On success the returned reservation has been
    /// written and the shared state update applied; on failure the draft
    /// is untouched and the error says what the user can do next.
    #[instrument(skip(self, draft, session), fields(location_id = %draft.location_id, is_extension = draft.is_extension()))]
    pub async fn commit(
        &self,
        draft: &BookingDraft,
        session: &SessionContext,
    ) -> DomainResult<Reservation> {
        let _guard = self.acquire_commit_guard(draft, session)?;

        draft.validate_identity_step(session)?;
        if !draft.is_extension() {
            draft.validate_service_step()?;
        }

        let user_id = self.resolve_user(draft, session).await?;
        let breakdown = self.price(draft)?;
        let mut reservation = self.build_reservation(draft, &breakdown, user_id);

        if draft.payment_method == PaymentMethod::Online {
            self.charge(&breakdown).await?;
            reservation.payment_status = PaymentStatus::Paid;
        }

        self.with_timeout("persistence", self.provider.bookings().save(reservation.clone()))
            .await
            .map_err(|e| {
                counter!("bookings_commit_failures_total", "stage" => "persist").increment(1);
                e
            })?;

        let shared_update = if let Some(ctx) = &draft.extension {
            self.merge_into_original(&reservation, &ctx.original_id, &breakdown)
                .await
        } else {
            self.decrement_capacity(&reservation).await
        };
        if let Err(e) = shared_update {
            // The row is written and any charge captured. Surfaced for
            // manual reconciliation, never rolled back here.
            error!(
                booking_id = %reservation.id,
                error = %e,
                "Reservation written but shared state update failed"
            );
            self.events.publish(Event::Error {
                message: format!("Reconciliation needed for booking {}: {}", reservation.id, e),
            });
            counter!("bookings_commit_failures_total", "stage" => "shared_update").increment(1);
            return Err(e);
        }

        counter!("bookings_committed_total").increment(1);
        info!(
            booking_id = %reservation.id,
            total_price = reservation.total_price,
            "Reservation committed"
        );
        Ok(reservation)
    }

    /// One commit at a time per logical booking. Extensions key on the
    /// original row; new bookings key on who is booking where.
    fn acquire_commit_guard(
        &self,
        draft: &BookingDraft,
        session: &SessionContext,
    ) -> DomainResult<CommitGuard<'_>> {
        let key = match &draft.extension {
            Some(ctx) => format!("ext:{}", ctx.original_id),
            None => {
                let who = session
                    .user_id
                    .clone()
                    .unwrap_or_else(|| draft.guest_email.trim().to_ascii_lowercase());
                format!("new:{}:{}", who, draft.location_id)
            }
        };
        match self.in_flight.entry(key.clone()) {
            Entry::Occupied(_) => {
                warn!(key = %key, "Duplicate commit rejected");
                Err(DomainError::Conflict(
                    "This booking is already being submitted. Please wait.".to_string(),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(CommitGuard {
                    key,
                    in_flight: &self.in_flight,
                })
            }
        }
    }

    async fn resolve_user(
        &self,
        draft: &BookingDraft,
        session: &SessionContext,
    ) -> DomainResult<String> {
        if let Some(user_id) = &session.user_id {
            return Ok(user_id.clone());
        }
        if draft.is_extension() {
            return Err(DomainError::Validation(
                "Please log in to extend a booking.".to_string(),
            ));
        }
        let user = self
            .identity
            .provision_guest(
                draft.guest_name.trim(),
                draft.guest_email.trim(),
                draft.guest_phone.trim(),
            )
            .await?;
        Ok(user.id)
    }

    fn price(&self, draft: &BookingDraft) -> DomainResult<PriceBreakdown> {
        let (start, end) = match (draft.start_date, draft.end_date) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(DomainError::Validation(
                    "Please select both a start and an end date.".to_string(),
                ))
            }
        };
        Ok(self.pricing.quote(
            draft.unit_size,
            start,
            end,
            draft.service_type,
            draft.extension.as_ref(),
        ))
    }

    fn build_reservation(
        &self,
        draft: &BookingDraft,
        breakdown: &PriceBreakdown,
        user_id: String,
    ) -> Reservation {
        let pickup_details = if !draft.is_extension() && draft.is_pickup() {
            Some(PickupDetails {
                address: draft.pickup_address.clone().unwrap_or_default(),
                fee: breakdown.pickup_fee,
            })
        } else {
            None
        };

        Reservation {
            id: Uuid::new_v4().to_string(),
            location_id: draft.location_id.clone(),
            location_name: draft.location_name.clone(),
            unit_size: draft.unit_size,
            start_date: draft.start_date.unwrap_or_default(),
            end_date: draft.end_date.unwrap_or_default(),
            total_price: breakdown.total_price,
            service_type: draft.service_type,
            pickup_details,
            payment_method: draft.payment_method,
            payment_status: PaymentStatus::UnpaidOnSite,
            booking_status: BookingStatus::Active,
            user_id,
            created_at: chrono::Utc::now(),
            original_booking_id: draft.extension.as_ref().map(|c| c.original_id.clone()),
            is_extension: draft.is_extension(),
        }
    }

    async fn charge(&self, breakdown: &PriceBreakdown) -> DomainResult<()> {
        let outcome = self
            .with_timeout("payment", self.payment.charge(breakdown))
            .await?;
        match outcome {
            PaymentOutcome::Paid => Ok(()),
            PaymentOutcome::Declined(reason) => {
                counter!("bookings_commit_failures_total", "stage" => "payment").increment(1);
                Err(DomainError::PaymentFailed(reason))
            }
        }
    }

    /// Capacity decrement for a new booking. Floors at zero rather than
    /// rejecting, matching the storefront behavior of listing the
    /// location as full instead of failing a commit in flight.
    async fn decrement_capacity(&self, reservation: &Reservation) -> DomainResult<()> {
        let locations = self.provider.locations();
        let location_id = reservation.location_id.clone();

        let result = retry_optimistic(
            &self.retry,
            || {
                let locations = locations.clone();
                let location_id = location_id.clone();
                async move {
                    let location = locations.find_by_id(&location_id).await?.ok_or_else(|| {
                        DomainError::NotFound {
                            entity: "Location",
                            field: "id",
                            value: location_id.clone(),
                        }
                    })?;
                    let next = (location.capacity - 1).max(0);
                    if locations
                        .compare_and_set_capacity(&location_id, location.capacity, next)
                        .await?
                    {
                        Ok(Attempt::Won(next))
                    } else {
                        Ok(Attempt::Lost)
                    }
                }
            },
            "capacity_decrement",
        )
        .await?;

        match result {
            Some(capacity) => {
                self.events.publish(Event::LocationCapacityChanged {
                    location_id,
                    capacity,
                });
                self.events.publish(Event::BookingCreated {
                    booking_id: reservation.id.clone(),
                    user_id: reservation.user_id.clone(),
                    location_id: reservation.location_id.clone(),
                    total_price: reservation.total_price,
                });
                Ok(())
            }
            None => Err(DomainError::CapacityRaceLost {
                entity: "Location",
                id: location_id,
                attempts: self.retry.max_attempts,
            }),
        }
    }

    /// Additive merge of an extension into the original row. Expected
    /// values are re-read fresh on every attempt so concurrent extensions
    /// converge: the end date moves to the later of the two and both
    /// added prices land.
    async fn merge_into_original(
        &self,
        reservation: &Reservation,
        original_id: &str,
        breakdown: &PriceBreakdown,
    ) -> DomainResult<()> {
        let bookings = self.provider.bookings();
        let new_end = reservation.end_date;
        let added = breakdown.total_price;

        let result = retry_optimistic(
            &self.retry,
            || {
                let bookings = bookings.clone();
                let original_id = original_id.to_string();
                async move {
                    let original = bookings.find_by_id(&original_id).await?.ok_or_else(|| {
                        DomainError::NotFound {
                            entity: "Reservation",
                            field: "id",
                            value: original_id.clone(),
                        }
                    })?;
                    let target_end = new_end.max(original.end_date);
                    if bookings
                        .merge_extension(
                            &original_id,
                            original.end_date,
                            original.total_price,
                            target_end,
                            added,
                        )
                        .await?
                    {
                        Ok(Attempt::Won(target_end))
                    } else {
                        Ok(Attempt::Lost)
                    }
                }
            },
            "extension_merge",
        )
        .await?;

        match result {
            Some(merged_end) => {
                self.events.publish(Event::BookingExtended {
                    booking_id: reservation.id.clone(),
                    original_booking_id: original_id.to_string(),
                    user_id: reservation.user_id.clone(),
                    new_end_date: merged_end,
                    added_price: added,
                });
                Ok(())
            }
            None => Err(DomainError::CapacityRaceLost {
                entity: "Reservation",
                id: original_id.to_string(),
                attempts: self.retry.max_attempts,
            }),
        }
    }

    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = DomainResult<T>>,
    ) -> DomainResult<T> {
        match tokio::time::timeout(self.network_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Timeout { operation }),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{BookingRepository, UnitSize};
    use crate::domain::location::{GeoPoint, Location, LocationRepository};
    use crate::domain::user::UserRepository;
    use crate::infrastructure::payment::SimulatedPaymentGateway;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::notifications::create_event_bus;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        }
    }

    async fn seed_location(storage: &InMemoryStorage, capacity: i32) {
        LocationRepository::save(
            storage,
            Location {
                id: "loc-1".into(),
                name: "Kuta Storage Hub".into(),
                address: "Jl. Raya Kuta No. 1".into(),
                geolocation: GeoPoint {
                    latitude: -8.72,
                    longitude: 115.17,
                },
                capacity,
                features: vec![],
                image_url: None,
            },
        )
        .await
        .unwrap();
    }

    fn service_with(
        storage: &InMemoryStorage,
        payment: SimulatedPaymentGateway,
    ) -> BookingService {
        let provider: Arc<dyn RepositoryProvider> = Arc::new(storage.clone());
        let identity = Arc::new(IdentityService::new(storage.users()));
        BookingService::new(
            provider,
            identity,
            Arc::new(payment),
            PricingTable::default(),
            create_event_bus(),
        )
        .with_retry_config(fast_retry())
    }

    fn guest_draft() -> BookingDraft {
        let mut draft = BookingDraft::new("loc-1", "Kuta Storage Hub", UnitSize::Medium);
        draft.guest_name = "Putu".into();
        draft.guest_phone = "+62811111111".into();
        draft.guest_email = "putu@example.com".into();
        draft.start_date = Some(at(1, 10));
        draft.end_date = Some(at(4, 10));
        draft
    }

    #[tokio::test]
    async fn guest_on_site_booking_commits_and_decrements_capacity() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));

        let reservation = svc
            .commit(&guest_draft(), &SessionContext::guest())
            .await
            .unwrap();

        assert_eq!(reservation.total_price, 150_000);
        assert_eq!(reservation.payment_status, PaymentStatus::UnpaidOnSite);
        assert!(!reservation.is_extension);

        // account provisioned from the guest fields
        let user = storage
            .find_by_email("putu@example.com")
            .await
            .unwrap()
            .expect("guest account");
        assert_eq!(reservation.user_id, user.id);

        let location = LocationRepository::find_by_id(&storage, "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.capacity, 2);
    }

    #[tokio::test]
    async fn online_payment_marks_paid() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));

        let mut draft = guest_draft();
        draft.payment_method = PaymentMethod::Online;
        let reservation = svc.commit(&draft, &SessionContext::guest()).await.unwrap();
        assert_eq!(reservation.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn declined_payment_writes_nothing() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::declining());

        let mut draft = guest_draft();
        draft.payment_method = PaymentMethod::Online;
        let err = svc.commit(&draft, &SessionContext::guest()).await.unwrap_err();
        assert!(matches!(err, DomainError::PaymentFailed(_)));

        assert!(BookingRepository::find_all(&storage).await.unwrap().is_empty());
        let location = LocationRepository::find_by_id(&storage, "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.capacity, 3);
    }

    #[tokio::test]
    async fn registered_guest_email_is_rejected() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));

        let identity = IdentityService::new(storage.users());
        identity
            .create_account("Putu", "putu@example.com", "+62811111111", "hunter22")
            .await
            .unwrap();

        let err = svc
            .commit(&guest_draft(), &SessionContext::guest())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAccount(_)));
        assert!(BookingRepository::find_all(&storage).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_location_floors_at_zero() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 0).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));

        svc.commit(&guest_draft(), &SessionContext::guest())
            .await
            .unwrap();

        let location = LocationRepository::find_by_id(&storage, "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.capacity, 0);
    }

    #[tokio::test]
    async fn concurrent_commits_never_drive_capacity_negative() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = Arc::new(service_with(
            &storage,
            SimulatedPaymentGateway::new(Duration::ZERO),
        ));

        let mut handles = Vec::new();
        for i in 0..5 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                let mut draft = guest_draft();
                draft.guest_email = format!("guest{}@example.com", i);
                svc.commit(&draft, &SessionContext::guest()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let location = LocationRepository::find_by_id(&storage, "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.capacity, 0);
        assert_eq!(BookingRepository::find_all(&storage).await.unwrap().len(), 5);
    }

    async fn committed_original(
        storage: &InMemoryStorage,
        svc: &BookingService,
    ) -> Reservation {
        svc.commit(&guest_draft(), &SessionContext::guest())
            .await
            .unwrap();
        let all = BookingRepository::find_all(storage).await.unwrap();
        all.into_iter().next().unwrap()
    }

    fn extension_draft(original: &Reservation, new_end: DateTime<Utc>) -> BookingDraft {
        let mut draft = BookingDraft::for_extension(
            original.location_id.clone(),
            original.location_name.clone(),
            original.unit_size,
            original.extension_context(),
        );
        draft.end_date = Some(new_end);
        draft
    }

    #[tokio::test]
    async fn extension_merges_into_original_without_pickup_fee() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));
        let original = committed_original(&storage, &svc).await;
        let session = SessionContext::authenticated(original.user_id.clone());

        let draft = extension_draft(&original, at(6, 10));
        let extension = svc.commit(&draft, &session).await.unwrap();

        assert!(extension.is_extension);
        assert_eq!(extension.total_price, 100_000);
        assert_eq!(
            extension.original_booking_id.as_deref(),
            Some(original.id.as_str())
        );

        let merged = BookingRepository::find_by_id(&storage, &original.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged.total_price, 250_000);
        assert_eq!(merged.end_date, at(6, 10));

        // extensions never touch capacity
        let location = LocationRepository::find_by_id(&storage, "loc-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.capacity, 2);
    }

    #[tokio::test]
    async fn extension_merge_is_order_independent() {
        for flip in [false, true] {
            let storage = InMemoryStorage::new();
            seed_location(&storage, 3).await;
            let svc = service_with(&storage, SimulatedPaymentGateway::new(Duration::ZERO));
            let original = committed_original(&storage, &svc).await;
            let session = SessionContext::authenticated(original.user_id.clone());

            // both drafts are anchored on the original end date
            let short = extension_draft(&original, at(6, 10)); // 2 days, 100k
            let long = extension_draft(&original, at(8, 10)); // 4 days, 200k
            let (first, second) = if flip { (long.clone(), short.clone()) } else { (short, long) };

            svc.commit(&first, &session).await.unwrap();
            svc.commit(&second, &session).await.unwrap();

            let merged = BookingRepository::find_by_id(&storage, &original.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(merged.total_price, 450_000);
            assert_eq!(merged.end_date, at(8, 10));
        }
    }

    #[tokio::test]
    async fn duplicate_extension_submission_is_rejected_while_in_flight() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = Arc::new(
            service_with(&storage, SimulatedPaymentGateway::new(Duration::from_millis(100)))
                .with_network_timeout(Duration::from_secs(5)),
        );
        let original = committed_original(&storage, &svc).await;
        let session = SessionContext::authenticated(original.user_id.clone());

        let mut draft = extension_draft(&original, at(6, 10));
        draft.payment_method = PaymentMethod::Online;

        let first = {
            let svc = svc.clone();
            let draft = draft.clone();
            let session = session.clone();
            tokio::spawn(async move { svc.commit(&draft, &session).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = svc.commit(&draft, &session).await;
        assert!(matches!(second.unwrap_err(), DomainError::Conflict(_)));
        first.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn slow_payment_times_out() {
        let storage = InMemoryStorage::new();
        seed_location(&storage, 3).await;
        let svc = service_with(
            &storage,
            SimulatedPaymentGateway::new(Duration::from_secs(2)),
        )
        .with_network_timeout(Duration::from_millis(50));

        let mut draft = guest_draft();
        draft.payment_method = PaymentMethod::Online;
        let err = svc.commit(&draft, &SessionContext::guest()).await.unwrap_err();
        assert!(matches!(err, DomainError::Timeout { operation: "payment" }));
    }
}
