//! Invoice data assembly
//!
//! Produces the data a renderer needs to print an invoice or a check-in
//! QR code for a committed reservation. Rendering itself happens
//! elsewhere; this only gathers and formats the numbers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::booking::{BookingRepository, Reservation};
use crate::domain::user::UserRepository;
use crate::domain::{DomainError, DomainResult};
use crate::shared::currency::format_idr;

#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub description: String,
    pub amount: i64,
    pub amount_formatted: String,
}

#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    pub location_name: String,
    pub unit_label: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub lines: Vec<InvoiceLine>,
    pub total: i64,
    pub total_formatted: String,
    /// Payload encoded into the check-in QR code
    pub qr_payload: String,
}

pub struct InvoiceService {
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
}

impl InvoiceService {
    pub fn new(bookings: Arc<dyn BookingRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { bookings, users }
    }

    pub async fn generate(&self, booking_id: &str) -> DomainResult<InvoiceData> {
        let reservation = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: booking_id.to_string(),
            })?;
        let user = self
            .users
            .find_by_id(&reservation.user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: reservation.user_id.clone(),
            })?;
        Ok(Self::assemble(&reservation, &user.name, &user.email))
    }

    fn assemble(reservation: &Reservation, customer_name: &str, customer_email: &str) -> InvoiceData {
        let mut lines = Vec::new();
        let pickup_fee = reservation.pickup_details.as_ref().map_or(0, |p| p.fee);
        let storage_cost = reservation.total_price - pickup_fee;
        lines.push(InvoiceLine {
            description: format!(
                "Storage unit, {}",
                reservation.unit_size.label().to_lowercase()
            ),
            amount: storage_cost,
            amount_formatted: format_idr(storage_cost),
        });
        if let Some(pickup) = &reservation.pickup_details {
            lines.push(InvoiceLine {
                description: format!("Pickup service ({})", pickup.address),
                amount: pickup.fee,
                amount_formatted: format_idr(pickup.fee),
            });
        }

        let short_id: String = reservation.id.chars().take(8).collect();
        InvoiceData {
            invoice_number: format!("INV-{}", short_id.to_uppercase()),
            issued_at: Utc::now(),
            customer_name: customer_name.to_string(),
            customer_email: customer_email.to_string(),
            location_name: reservation.location_name.clone(),
            unit_label: reservation.unit_size.label().to_string(),
            period_start: reservation.start_date,
            period_end: reservation.end_date,
            lines,
            total: reservation.total_price,
            total_formatted: format_idr(reservation.total_price),
            qr_payload: reservation.id.clone(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{
        BookingStatus, PaymentMethod, PaymentStatus, PickupDetails, ServiceType, UnitSize,
    };
    use crate::domain::user::UserProfile;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::storage::InMemoryStorage;
    use chrono::Duration;

    async fn seed(storage: &InMemoryStorage) {
        let now = Utc::now();
        storage
            .users()
            .save(UserProfile {
                id: "user-1".into(),
                name: "Putu".into(),
                email: "putu@example.com".into(),
                phone: "+62811111111".into(),
                password_hash: "x".into(),
                created_at: now,
            })
            .await
            .unwrap();
        storage
            .bookings()
            .save(Reservation {
                id: "abcdef12-3456".into(),
                location_id: "loc-1".into(),
                location_name: "Kuta Storage Hub".into(),
                unit_size: UnitSize::Medium,
                start_date: now,
                end_date: now + Duration::days(3),
                total_price: 300_000,
                service_type: ServiceType::Pickup,
                pickup_details: Some(PickupDetails {
                    address: "Jl. Sunset Road No. 8".into(),
                    fee: 150_000,
                }),
                payment_method: PaymentMethod::Online,
                payment_status: PaymentStatus::Paid,
                booking_status: BookingStatus::Active,
                user_id: "user-1".into(),
                created_at: now,
                original_booking_id: None,
                is_extension: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invoice_splits_storage_and_pickup_lines() {
        let storage = InMemoryStorage::new();
        seed(&storage).await;
        let service = InvoiceService::new(storage.bookings(), storage.users());

        let invoice = service.generate("abcdef12-3456").await.unwrap();
        assert_eq!(invoice.invoice_number, "INV-ABCDEF12");
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[0].amount, 150_000);
        assert_eq!(invoice.lines[1].amount, 150_000);
        assert_eq!(invoice.total, 300_000);
        assert_eq!(invoice.total_formatted, "Rp 300.000");
        assert_eq!(invoice.qr_payload, "abcdef12-3456");
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let storage = InMemoryStorage::new();
        let service = InvoiceService::new(storage.bookings(), storage.users());
        let err = service.generate("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
