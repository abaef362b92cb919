//! Expiring-booking scanner
//!
//! Pure read-model over a user's reservations: which ones end within the
//! next week. Recomputed from the full set every time, never patched
//! incrementally.

use chrono::{DateTime, Utc};

use crate::domain::booking::Reservation;

const MILLIS_PER_DAY: i64 = 86_400_000;
const EXPIRY_WINDOW_DAYS: i64 = 7;

/// A reservation ending soon, with whole days remaining (ceiling).
#[derive(Debug, Clone)]
pub struct ExpiringBooking {
    pub reservation: Reservation,
    pub days_left: i64,
}

/// Reservations ending within the next seven days, soonest first.
///
/// Only active and checked-in bookings count; anything already past its
/// end date is excluded rather than reported as overdue.
pub fn scan_expiring(reservations: &[Reservation], now: DateTime<Utc>) -> Vec<ExpiringBooking> {
    let mut expiring: Vec<ExpiringBooking> = reservations
        .iter()
        .filter(|r| r.booking_status.is_occupying())
        .filter_map(|r| {
            let remaining_ms = (r.end_date - now).num_milliseconds();
            if remaining_ms <= 0 {
                return None;
            }
            let days_left = (remaining_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
            (days_left <= EXPIRY_WINDOW_DAYS).then(|| ExpiringBooking {
                reservation: r.clone(),
                days_left,
            })
        })
        .collect();
    expiring.sort_by_key(|e| e.days_left);
    expiring
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{
        BookingStatus, PaymentMethod, PaymentStatus, ServiceType, UnitSize,
    };
    use chrono::Duration;

    fn reservation(id: &str, end_in: Duration, status: BookingStatus) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: id.into(),
            location_id: "loc-1".into(),
            location_name: "Kuta Storage Hub".into(),
            unit_size: UnitSize::Small,
            start_date: now - Duration::days(10),
            end_date: now + end_in,
            total_price: 250_000,
            service_type: ServiceType::SelfDropoff,
            pickup_details: None,
            payment_method: PaymentMethod::OnSite,
            payment_status: PaymentStatus::Paid,
            booking_status: status,
            user_id: "user-1".into(),
            created_at: now - Duration::days(10),
            original_booking_id: None,
            is_extension: false,
        }
    }

    #[test]
    fn orders_soonest_first_within_the_window() {
        let now = Utc::now();
        let set = vec![
            reservation("five", Duration::days(5), BookingStatus::Active),
            reservation("two", Duration::days(2), BookingStatus::CheckedIn),
            reservation("seven", Duration::hours(7 * 24 - 1), BookingStatus::Active),
        ];
        let result = scan_expiring(&set, now);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].reservation.id, "two");
        assert_eq!(result[0].days_left, 2);
        assert_eq!(result[1].reservation.id, "five");
        assert_eq!(result[2].reservation.id, "seven");
        assert_eq!(result[2].days_left, 7);
    }

    #[test]
    fn excludes_past_and_far_future() {
        let now = Utc::now();
        let set = vec![
            reservation("gone", Duration::days(-1), BookingStatus::Active),
            reservation("today", Duration::zero(), BookingStatus::Active),
            reservation("far", Duration::days(8), BookingStatus::Active),
        ];
        assert!(scan_expiring(&set, now).is_empty());
    }

    #[test]
    fn excludes_completed_and_cancelled() {
        let now = Utc::now();
        let set = vec![
            reservation("done", Duration::days(3), BookingStatus::Completed),
            reservation("off", Duration::days(3), BookingStatus::Cancelled),
            reservation("live", Duration::days(3), BookingStatus::Active),
        ];
        let result = scan_expiring(&set, now);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].reservation.id, "live");
    }

    #[test]
    fn partial_day_rounds_up() {
        let now = Utc::now();
        let set = vec![reservation("soon", Duration::hours(30), BookingStatus::Active)];
        let result = scan_expiring(&set, now);
        assert_eq!(result[0].days_left, 2);
    }
}
