//! Reservation domain entity

use chrono::{DateTime, Utc};

/// Storage unit size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSize {
    /// 2m x 2m
    Small,
    /// 3m x 3m
    Medium,
    /// 3m x 6m
    Large,
}

impl UnitSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Medium,
        }
    }

    /// Human-readable unit dimensions
    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small (2m x 2m)",
            Self::Medium => "Medium (3m x 3m)",
            Self::Large => "Large (3m x 6m)",
        }
    }
}

impl std::fmt::Display for UnitSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the items reach the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// Customer brings their items to the facility
    SelfDropoff,
    /// Items are collected from the customer's address for a flat fee
    Pickup,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfDropoff => "self-dropoff",
            Self::Pickup => "pickup",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pickup" => Self::Pickup,
            _ => Self::SelfDropoff,
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method chosen on the review step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Charged through the payment gateway before the booking is saved
    Online,
    /// Paid at the facility on arrival
    OnSite,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::OnSite => "on-site",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "online" => Self::Online,
            _ => Self::OnSite,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    UnpaidOnSite,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::UnpaidOnSite => "unpaid_on_site",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            _ => Self::UnpaidOnSite,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    /// Reserved, not yet checked in
    Active,
    /// Items are in the unit
    CheckedIn,
    /// Rental ended
    Completed,
    /// Cancelled by user or staff
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "checked_in" => Self::CheckedIn,
            "completed" => Self::Completed,
            _ => Self::Cancelled,
        }
    }

    /// Whether the reservation still occupies a unit (relevant for
    /// extensions and expiry notifications).
    pub fn is_occupying(&self) -> bool {
        matches!(self, Self::Active | Self::CheckedIn)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pickup address and the fee charged for the pickup service.
/// Present iff `service_type` is [`ServiceType::Pickup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupDetails {
    pub address: String,
    pub fee: i64,
}

/// Reference to the reservation being lengthened when a draft is an
/// extension. `original_end` is the reference point for extension pricing
/// and the floor for the new end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionContext {
    pub original_id: String,
    pub original_end: DateTime<Utc>,
    pub original_total: i64,
}

/// A durable booking record.
///
/// Extensions are recorded as their own rows (`is_extension` +
/// `original_booking_id`), while the original row's `end_date` and
/// `total_price` are additively merged. The ledger of extension rows plus
/// the mutated original gives both the history and the current view.
#[derive(Debug, Clone)]
pub struct Reservation {
    /// UUID assigned at commit time
    pub id: String,
    pub location_id: String,
    /// Denormalized at creation time; not refreshed if the location renames
    pub location_name: String,
    pub unit_size: UnitSize,
    pub start_date: DateTime<Utc>,
    /// Invariant: strictly greater than `start_date`
    pub end_date: DateTime<Utc>,
    /// Whole rupiah
    pub total_price: i64,
    pub service_type: ServiceType,
    pub pickup_details: Option<PickupDetails>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub booking_status: BookingStatus,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub original_booking_id: Option<String>,
    pub is_extension: bool,
}

impl Reservation {
    /// Whether the rental period has already passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    /// Whether this reservation can still be extended.
    pub fn can_extend(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && self.booking_status.is_occupying()
    }

    /// Extension context pointing at this reservation.
    pub fn extension_context(&self) -> ExtensionContext {
        ExtensionContext {
            original_id: self.id.clone(),
            original_end: self.end_date,
            original_total: self.total_price,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_reservation(end_offset: Duration) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: "bk-1".into(),
            location_id: "loc-1".into(),
            location_name: "Kuta Storage Hub".into(),
            unit_size: UnitSize::Medium,
            start_date: now - Duration::days(2),
            end_date: now + end_offset,
            total_price: 150_000,
            service_type: ServiceType::SelfDropoff,
            pickup_details: None,
            payment_method: PaymentMethod::OnSite,
            payment_status: PaymentStatus::UnpaidOnSite,
            booking_status: BookingStatus::Active,
            user_id: "user-1".into(),
            created_at: now - Duration::days(2),
            original_booking_id: None,
            is_extension: false,
        }
    }

    #[test]
    fn active_future_booking_can_extend() {
        let r = sample_reservation(Duration::days(3));
        assert!(r.can_extend(Utc::now()));
    }

    #[test]
    fn expired_booking_cannot_extend() {
        let r = sample_reservation(Duration::days(-1));
        assert!(r.is_expired(Utc::now()));
        assert!(!r.can_extend(Utc::now()));
    }

    #[test]
    fn cancelled_booking_cannot_extend() {
        let mut r = sample_reservation(Duration::days(3));
        r.booking_status = BookingStatus::Cancelled;
        assert!(!r.can_extend(Utc::now()));
    }

    #[test]
    fn extension_context_captures_end_and_total() {
        let r = sample_reservation(Duration::days(3));
        let ctx = r.extension_context();
        assert_eq!(ctx.original_id, "bk-1");
        assert_eq!(ctx.original_end, r.end_date);
        assert_eq!(ctx.original_total, 150_000);
    }

    #[test]
    fn enum_string_roundtrips() {
        for size in [UnitSize::Small, UnitSize::Medium, UnitSize::Large] {
            assert_eq!(UnitSize::from_str(size.as_str()), size);
        }
        for st in [ServiceType::SelfDropoff, ServiceType::Pickup] {
            assert_eq!(ServiceType::from_str(st.as_str()), st);
        }
        for pm in [PaymentMethod::Online, PaymentMethod::OnSite] {
            assert_eq!(PaymentMethod::from_str(pm.as_str()), pm);
        }
        for ps in [PaymentStatus::Paid, PaymentStatus::UnpaidOnSite] {
            assert_eq!(PaymentStatus::from_str(ps.as_str()), ps);
        }
        for bs in [
            BookingStatus::Active,
            BookingStatus::CheckedIn,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::from_str(bs.as_str()), bs);
        }
    }

    #[test]
    fn only_active_and_checked_in_occupy() {
        assert!(BookingStatus::Active.is_occupying());
        assert!(BookingStatus::CheckedIn.is_occupying());
        assert!(!BookingStatus::Completed.is_occupying());
        assert!(!BookingStatus::Cancelled.is_occupying());
    }
}
