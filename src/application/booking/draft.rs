//! Booking draft and per-step validation
//!
//! The draft is the mutable working copy behind the reservation wizard.
//! It is never persisted; commit turns it into a [`Reservation`] row and
//! closing the wizard drops it. Every validation failure leaves the draft
//! untouched so the user can correct and resubmit.

use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use crate::domain::booking::{ExtensionContext, PaymentMethod, ServiceType, UnitSize};
use crate::domain::DomainError;
use crate::domain::DomainResult;

/// Who is driving the wizard. Carried explicitly instead of ambient
/// globals so two sessions never see each other's identity.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Authenticated account, if any. `None` means guest checkout.
    pub user_id: Option<String>,
}

impl SessionContext {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn guest() -> Self {
        Self { user_id: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// In-progress reservation state across wizard steps.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub location_id: String,
    /// Captured when the draft opens so commit does not depend on a
    /// second location read
    pub location_name: String,
    pub unit_size: UnitSize,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub service_type: ServiceType,
    /// Required iff `service_type` is pickup
    pub pickup_address: Option<String>,
    /// Guest contact fields, ignored for authenticated sessions
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: String,
    pub payment_method: PaymentMethod,
    /// Set iff this draft lengthens an existing reservation
    pub extension: Option<ExtensionContext>,
}

impl BookingDraft {
    /// Fresh draft for a new booking at the given location.
    pub fn new(
        location_id: impl Into<String>,
        location_name: impl Into<String>,
        unit_size: UnitSize,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            location_name: location_name.into(),
            unit_size,
            start_date: None,
            end_date: None,
            service_type: ServiceType::SelfDropoff,
            pickup_address: None,
            guest_name: String::new(),
            guest_phone: String::new(),
            guest_email: String::new(),
            payment_method: PaymentMethod::OnSite,
            extension: None,
        }
    }

    /// Draft that extends an existing reservation. Dates start from the
    /// original end so pricing and validation are anchored correctly.
    pub fn for_extension(
        location_id: impl Into<String>,
        location_name: impl Into<String>,
        unit_size: UnitSize,
        context: ExtensionContext,
    ) -> Self {
        let mut draft = Self::new(location_id, location_name, unit_size);
        draft.start_date = Some(context.original_end);
        draft.extension = Some(context);
        draft
    }

    pub fn is_extension(&self) -> bool {
        self.extension.is_some()
    }

    pub fn is_pickup(&self) -> bool {
        self.service_type == ServiceType::Pickup
    }

    /// Identity step rules: guest contact fields when unauthenticated,
    /// date range present and strictly increasing, extension end past the
    /// original end.
    pub fn validate_identity_step(&self, session: &SessionContext) -> DomainResult<()> {
        if !session.is_authenticated() && !self.is_extension() {
            if self.guest_name.trim().is_empty()
                || self.guest_phone.trim().is_empty()
                || self.guest_email.trim().is_empty()
            {
                return Err(DomainError::Validation(
                    "Please fill in your name, phone, and email to continue.".to_string(),
                ));
            }
            if !self.guest_email.validate_email() {
                return Err(DomainError::Validation(
                    "Please enter a valid email address.".to_string(),
                ));
            }
        }

        let (start, end) = match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(DomainError::Validation(
                    "Please select both a start and an end date.".to_string(),
                ))
            }
        };

        if let Some(ctx) = &self.extension {
            if end <= ctx.original_end {
                return Err(DomainError::Validation(
                    "The new end date for extension must be after the current booking end date."
                        .to_string(),
                ));
            }
        } else if end <= start {
            return Err(DomainError::Validation(
                "End date and time must be after the start date and time.".to_string(),
            ));
        }

        Ok(())
    }

    /// Service step rules: a pickup booking needs an address. Extensions
    /// never reach this step.
    pub fn validate_service_step(&self) -> DomainResult<()> {
        if self.is_pickup()
            && self
                .pickup_address
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(DomainError::Validation(
                "Please provide a pickup address.".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
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

    #[test]
    fn complete_guest_draft_passes_identity_step() {
        let draft = guest_draft();
        assert!(draft.validate_identity_step(&SessionContext::guest()).is_ok());
    }

    #[test]
    fn missing_guest_contact_is_rejected() {
        let mut draft = guest_draft();
        draft.guest_phone = "  ".into();
        let err = draft
            .validate_identity_step(&SessionContext::guest())
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Please fill in your name, phone, and email to continue."
        );
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut draft = guest_draft();
        draft.guest_email = "not-an-email".into();
        assert!(draft
            .validate_identity_step(&SessionContext::guest())
            .is_err());
    }

    #[test]
    fn authenticated_session_skips_guest_fields() {
        let mut draft = guest_draft();
        draft.guest_name.clear();
        draft.guest_phone.clear();
        draft.guest_email.clear();
        assert!(draft
            .validate_identity_step(&SessionContext::authenticated("user-1"))
            .is_ok());
    }

    #[test]
    fn end_not_after_start_is_rejected() {
        let mut draft = guest_draft();
        draft.end_date = Some(at(1, 10));
        let err = draft
            .validate_identity_step(&SessionContext::guest())
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "End date and time must be after the start date and time."
        );
    }

    #[test]
    fn extension_end_must_pass_original_end() {
        let ctx = ExtensionContext {
            original_id: "bk-1".into(),
            original_end: at(4, 10),
            original_total: 150_000,
        };
        let mut draft =
            BookingDraft::for_extension("loc-1", "Kuta Storage Hub", UnitSize::Medium, ctx);
        draft.end_date = Some(at(4, 10));
        let err = draft
            .validate_identity_step(&SessionContext::authenticated("user-1"))
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "The new end date for extension must be after the current booking end date."
        );

        draft.end_date = Some(at(6, 10));
        assert!(draft
            .validate_identity_step(&SessionContext::authenticated("user-1"))
            .is_ok());
    }

    #[test]
    fn pickup_requires_address() {
        let mut draft = guest_draft();
        draft.service_type = ServiceType::Pickup;
        let err = draft.validate_service_step().unwrap_err();
        assert_eq!(err.user_message(), "Please provide a pickup address.");

        draft.pickup_address = Some("Jl. Sunset Road No. 8".into());
        assert!(draft.validate_service_step().is_ok());
    }

    #[test]
    fn self_dropoff_needs_no_address() {
        let draft = guest_draft();
        assert!(draft.validate_service_step().is_ok());
    }
}
