//! Reservation wizard
//!
//! Drives a [`BookingDraft`] through the step machine. The wizard holds
//! the draft, the session and the pricing table; handlers feed it edits
//! and ask it to advance, and it answers with the new step number or a
//! validation error. The displayed total is recomputed on every review
//! entry so edits on earlier steps can never leave a stale price.

use crate::domain::pricing::{PriceBreakdown, PricingTable};
use crate::domain::DomainResult;

use super::draft::{BookingDraft, SessionContext};
use super::steps::BookingStep;

pub struct BookingWizard {
    draft: BookingDraft,
    step: BookingStep,
    session: SessionContext,
    pricing: PricingTable,
}

impl BookingWizard {
    pub fn new(draft: BookingDraft, session: SessionContext, pricing: PricingTable) -> Self {
        Self {
            draft,
            step: BookingStep::Identity,
            session,
            pricing,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Validate the current step and move forward. On a validation error
    /// the step is held and the draft unchanged.
    pub fn advance(&mut self) -> DomainResult<BookingStep> {
        match self.step {
            BookingStep::Identity => self.draft.validate_identity_step(&self.session)?,
            BookingStep::Service => self.draft.validate_service_step()?,
            BookingStep::Review => {}
        }
        self.step = self
            .step
            .next(self.draft.is_extension(), self.draft.is_pickup());
        Ok(self.step)
    }

    /// Move backward, mirroring the forward skip. Never fails.
    pub fn back(&mut self) -> BookingStep {
        self.step = self
            .step
            .back(self.draft.is_extension(), self.draft.is_pickup());
        self.step
    }

    /// Authoritative price for the draft as it stands. The review step
    /// displays this and the committer charges exactly this.
    pub fn quote(&self) -> Option<PriceBreakdown> {
        let (start, end) = (self.draft.start_date?, self.draft.end_date?);
        Some(self.pricing.quote(
            self.draft.unit_size,
            start,
            end,
            self.draft.service_type,
            self.draft.extension.as_ref(),
        ))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{ServiceType, UnitSize};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn wizard_with_guest_draft() -> BookingWizard {
        let mut draft = BookingDraft::new("loc-1", "Kuta Storage Hub", UnitSize::Medium);
        draft.guest_name = "Putu".into();
        draft.guest_phone = "+62811111111".into();
        draft.guest_email = "putu@example.com".into();
        draft.start_date = Some(at(1, 10));
        draft.end_date = Some(at(4, 10));
        BookingWizard::new(draft, SessionContext::guest(), PricingTable::default())
    }

    #[test]
    fn self_dropoff_flow_is_two_steps() {
        let mut wizard = wizard_with_guest_draft();
        assert_eq!(wizard.advance().unwrap(), BookingStep::Review);
    }

    #[test]
    fn pickup_flow_is_three_steps() {
        let mut wizard = wizard_with_guest_draft();
        wizard.draft_mut().service_type = ServiceType::Pickup;
        wizard.draft_mut().pickup_address = Some("Jl. Sunset Road No. 8".into());
        assert_eq!(wizard.advance().unwrap(), BookingStep::Service);
        assert_eq!(wizard.advance().unwrap(), BookingStep::Review);
        assert_eq!(wizard.back(), BookingStep::Service);
    }

    #[test]
    fn validation_failure_holds_the_step() {
        let mut wizard = wizard_with_guest_draft();
        wizard.draft_mut().guest_email.clear();
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.step(), BookingStep::Identity);
    }

    #[test]
    fn review_quote_tracks_draft_edits() {
        let mut wizard = wizard_with_guest_draft();
        wizard.advance().unwrap();
        assert_eq!(wizard.quote().unwrap().total_price, 150_000);

        // edit after reaching review, the next quote reflects it
        wizard.draft_mut().end_date = Some(at(6, 10));
        assert_eq!(wizard.quote().unwrap().total_price, 250_000);
    }

    #[test]
    fn quote_requires_both_dates() {
        let mut wizard = wizard_with_guest_draft();
        wizard.draft_mut().end_date = None;
        assert!(wizard.quote().is_none());
    }
}
