//! Wizard step state machine
//!
//! Three steps: identity, service, review. The service step only exists
//! for non-extension pickup-eligible drafts; extensions and self-dropoff
//! bookings jump straight from identity to review, and backing up mirrors
//! the same skip.

/// Wizard position. The numeric value matches the step indicator shown
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Identity,
    Service,
    Review,
}

impl BookingStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Service => 2,
            Self::Review => 3,
        }
    }

    /// Whether the service step applies to a draft with these flags.
    fn service_step_applies(is_extension: bool, is_pickup: bool) -> bool {
        !is_extension && is_pickup
    }

    /// Next step. Review has no forward transition; commit exits the
    /// wizard instead.
    pub fn next(&self, is_extension: bool, is_pickup: bool) -> Self {
        match self {
            Self::Identity => {
                if Self::service_step_applies(is_extension, is_pickup) {
                    Self::Service
                } else {
                    Self::Review
                }
            }
            Self::Service => Self::Review,
            Self::Review => Self::Review,
        }
    }

    /// Previous step, mirroring the forward skip.
    pub fn back(&self, is_extension: bool, is_pickup: bool) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::Service => Self::Identity,
            Self::Review => {
                if Self::service_step_applies(is_extension, is_pickup) {
                    Self::Service
                } else {
                    Self::Identity
                }
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
