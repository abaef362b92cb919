use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Account already exists for {0}")]
    DuplicateAccount(String),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// Conditional update lost against concurrent writers after all retries.
    /// Covers both the location capacity decrement and the extension merge.
    #[error("Conditional update on {entity} {id} lost after {attempts} attempts")]
    CapacityRaceLost {
        entity: &'static str,
        id: String,
        attempts: u32,
    },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Timed out waiting for {operation}")]
    Timeout { operation: &'static str },
}

impl DomainError {
    /// Whether the wizard may keep the draft and let the user retry.
    ///
    /// Validation, duplicate-account and payment errors are recoverable in
    /// place. Persistence and race errors are terminal for the attempt:
    /// funds may already be captured, so they must never be retried
    /// automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::DuplicateAccount(_)
                | Self::PaymentFailed(_)
                | Self::Conflict(_)
                | Self::Timeout { .. }
        )
    }

    /// Message shown to the end user. Race losses read as a persistence
    /// problem (the distinction only matters in the logs).
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::DuplicateAccount(_) => {
                "This email is already registered. Please log in to book or use a different email."
                    .to_string()
            }
            Self::PaymentFailed(_) => {
                "Your payment was declined. You can retry or choose to pay on site.".to_string()
            }
            Self::PersistenceFailed(_) | Self::CapacityRaceLost { .. } => {
                "We had trouble saving your booking. Please contact support.".to_string()
            }
            Self::Timeout { .. } => {
                "The request took too long. Please check your connection and try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
