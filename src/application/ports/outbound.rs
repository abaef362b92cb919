//! Outbound ports to external collaborators

use async_trait::async_trait;

use crate::domain::pricing::PriceBreakdown;
use crate::domain::DomainResult;

/// Result of a charge attempt against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Declined(String),
}

/// Payment gateway collaborator. Charged synchronously before the
/// reservation is persisted; the committer never writes a paid row
/// without a `Paid` outcome.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, breakdown: &PriceBreakdown) -> DomainResult<PaymentOutcome>;
}
