//! Simulated payment gateway
//!
//! Stands in for the real gateway redirect. Sleeps for a configurable
//! delay to mimic network latency, then approves every charge. Tests use
//! [`SimulatedPaymentGateway::declining`] to exercise the failure path.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{PaymentGateway, PaymentOutcome};
use crate::domain::pricing::PriceBreakdown;
use crate::domain::DomainResult;

pub struct SimulatedPaymentGateway {
    delay: Duration,
    decline: bool,
}

impl SimulatedPaymentGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            decline: false,
        }
    }

    /// Gateway that declines every charge.
    pub fn declining() -> Self {
        Self {
            delay: Duration::ZERO,
            decline: true,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(&self, breakdown: &PriceBreakdown) -> DomainResult<PaymentOutcome> {
        tokio::time::sleep(self.delay).await;
        if self.decline {
            return Ok(PaymentOutcome::Declined(
                "Card declined by issuer".to_string(),
            ));
        }
        info!(amount = breakdown.total_price, "Simulated charge approved");
        Ok(PaymentOutcome::Paid)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown() -> PriceBreakdown {
        PriceBreakdown {
            rental_days: 3,
            storage_cost: 150_000,
            pickup_fee: 0,
            total_price: 150_000,
        }
    }

    #[tokio::test]
    async fn approves_by_default() {
        let gateway = SimulatedPaymentGateway::new(Duration::ZERO);
        assert_eq!(
            gateway.charge(&breakdown()).await.unwrap(),
            PaymentOutcome::Paid
        );
    }

    #[tokio::test]
    async fn declining_gateway_declines() {
        let gateway = SimulatedPaymentGateway::declining();
        assert!(matches!(
            gateway.charge(&breakdown()).await.unwrap(),
            PaymentOutcome::Declined(_)
        ));
    }
}
