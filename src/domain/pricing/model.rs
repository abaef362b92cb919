//! Pricing calculator
//!
//! All amounts are whole rupiah. The rental period is billed in whole days,
//! rounding any partial day up, so a booking from Monday 10:00 to Thursday
//! 10:00 is three days and Monday 10:00 to Thursday 10:01 is four.

use chrono::{DateTime, Utc};

use crate::domain::booking::{ExtensionContext, ServiceType, UnitSize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Daily rates per unit size plus the flat pickup fee.
#[derive(Debug, Clone)]
pub struct PricingTable {
    pub small_daily_rate: i64,
    pub medium_daily_rate: i64,
    pub large_daily_rate: i64,
    pub pickup_fee: i64,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            small_daily_rate: 25_000,
            medium_daily_rate: 50_000,
            large_daily_rate: 90_000,
            pickup_fee: 150_000,
        }
    }
}

/// Line items of a quote. `total_price` is always
/// `storage_cost + pickup_fee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub rental_days: i64,
    pub storage_cost: i64,
    pub pickup_fee: i64,
    pub total_price: i64,
}

impl PricingTable {
    pub fn daily_rate(&self, size: UnitSize) -> i64 {
        match size {
            UnitSize::Small => self.small_daily_rate,
            UnitSize::Medium => self.medium_daily_rate,
            UnitSize::Large => self.large_daily_rate,
        }
    }

    /// Quote a booking or an extension.
    ///
    /// For a fresh booking the billable period runs from `start` to `end`.
    /// For an extension it runs from the original booking's end date to
    /// `end`, and the pickup fee is never charged again regardless of the
    /// original booking's service type.
    pub fn quote(
        &self,
        size: UnitSize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        service: ServiceType,
        extension: Option<&ExtensionContext>,
    ) -> PriceBreakdown {
        let billable_from = match extension {
            Some(ctx) => ctx.original_end,
            None => start,
        };

        let span_ms = (end - billable_from).num_milliseconds().max(0);
        let rental_days = (span_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;

        let storage_cost = rental_days * self.daily_rate(size);
        let pickup_fee = match (extension, service) {
            (None, ServiceType::Pickup) => self.pickup_fee,
            _ => 0,
        };

        PriceBreakdown {
            rental_days,
            storage_cost,
            pickup_fee,
            total_price: storage_cost + pickup_fee,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn medium_three_days_self_dropoff() {
        let table = PricingTable::default();
        let q = table.quote(
            UnitSize::Medium,
            at(2024, 1, 1, 10, 0),
            at(2024, 1, 4, 10, 0),
            ServiceType::SelfDropoff,
            None,
        );
        assert_eq!(q.rental_days, 3);
        assert_eq!(q.storage_cost, 150_000);
        assert_eq!(q.pickup_fee, 0);
        assert_eq!(q.total_price, 150_000);
    }

    #[test]
    fn pickup_adds_flat_fee() {
        let table = PricingTable::default();
        let q = table.quote(
            UnitSize::Medium,
            at(2024, 1, 1, 10, 0),
            at(2024, 1, 4, 10, 0),
            ServiceType::Pickup,
            None,
        );
        assert_eq!(q.pickup_fee, 150_000);
        assert_eq!(q.total_price, 300_000);
    }

    #[test]
    fn partial_day_rounds_up() {
        let table = PricingTable::default();
        let q = table.quote(
            UnitSize::Small,
            at(2024, 1, 1, 10, 0),
            at(2024, 1, 4, 10, 1),
            ServiceType::SelfDropoff,
            None,
        );
        assert_eq!(q.rental_days, 4);
        assert_eq!(q.total_price, 100_000);
    }

    #[test]
    fn extension_bills_from_original_end_without_pickup_fee() {
        let table = PricingTable::default();
        let ctx = ExtensionContext {
            original_id: "bk-1".into(),
            original_end: at(2024, 1, 4, 10, 0),
            original_total: 150_000,
        };
        let q = table.quote(
            UnitSize::Medium,
            at(2024, 1, 1, 10, 0),
            at(2024, 1, 6, 10, 0),
            ServiceType::Pickup,
            Some(&ctx),
        );
        assert_eq!(q.rental_days, 2);
        assert_eq!(q.pickup_fee, 0);
        assert_eq!(q.total_price, 100_000);
    }

    #[test]
    fn non_positive_span_is_zero_days() {
        let table = PricingTable::default();
        let q = table.quote(
            UnitSize::Large,
            at(2024, 1, 4, 10, 0),
            at(2024, 1, 4, 10, 0),
            ServiceType::SelfDropoff,
            None,
        );
        assert_eq!(q.rental_days, 0);
        assert_eq!(q.total_price, 0);
    }

    #[test]
    fn large_unit_uses_large_rate() {
        let table = PricingTable::default();
        let q = table.quote(
            UnitSize::Large,
            at(2024, 1, 1, 0, 0),
            at(2024, 1, 2, 0, 0),
            ServiceType::SelfDropoff,
            None,
        );
        assert_eq!(q.total_price, 90_000);
    }
}
