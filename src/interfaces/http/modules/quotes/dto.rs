//! Quote DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request for a price preview
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    /// Unit size: small, medium, large
    pub unit_size: String,
    /// Rental start (ISO 8601)
    pub start_date: String,
    /// Rental end (ISO 8601)
    pub end_date: String,
    /// Service type: self-dropoff (default) or pickup
    #[serde(default)]
    pub service_type: Option<String>,
    /// Set to quote an extension of this booking instead of a new rental
    pub original_booking_id: Option<String>,
}

/// Price breakdown shown on the review step
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub rental_days: i64,
    pub storage_cost: i64,
    pub pickup_fee: i64,
    pub total_price: i64,
    pub total_price_formatted: String,
}
