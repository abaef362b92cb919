//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::booking::Reservation;
use crate::shared::currency::format_idr;

/// Request to create a new booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub location_id: String,
    /// Unit size: small, medium, large
    pub unit_size: String,
    /// Rental start (ISO 8601)
    pub start_date: String,
    /// Rental end (ISO 8601)
    pub end_date: String,
    /// Service type: self-dropoff (default) or pickup
    #[serde(default)]
    pub service_type: Option<String>,
    pub pickup_address: Option<String>,
    /// Payment method: online or on-site (default)
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Authenticated account, absent for guest checkout
    pub user_id: Option<String>,
    #[validate(length(max = 100))]
    pub guest_name: Option<String>,
    #[validate(length(max = 30))]
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,
}

/// Request to extend an existing booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExtendBookingRequest {
    /// New rental end (ISO 8601), must be after the current end
    pub new_end_date: String,
    /// Payment method: online or on-site (default)
    #[serde(default)]
    pub payment_method: Option<String>,
    #[validate(length(min = 1))]
    pub user_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsQuery {
    pub user_id: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub location_id: String,
    pub location_name: String,
    pub unit_size: String,
    pub start_date: String,
    pub end_date: String,
    pub total_price: i64,
    pub total_price_formatted: String,
    pub service_type: String,
    pub pickup_address: Option<String>,
    pub pickup_fee: Option<i64>,
    pub payment_method: String,
    pub payment_status: String,
    pub booking_status: String,
    pub user_id: String,
    pub created_at: String,
    pub original_booking_id: Option<String>,
    pub is_extension: bool,
}

impl From<Reservation> for BookingDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            location_id: r.location_id,
            location_name: r.location_name,
            unit_size: r.unit_size.as_str().to_string(),
            start_date: r.start_date.to_rfc3339(),
            end_date: r.end_date.to_rfc3339(),
            total_price: r.total_price,
            total_price_formatted: format_idr(r.total_price),
            service_type: r.service_type.as_str().to_string(),
            pickup_address: r.pickup_details.as_ref().map(|p| p.address.clone()),
            pickup_fee: r.pickup_details.as_ref().map(|p| p.fee),
            payment_method: r.payment_method.as_str().to_string(),
            payment_status: r.payment_status.as_str().to_string(),
            booking_status: r.booking_status.as_str().to_string(),
            user_id: r.user_id,
            created_at: r.created_at.to_rfc3339(),
            original_booking_id: r.original_booking_id,
            is_extension: r.is_extension,
        }
    }
}

/// Invoice data for a committed booking
#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDto {
    pub invoice_number: String,
    pub issued_at: String,
    pub customer_name: String,
    pub customer_email: String,
    pub location_name: String,
    pub unit_label: String,
    pub period_start: String,
    pub period_end: String,
    pub lines: Vec<InvoiceLineDto>,
    pub total: i64,
    pub total_formatted: String,
    pub qr_payload: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceLineDto {
    pub description: String,
    pub amount: i64,
    pub amount_formatted: String,
}
