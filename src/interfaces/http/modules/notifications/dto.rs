//! Notification DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::interfaces::http::modules::bookings::BookingDto;

/// A booking ending within the next week
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpiringBookingDto {
    pub booking: BookingDto,
    /// Whole days until the rental ends (ceiling, 1 to 7)
    pub days_left: i64,
}
