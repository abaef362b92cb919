//! Quote HTTP handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::domain::booking::{ServiceType, UnitSize};
use crate::domain::DomainError;
use crate::interfaces::http::common::{error_reply, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;
use crate::shared::currency::format_idr;

use super::dto::*;

#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    tag = "Quotes",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price breakdown", body = ApiResponse<QuoteResponse>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Original booking not found")
    )
)]
pub async fn create_quote(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, (StatusCode, Json<ApiResponse<QuoteResponse>>)> {
    let parse = |field: &str, value: &str| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::Validation(format!("Invalid {}: {}", field, e)))
    };
    let start = parse("start_date", &request.start_date).map_err(error_reply)?;
    let end = parse("end_date", &request.end_date).map_err(error_reply)?;

    let extension = match &request.original_booking_id {
        Some(id) => {
            let original = state
                .repos
                .bookings()
                .find_by_id(id)
                .await
                .map_err(error_reply)?
                .ok_or_else(|| {
                    error_reply(DomainError::NotFound {
                        entity: "Reservation",
                        field: "id",
                        value: id.clone(),
                    })
                })?;
            Some(original.extension_context())
        }
        None => None,
    };

    let breakdown = state.pricing.quote(
        UnitSize::from_str(&request.unit_size),
        start,
        end,
        request
            .service_type
            .as_deref()
            .map(ServiceType::from_str)
            .unwrap_or(ServiceType::SelfDropoff),
        extension.as_ref(),
    );

    Ok(Json(ApiResponse::success(QuoteResponse {
        rental_days: breakdown.rental_days,
        storage_cost: breakdown.storage_cost,
        pickup_fee: breakdown.pickup_fee,
        total_price_formatted: format_idr(breakdown.total_price),
        total_price: breakdown.total_price,
    })))
}
