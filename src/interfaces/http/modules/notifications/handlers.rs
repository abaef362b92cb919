//! Notification HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::interfaces::http::common::{error_reply, ApiResponse};
use crate::interfaces::http::AppState;

use super::dto::*;

#[utoipa::path(
    get,
    path = "/api/v1/notifications/expiring/{user_id}",
    tag = "Notifications",
    params(("user_id" = String, Path, description = "User whose bookings to scan")),
    responses(
        (status = 200, description = "Bookings expiring within 7 days, soonest first", body = ApiResponse<Vec<ExpiringBookingDto>>)
    )
)]
pub async fn list_expiring(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<
    Json<ApiResponse<Vec<ExpiringBookingDto>>>,
    (StatusCode, Json<ApiResponse<Vec<ExpiringBookingDto>>>),
> {
    let snapshot = state.dashboard.snapshot(&user_id).await.map_err(error_reply)?;
    let dtos: Vec<ExpiringBookingDto> = snapshot
        .expiring
        .into_iter()
        .map(|e| ExpiringBookingDto {
            booking: e.reservation.into(),
            days_left: e.days_left,
        })
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}
