//! Booking HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::application::booking::{BookingDraft, SessionContext};
use crate::domain::booking::{PaymentMethod, ServiceType, UnitSize};
use crate::domain::DomainError;
use crate::interfaces::http::common::{error_reply, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

use super::dto::*;

fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Validation(format!("Invalid {}: {}", field, e)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking committed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid request"),
        (status = 402, description = "Payment declined"),
        (status = 409, description = "Email already registered or duplicate submission")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    // location must exist; its name is denormalized onto the booking
    let location = state
        .directory
        .get(&request.location_id)
        .await
        .map_err(error_reply)?;

    let mut draft = BookingDraft::new(
        location.id.clone(),
        location.name.clone(),
        UnitSize::from_str(&request.unit_size),
    );
    draft.start_date = Some(
        parse_instant("start_date", &request.start_date).map_err(error_reply)?,
    );
    draft.end_date = Some(parse_instant("end_date", &request.end_date).map_err(error_reply)?);
    draft.service_type = request
        .service_type
        .as_deref()
        .map(ServiceType::from_str)
        .unwrap_or(ServiceType::SelfDropoff);
    draft.pickup_address = request.pickup_address;
    draft.payment_method = request
        .payment_method
        .as_deref()
        .map(PaymentMethod::from_str)
        .unwrap_or(PaymentMethod::OnSite);
    draft.guest_name = request.guest_name.unwrap_or_default();
    draft.guest_phone = request.guest_phone.unwrap_or_default();
    draft.guest_email = request.guest_email.unwrap_or_default();

    let session = match request.user_id {
        Some(user_id) => SessionContext::authenticated(user_id),
        None => SessionContext::guest(),
    };

    let reservation = state
        .bookings
        .commit(&draft, &session)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/extend",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking to extend")),
    request_body = ExtendBookingRequest,
    responses(
        (status = 200, description = "Extension committed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn extend_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ExtendBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let original = state
        .repos
        .bookings()
        .find_by_id(&booking_id)
        .await
        .map_err(error_reply)?
        .ok_or_else(|| {
            error_reply(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: booking_id.clone(),
            })
        })?;

    if original.user_id != request.user_id {
        return Err(error_reply(DomainError::NotFound {
            entity: "Reservation",
            field: "id",
            value: booking_id,
        }));
    }
    if !original.can_extend(Utc::now()) {
        return Err(error_reply(DomainError::Validation(
            "This booking can no longer be extended.".to_string(),
        )));
    }

    let mut draft = BookingDraft::for_extension(
        original.location_id.clone(),
        original.location_name.clone(),
        original.unit_size,
        original.extension_context(),
    );
    draft.end_date = Some(
        parse_instant("new_end_date", &request.new_end_date).map_err(error_reply)?,
    );
    draft.payment_method = request
        .payment_method
        .as_deref()
        .map(PaymentMethod::from_str)
        .unwrap_or(PaymentMethod::OnSite);

    let session = SessionContext::authenticated(request.user_id);
    let extension = state
        .bookings
        .commit(&draft, &session)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(extension.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings for a user, newest first", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, (StatusCode, Json<ApiResponse<Vec<BookingDto>>>)> {
    let reservations = state
        .repos
        .bookings()
        .find_for_user(&query.user_id)
        .await
        .map_err(error_reply)?;
    let dtos: Vec<BookingDto> = reservations.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let reservation = state
        .repos
        .bookings()
        .find_by_id(&booking_id)
        .await
        .map_err(error_reply)?
        .ok_or_else(|| {
            error_reply(DomainError::NotFound {
                entity: "Reservation",
                field: "id",
                value: booking_id,
            })
        })?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}/invoice",
    tag = "Bookings",
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Invoice data for rendering", body = ApiResponse<InvoiceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<InvoiceDto>>, (StatusCode, Json<ApiResponse<InvoiceDto>>)> {
    let invoice = state
        .invoices
        .generate(&booking_id)
        .await
        .map_err(error_reply)?;
    Ok(Json(ApiResponse::success(InvoiceDto {
        invoice_number: invoice.invoice_number,
        issued_at: invoice.issued_at.to_rfc3339(),
        customer_name: invoice.customer_name,
        customer_email: invoice.customer_email,
        location_name: invoice.location_name,
        unit_label: invoice.unit_label,
        period_start: invoice.period_start.to_rfc3339(),
        period_end: invoice.period_end.to_rfc3339(),
        lines: invoice
            .lines
            .into_iter()
            .map(|l| InvoiceLineDto {
                description: l.description,
                amount: l.amount,
                amount_formatted: l.amount_formatted,
            })
            .collect(),
        total: invoice.total,
        total_formatted: invoice.total_formatted,
        qr_payload: invoice.qr_payload,
    })))
}
