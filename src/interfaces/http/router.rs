//! API Router with Swagger UI

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::modules::{bookings, health, locations, notifications, quotes, users};
use super::AppState;
use crate::interfaces::http::common::ApiResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Locations
        locations::list_locations,
        locations::get_location,
        // Quotes
        quotes::create_quote,
        // Bookings
        bookings::create_booking,
        bookings::extend_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::get_invoice,
        // Notifications
        notifications::list_expiring,
        // Users
        users::register,
        users::login,
        users::get_profile,
        users::update_profile,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthStatus,
            // Locations
            locations::LocationDto,
            // Quotes
            quotes::QuoteRequest,
            quotes::QuoteResponse,
            // Bookings
            bookings::CreateBookingRequest,
            bookings::ExtendBookingRequest,
            bookings::BookingDto,
            bookings::InvoiceDto,
            bookings::InvoiceLineDto,
            // Notifications
            notifications::ExpiringBookingDto,
            // Users
            users::RegisterRequest,
            users::LoginRequest,
            users::UpdateProfileRequest,
            users::UserDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Locations", description = "Storage facility directory with distance search"),
        (name = "Quotes", description = "Price previews for new bookings and extensions"),
        (name = "Bookings", description = "Reservation lifecycle: create, extend, list, invoice"),
        (name = "Notifications", description = "Bookings expiring within the next week"),
        (name = "Users", description = "Customer accounts and profiles"),
    ),
    info(
        title = "Storapedia Booking API",
        version = "1.0.0",
        description = "REST API for self-storage bookings, pricing and extensions",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/locations", get(locations::list_locations))
        .route("/locations/{location_id}", get(locations::get_location))
        .route("/quotes", post(quotes::create_quote))
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/bookings/{booking_id}", get(bookings::get_booking))
        .route("/bookings/{booking_id}/extend", post(bookings::extend_booking))
        .route("/bookings/{booking_id}/invoice", get(bookings::get_invoice))
        .route(
            "/notifications/expiring/{user_id}",
            get(notifications::list_expiring),
        )
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route(
            "/users/{user_id}",
            get(users::get_profile).put(users::update_profile),
        )
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
