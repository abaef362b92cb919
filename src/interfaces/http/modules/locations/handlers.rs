//! Location HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::domain::location::{GeoPoint, Location};
use crate::interfaces::http::common::{error_reply, ApiResponse};
use crate::interfaces::http::AppState;

use super::dto::*;

fn to_dto(location: Location, distance_km: Option<f64>) -> LocationDto {
    LocationDto {
        available: location.has_capacity(),
        id: location.id,
        name: location.name,
        address: location.address,
        latitude: location.geolocation.latitude,
        longitude: location.geolocation.longitude,
        capacity: location.capacity,
        features: location.features,
        image_url: location.image_url,
        distance_km,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    params(ListLocationsQuery),
    responses(
        (status = 200, description = "All storage locations", body = ApiResponse<Vec<LocationDto>>)
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<ListLocationsQuery>,
) -> Result<Json<ApiResponse<Vec<LocationDto>>>, (StatusCode, Json<ApiResponse<Vec<LocationDto>>>)>
{
    let near = match (query.latitude, query.longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let listings = state.directory.list(near).await.map_err(error_reply)?;
    let dtos = listings
        .into_iter()
        .map(|l| to_dto(l.location, l.distance_km))
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{location_id}",
    tag = "Locations",
    params(("location_id" = String, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location details", body = ApiResponse<LocationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
) -> Result<Json<ApiResponse<LocationDto>>, (StatusCode, Json<ApiResponse<LocationDto>>)> {
    let location = state.directory.get(&location_id).await.map_err(error_reply)?;
    Ok(Json(ApiResponse::success(to_dto(location, None))))
}
