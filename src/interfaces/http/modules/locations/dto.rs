//! Location DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Optional search point for distance sorting
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListLocationsQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Location details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub available: bool,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    /// Kilometers from the search point, when one was given
    pub distance_km: Option<f64>,
}
