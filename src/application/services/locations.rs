//! Location directory
//!
//! Read side of the storefront map: list facilities, optionally sorted
//! by distance from the searcher.

use std::sync::Arc;

use crate::domain::location::{GeoPoint, Location, LocationRepository};
use crate::domain::{DomainError, DomainResult};

pub struct LocationDirectory {
    locations: Arc<dyn LocationRepository>,
}

/// A facility with its distance from the search point, when one was given.
#[derive(Debug, Clone)]
pub struct LocationListing {
    pub location: Location,
    pub distance_km: Option<f64>,
}

impl LocationDirectory {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    /// All facilities. With `near`, sorted closest first; otherwise in
    /// name order.
    pub async fn list(&self, near: Option<GeoPoint>) -> DomainResult<Vec<LocationListing>> {
        let mut listings: Vec<LocationListing> = self
            .locations
            .find_all()
            .await?
            .into_iter()
            .map(|location| {
                let distance_km = near.map(|p| p.distance_km(&location.geolocation));
                LocationListing {
                    location,
                    distance_km,
                }
            })
            .collect();

        if near.is_some() {
            listings.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        } else {
            listings.sort_by(|a, b| a.location.name.cmp(&b.location.name));
        }
        Ok(listings)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Location> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Location",
                field: "id",
                value: id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::storage::InMemoryStorage;

    async fn seed(storage: &InMemoryStorage, id: &str, name: &str, lat: f64, lon: f64) {
        LocationRepository::save(
            storage,
            Location {
                id: id.into(),
                name: name.into(),
                address: "somewhere".into(),
                geolocation: GeoPoint {
                    latitude: lat,
                    longitude: lon,
                },
                capacity: 5,
                features: vec![],
                image_url: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn sorts_by_distance_when_a_point_is_given() {
        let storage = InMemoryStorage::new();
        seed(&storage, "far", "Ubud Depot", -8.5069, 115.2625).await;
        seed(&storage, "close", "Kuta Storage Hub", -8.7200, 115.1700).await;
        let directory = LocationDirectory::new(storage.locations());

        let searcher = GeoPoint {
            latitude: -8.7230,
            longitude: 115.1720,
        };
        let listings = directory.list(Some(searcher)).await.unwrap();
        assert_eq!(listings[0].location.id, "close");
        assert!(listings[0].distance_km.unwrap() < listings[1].distance_km.unwrap());
    }

    #[tokio::test]
    async fn sorts_by_name_without_a_point() {
        let storage = InMemoryStorage::new();
        seed(&storage, "b", "Ubud Depot", -8.5, 115.26).await;
        seed(&storage, "a", "Kuta Storage Hub", -8.72, 115.17).await;
        let directory = LocationDirectory::new(storage.locations());

        let listings = directory.list(None).await.unwrap();
        assert_eq!(listings[0].location.name, "Kuta Storage Hub");
        assert!(listings[0].distance_km.is_none());
    }

    #[tokio::test]
    async fn get_missing_location_is_not_found() {
        let storage = InMemoryStorage::new();
        let directory = LocationDirectory::new(storage.locations());
        let err = directory.get("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
