//! Storage location entity

/// WGS84 coordinates of a facility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Great-circle distance to `other` in kilometers (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// A storage facility that accepts bookings.
#[derive(Debug, Clone)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub address: String,
    pub geolocation: GeoPoint,
    /// Remaining bookable units. Decremented on commit, floored at zero.
    pub capacity: i32,
    /// Free-form amenity tags shown on the storefront
    pub features: Vec<String>,
    pub image_url: Option<String>,
}

impl Location {
    /// Whether the facility can take another booking right now.
    pub fn has_capacity(&self) -> bool {
        self.capacity > 0
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // Denpasar to Ubud, roughly 19 km
        let denpasar = GeoPoint {
            latitude: -8.6705,
            longitude: 115.2126,
        };
        let ubud = GeoPoint {
            latitude: -8.5069,
            longitude: 115.2625,
        };
        let d = denpasar.distance_km(&ubud);
        assert!(d > 18.0 && d < 20.0, "got {}", d);
    }

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint {
            latitude: -8.65,
            longitude: 115.21,
        };
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn capacity_gate() {
        let mut loc = Location {
            id: "loc-1".into(),
            name: "Kuta Storage Hub".into(),
            address: "Jl. Raya Kuta No. 1".into(),
            geolocation: GeoPoint {
                latitude: -8.72,
                longitude: 115.17,
            },
            capacity: 1,
            features: vec!["24/7 access".into()],
            image_url: None,
        };
        assert!(loc.has_capacity());
        loc.capacity = 0;
        assert!(!loc.has_capacity());
    }
}
