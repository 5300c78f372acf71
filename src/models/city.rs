//! City model for selectable endpoints

use serde::{Deserialize, Serialize};

/// A selectable city and its position
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityCoordinate {
    /// City name, unique within the dataset
    #[serde(alias = "city")]
    pub name: String,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Latitude in decimal degrees
    pub latitude: f64,
}

impl CityCoordinate {
    #[must_use]
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
        }
    }

    #[must_use]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// A bare longitude/latitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// GeoJSON position order
    #[must_use]
    pub const fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lon,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lon,
            },
            haversine::Units::Kilometers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_point() {
        let city = CityCoordinate::new("Berlin", 13.405, 52.52);
        assert_eq!(city.point(), GeoPoint::new(13.405, 52.52));
        assert_eq!(city.point().to_position(), [13.405, 52.52]);
    }

    #[test]
    fn test_deserialize_dataset_column_name() {
        let city: CityCoordinate =
            serde_json::from_str(r#"{"city": "Paris", "longitude": 2.35, "latitude": 48.86}"#)
                .unwrap();
        assert_eq!(city.name, "Paris");
    }

    #[test]
    fn test_distance_km() {
        let berlin = GeoPoint::new(13.405, 52.52);
        let paris = GeoPoint::new(2.3522, 48.8566);
        let distance = berlin.distance_km(&paris);
        // Roughly 878 km as the crow flies
        assert!(distance > 850.0 && distance < 900.0);
        assert!(berlin.distance_km(&berlin).abs() < 1e-9);
    }
}
