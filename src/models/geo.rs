//! Geographic models
//!
//! Coordinate lookup rows for destination and origin countries, and the
//! map-ready shapes derived from them.

use serde::{Deserialize, Serialize};

use crate::models::types::PopulationType;

/// Canonical index column of both coordinate tables
pub const NO: &str = "No.";
/// Canonical latitude column of the destination table
pub const LAT: &str = "lat";
/// Canonical longitude column of the destination table
pub const LON: &str = "lon";
/// Canonical latitude column of the origin table
pub const LATITUDE: &str = "latitude";
/// Canonical longitude column of the origin table
pub const LONGITUDE: &str = "longitude";

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Anything that carries a country label and a position
pub trait Located {
    /// The join key / display label
    fn label(&self) -> &str;

    /// Position of the label
    fn coordinates(&self) -> Coordinates;
}

/// Destination country coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "No.", default)]
    pub no: Option<i64>,
    #[serde(rename = "Country")]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Located for GeoPoint {
    fn label(&self) -> &str {
        &self.country
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Origin country coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginGeoPoint {
    #[serde(rename = "No.", default)]
    pub no: Option<i64>,
    #[serde(rename = "Country of Origin")]
    pub country_of_origin: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Located for OriginGeoPoint {
    fn label(&self) -> &str {
        &self.country_of_origin
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// An aggregated, geocoded point ready for scatter rendering
///
/// `size` is a rendering hint: `individuals / divisor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint<G> {
    #[serde(flatten)]
    pub geo: G,
    #[serde(rename = "Individuals")]
    pub individuals: i64,
    pub size: f64,
}

impl<G: Located> MapPoint<G> {
    /// Attach an aggregated count to a coordinate row
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(geo: G, individuals: i64, size_divisor: f64) -> Self {
        Self {
            geo,
            individuals,
            size: individuals as f64 / size_divisor,
        }
    }

    /// The country label of this point
    #[must_use]
    pub fn label(&self) -> &str {
        self.geo.label()
    }
}

/// A single unaggregated record with both ends geocoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Country of Origin")]
    pub country_of_origin: String,
    #[serde(rename = "Population type")]
    pub population_type: PopulationType,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Individuals")]
    pub individuals: i64,
    /// Origin position
    pub source: Coordinates,
    /// Destination position
    pub target: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_point_size_uses_divisor() {
        let geo = GeoPoint {
            no: Some(0),
            country: "Chad".into(),
            lat: 15.6,
            lon: 18.7,
        };
        let point = MapPoint::new(geo, 1_000, 50.0);
        assert!((point.size - 20.0).abs() < f64::EPSILON);
        assert_eq!(point.label(), "Chad");
    }

    #[test]
    fn map_point_serializes_flat() {
        let geo = OriginGeoPoint {
            no: Some(3),
            country_of_origin: "Sudan".into(),
            latitude: 15.5,
            longitude: 32.5,
        };
        let value = serde_json::to_value(MapPoint::new(geo, 200, 100.0)).unwrap();
        assert_eq!(value["Country of Origin"], "Sudan");
        assert_eq!(value["Individuals"], 200);
        assert_eq!(value["size"], 2.0);
        assert_eq!(value["No."], 3);
    }
}
