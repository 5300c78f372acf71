//! Route geometry for the map layers
//!
//! Train routes are stored as GeoJSON files, one per city pair:
//! `<first>_<second>.geojson` holds the line and `<first>_<second>_stops.geojson`
//! the stations along it. The pair is sorted by name, except that the pinned
//! city (if configured) always comes first.

use geojson::{Feature, GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use crate::error::PlannerError;
use crate::models::GeoPoint;
use crate::Result;

/// Number of segments of a generated plane arc
pub const ARC_SEGMENTS: usize = 50;
/// Offset of the arc's control point from the chord midpoint, relative to the chord length
pub const ARC_CURVATURE: f64 = 0.2;

/// A station along a train route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub name: Option<String>,
    pub position: [f64; 2],
}

/// Train route polyline with its stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    /// `[longitude, latitude]` positions in travel order
    pub path: Vec<[f64; 2]>,
    pub stops: Vec<RouteStop>,
}

impl RouteGeometry {
    /// Changes of train, i.e. stops that are neither origin nor destination
    #[must_use]
    pub fn transfers(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }

    /// Length of the polyline in kilometers
    #[must_use]
    pub fn length_km(&self) -> f64 {
        self.path
            .windows(2)
            .map(|pair| {
                let from = GeoPoint::new(pair[0][0], pair[0][1]);
                let to = GeoPoint::new(pair[1][0], pair[1][1]);
                from.distance_km(&to)
            })
            .sum()
    }
}

/// Provides train route geometry for a city pair
pub trait RouteGeometrySource: Send + Sync {
    /// `Ok(None)` when no geometry exists for the pair
    fn route_geometry(&self, origin: &str, destination: &str) -> Result<Option<RouteGeometry>>;
}

/// Reads route geometry from a directory of GeoJSON files
#[derive(Debug, Clone)]
pub struct GeoJsonRouteDirectory {
    root: PathBuf,
    pinned_city: Option<String>,
}

impl GeoJsonRouteDirectory {
    pub fn new(root: impl Into<PathBuf>, pinned_city: Option<String>) -> Self {
        Self {
            root: root.into(),
            pinned_city,
        }
    }

    /// File stem for a pair: sorted names, pinned city first
    #[must_use]
    pub fn file_stem(&self, origin: &str, destination: &str) -> String {
        let pinned = self.pinned_city.as_deref();
        let (first, second) = if pinned == Some(origin) {
            (origin, destination)
        } else if pinned == Some(destination) || destination < origin {
            (destination, origin)
        } else {
            (origin, destination)
        };
        format!("{first}_{second}")
    }

    fn line_path(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{stem}.geojson"))
    }

    fn stops_path(&self, stem: &str) -> PathBuf {
        self.root.join(format!("{stem}_stops.geojson"))
    }
}

impl RouteGeometrySource for GeoJsonRouteDirectory {
    #[instrument(skip(self))]
    fn route_geometry(&self, origin: &str, destination: &str) -> Result<Option<RouteGeometry>> {
        let stem = self.file_stem(origin, destination);
        let line_path = self.line_path(&stem);

        if !line_path.exists() {
            warn!("No GeoJSON route found for {} to {}", origin, destination);
            return Ok(None);
        }

        let path = read_line(&line_path)?;
        let stops_path = self.stops_path(&stem);
        let stops = if stops_path.exists() {
            read_stops(&stops_path)?
        } else {
            debug!("No stops file at {:?}", stops_path);
            Vec::new()
        };

        Ok(Some(RouteGeometry { path, stops }))
    }
}

fn read_geojson(path: &Path) -> Result<GeoJson> {
    let text = fs::read_to_string(path)?;
    text.parse::<GeoJson>().map_err(|e| {
        PlannerError::data_integrity(format!("Failed to parse {}: {e}", path.display()))
    })
}

/// Station label of a feature: `stop_name`, else `name`
fn feature_name(feature: &Feature) -> Option<String> {
    ["stop_name", "name"]
        .iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// All geometries of a document, each with its feature's label
fn named_geometries(geojson: GeoJson) -> Vec<(Geometry, Option<String>)> {
    match geojson {
        GeoJson::Geometry(geometry) => vec![(geometry, None)],
        GeoJson::Feature(feature) => {
            let name = feature_name(&feature);
            feature.geometry.map(|g| (g, name)).into_iter().collect()
        }
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .flat_map(|feature| {
                let name = feature_name(&feature);
                feature.geometry.map(|g| (g, name))
            })
            .collect(),
    }
}

fn to_position(position: &[f64], path: &Path) -> Result<[f64; 2]> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok([*lon, *lat]),
        _ => Err(PlannerError::data_integrity(format!(
            "Invalid position {position:?} in {}",
            path.display()
        ))),
    }
}

/// Polyline of the first line geometry in the document
fn read_line(path: &Path) -> Result<Vec<[f64; 2]>> {
    for (geometry, _) in named_geometries(read_geojson(path)?) {
        let positions: Vec<Vec<f64>> = match geometry.value {
            Value::LineString(line) => line,
            Value::MultiLineString(lines) => lines.into_iter().flatten().collect(),
            _ => continue,
        };
        return positions.iter().map(|p| to_position(p, path)).collect();
    }

    Err(PlannerError::data_integrity(format!(
        "No LineString geometry in {}",
        path.display()
    )))
}

fn read_stops(path: &Path) -> Result<Vec<RouteStop>> {
    let mut stops = Vec::new();
    for (geometry, name) in named_geometries(read_geojson(path)?) {
        match geometry.value {
            Value::Point(point) => stops.push(RouteStop {
                name,
                position: to_position(&point, path)?,
            }),
            Value::MultiPoint(points) => {
                for point in points {
                    stops.push(RouteStop {
                        name: name.clone(),
                        position: to_position(&point, path)?,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(stops)
}

/// A curved line between two points for drawing a flight.
///
/// Quadratic Bézier whose control point sits beside the chord midpoint; the
/// result has `ARC_SEGMENTS + 1` positions and starts and ends exactly on the
/// given points.
#[must_use]
pub fn generate_curved_arc(from: GeoPoint, to: GeoPoint) -> Vec<[f64; 2]> {
    let (dx, dy) = (to.lon - from.lon, to.lat - from.lat);
    let control = [
        (from.lon + to.lon) / 2.0 - dy * ARC_CURVATURE,
        (from.lat + to.lat) / 2.0 + dx * ARC_CURVATURE,
    ];

    (0..=ARC_SEGMENTS)
        .map(|i| {
            if i == 0 {
                return from.to_position();
            }
            if i == ARC_SEGMENTS {
                return to.to_position();
            }
            let t = i as f64 / ARC_SEGMENTS as f64;
            let u = 1.0 - t;
            [
                u * u * from.lon + 2.0 * u * t * control[0] + t * t * to.lon,
                u * u * from.lat + 2.0 * u * t * control[1] + t * t * to.lat,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LINE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": [[4.9, 52.37], [6.9, 52.2], [13.4, 52.52]]
            }
        }]
    }"#;

    const STOPS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Amsterdam Centraal"}, "geometry": {"type": "Point", "coordinates": [4.9, 52.37]}},
            {"type": "Feature", "properties": {"name": "Hengelo"}, "geometry": {"type": "Point", "coordinates": [6.79, 52.26]}},
            {"type": "Feature", "properties": {"name": "Hannover Hbf"}, "geometry": {"type": "Point", "coordinates": [9.74, 52.38]}},
            {"type": "Feature", "properties": {"name": "Berlin Hbf"}, "geometry": {"type": "Point", "coordinates": [13.37, 52.52]}}
        ]
    }"#;

    fn directory(pinned: Option<&str>) -> (TempDir, GeoJsonRouteDirectory) {
        let dir = TempDir::new().unwrap();
        let routes = GeoJsonRouteDirectory::new(dir.path(), pinned.map(str::to_string));
        (dir, routes)
    }

    #[test]
    fn test_file_stem_sorts_names() {
        let (_dir, routes) = directory(None);
        assert_eq!(routes.file_stem("Berlin", "Amsterdam"), "Amsterdam_Berlin");
        assert_eq!(routes.file_stem("Amsterdam", "Berlin"), "Amsterdam_Berlin");
    }

    #[test]
    fn test_file_stem_pinned_city_first() {
        let (_dir, routes) = directory(Some("Zurich"));
        assert_eq!(routes.file_stem("Berlin", "Zurich"), "Zurich_Berlin");
        assert_eq!(routes.file_stem("Zurich", "Berlin"), "Zurich_Berlin");
        assert_eq!(routes.file_stem("Paris", "Berlin"), "Berlin_Paris");
    }

    #[test]
    fn test_missing_route_is_none() {
        let (_dir, routes) = directory(None);
        assert_eq!(routes.route_geometry("Paris", "Berlin").unwrap(), None);
    }

    #[test]
    fn test_reads_line_and_stops() {
        let (dir, routes) = directory(None);
        fs::write(dir.path().join("Amsterdam_Berlin.geojson"), LINE).unwrap();
        fs::write(dir.path().join("Amsterdam_Berlin_stops.geojson"), STOPS).unwrap();

        let geometry = routes.route_geometry("Berlin", "Amsterdam").unwrap().unwrap();
        assert_eq!(geometry.path.len(), 3);
        assert_eq!(geometry.path[0], [4.9, 52.37]);
        assert_eq!(geometry.stops.len(), 4);
        assert_eq!(geometry.stops[1].name.as_deref(), Some("Hengelo"));
        assert_eq!(geometry.transfers(), 2);
        assert!(geometry.length_km() > 550.0 && geometry.length_km() < 650.0);
    }

    #[test]
    fn test_line_without_stops_file() {
        let (dir, routes) = directory(None);
        fs::write(dir.path().join("Amsterdam_Berlin.geojson"), LINE).unwrap();

        let geometry = routes.route_geometry("Amsterdam", "Berlin").unwrap().unwrap();
        assert!(geometry.stops.is_empty());
        assert_eq!(geometry.transfers(), 0);
    }

    #[test]
    fn test_stop_name_property_labels_stations() {
        let (dir, routes) = directory(None);
        let stops = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"stop_name": "Utrecht Centraal", "name": "ignored"}, "geometry": {"type": "Point", "coordinates": [5.11, 52.09]}},
                {"type": "Feature", "properties": {"name": "Hengelo"}, "geometry": {"type": "Point", "coordinates": [6.79, 52.26]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [9.74, 52.38]}}
            ]
        }"#;
        fs::write(dir.path().join("Amsterdam_Berlin.geojson"), LINE).unwrap();
        fs::write(dir.path().join("Amsterdam_Berlin_stops.geojson"), stops).unwrap();

        let geometry = routes.route_geometry("Amsterdam", "Berlin").unwrap().unwrap();
        let names: Vec<Option<&str>> = geometry.stops.iter().map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec![Some("Utrecht Centraal"), Some("Hengelo"), None]);
    }

    #[test]
    fn test_multi_line_string_is_flattened() {
        let (dir, routes) = directory(None);
        let multi = r#"{"type": "MultiLineString", "coordinates": [[[1.0, 2.0], [3.0, 4.0]], [[3.0, 4.0], [5.0, 6.0]]]}"#;
        fs::write(dir.path().join("A_B.geojson"), multi).unwrap();

        let geometry = routes.route_geometry("B", "A").unwrap().unwrap();
        assert_eq!(geometry.path, vec![[1.0, 2.0], [3.0, 4.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_malformed_geojson_is_data_integrity_error() {
        let (dir, routes) = directory(None);
        fs::write(dir.path().join("A_B.geojson"), "{ not json").unwrap();
        let err = routes.route_geometry("A", "B").unwrap_err();
        assert!(matches!(err, PlannerError::DataIntegrity { .. }));

        let points_only = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        fs::write(dir.path().join("A_B.geojson"), points_only).unwrap();
        let err = routes.route_geometry("A", "B").unwrap_err();
        assert!(err.to_string().contains("No LineString"));
    }

    #[test]
    fn test_curved_arc() {
        let from = GeoPoint::new(4.9, 52.37);
        let to = GeoPoint::new(13.4, 52.52);
        let arc = generate_curved_arc(from, to);

        assert_eq!(arc.len(), ARC_SEGMENTS + 1);
        assert_eq!(arc[0], from.to_position());
        assert_eq!(arc[ARC_SEGMENTS], to.to_position());
        // Eastbound chord bends north
        let middle = arc[ARC_SEGMENTS / 2];
        assert!(middle[1] > 52.52);
    }
}
