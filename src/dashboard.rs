//! Search assembly for the dashboard
//!
//! Runs one comparison end to end: metrics, chart series, map framing and
//! route layers. Everything returned here is plain data for a renderer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::chart::{ComparisonCharts, TravelMode};
use crate::data::TravelData;
use crate::metrics::{ModeMetrics, PlaneMetrics, TripMetrics, compute_trip_metrics};
use crate::models::{CityCoordinate, TripQuery};
use crate::projection::{ProjectionParams, ProjectionSettings, compute_projection_params};
use crate::routes::{RouteGeometry, RouteGeometrySource, generate_curved_arc};
use crate::Result;

pub const ORIGIN_MARKER_SIZE: f64 = 200.0;
/// Destination marker area per kilogram of CO2
pub const MARKER_SIZE_PER_KG: f64 = 10.0;
/// Kilograms of CO2 per pixel of route stroke width
pub const KG_PER_STROKE_WIDTH: f64 = 15.0;

pub const NO_FLIGHTS_NOTICE: &str = "Cities are too close, no flights available.";
pub const AIRPORT_OVERHEAD_NOTICE: &str =
    "Plane duration includes +3h for getting to/from the airport, security check and boarding";
/// Both legs carry the airport overhead
pub const ROUND_TRIP_AIRPORT_OVERHEAD_NOTICE: &str =
    "Plane duration includes +6h for getting to/from the airport, security check and boarding";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub city: String,
    pub position: [f64; 2],
    /// `None` for the departure marker
    pub mode: Option<TravelMode>,
    pub size: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLayer {
    pub mode: TravelMode,
    pub path: Vec<[f64; 2]>,
    pub stroke_width: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMap {
    pub projection: ProjectionParams,
    pub origin: Marker,
    pub destination: Vec<Marker>,
    pub train_route: Option<RouteLayer>,
    pub plane_route: Option<RouteLayer>,
    pub transfers: Option<usize>,
    pub train_route_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripView {
    pub origin: CityCoordinate,
    pub destination: CityCoordinate,
    pub metrics: TripMetrics,
    pub charts: ComparisonCharts,
    pub map: RouteMap,
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(Box<TripView>),
    NotFound { message: String },
}

/// Shared, read-only services behind every search
#[derive(Clone)]
pub struct Dashboard {
    data: Arc<TravelData>,
    routes: Arc<dyn RouteGeometrySource>,
    projection: ProjectionSettings,
}

impl Dashboard {
    pub fn new(
        data: Arc<TravelData>,
        routes: Arc<dyn RouteGeometrySource>,
        projection: ProjectionSettings,
    ) -> Self {
        Self {
            data,
            routes,
            projection,
        }
    }

    #[must_use]
    pub fn data(&self) -> &TravelData {
        &self.data
    }

    #[must_use]
    pub fn projection_settings(&self) -> &ProjectionSettings {
        &self.projection
    }

    #[instrument(skip(self))]
    pub fn search(&self, query: &TripQuery) -> Result<SearchOutcome> {
        let Some(metrics) = compute_trip_metrics(&self.data, query)? else {
            info!("No travel data for {} to {}", query.origin, query.destination);
            return Ok(SearchOutcome::NotFound {
                message: format!(
                    "No travel data available for the route from {} to {}.",
                    query.origin, query.destination
                ),
            });
        };

        let origin = self.data.require_city(&query.origin)?.clone();
        let destination = self.data.require_city(&query.destination)?.clone();

        let projection =
            compute_projection_params(&[origin.point(), destination.point()], &self.projection)?;
        let geometry = self.routes.route_geometry(&origin.name, &destination.name)?;

        let mut notices = Vec::new();
        if metrics.plane.is_available() {
            let overhead = if metrics.round_trip {
                ROUND_TRIP_AIRPORT_OVERHEAD_NOTICE
            } else {
                AIRPORT_OVERHEAD_NOTICE
            };
            notices.push(overhead.to_string());
        } else {
            notices.push(NO_FLIGHTS_NOTICE.to_string());
        }
        if geometry.is_none() {
            notices.push(format!(
                "No route geometry found for {} to {}",
                origin.name, destination.name
            ));
        }

        let map = route_map(&origin, &destination, &metrics, projection, geometry.as_ref());
        let charts = ComparisonCharts::from_metrics(&metrics);

        Ok(SearchOutcome::Found(Box::new(TripView {
            origin,
            destination,
            metrics,
            charts,
            map,
            notices,
        })))
    }
}

fn destination_marker(
    destination: &CityCoordinate,
    mode: TravelMode,
    metrics: &ModeMetrics,
) -> Marker {
    Marker {
        city: destination.name.clone(),
        position: destination.point().to_position(),
        mode: Some(mode),
        size: metrics.co2_kg * MARKER_SIZE_PER_KG,
        tooltip: format!("{}: {} kg CO2", destination.name, metrics.co2_kg.round()),
    }
}

fn route_map(
    origin: &CityCoordinate,
    destination: &CityCoordinate,
    metrics: &TripMetrics,
    projection: ProjectionParams,
    geometry: Option<&RouteGeometry>,
) -> RouteMap {
    let mut markers = Vec::new();
    if let PlaneMetrics::Available(plane) = &metrics.plane {
        markers.push(destination_marker(destination, TravelMode::Plane, plane));
    }
    markers.push(destination_marker(destination, TravelMode::Train, &metrics.train));

    let train_route = geometry.map(|geometry| RouteLayer {
        mode: TravelMode::Train,
        path: geometry.path.clone(),
        stroke_width: metrics.train.co2_kg / KG_PER_STROKE_WIDTH,
        tooltip: format!(
            "Train from {} to {}: {:.1} kg, {}",
            origin.name,
            destination.name,
            metrics.train.co2_kg,
            metrics.train.duration_display()
        ),
    });

    let plane_route = metrics.plane.as_available().map(|plane| RouteLayer {
        mode: TravelMode::Plane,
        path: generate_curved_arc(origin.point(), destination.point()),
        stroke_width: plane.co2_kg / KG_PER_STROKE_WIDTH,
        tooltip: format!(
            "Plane from {} to {}: {:.1} kg, {}",
            origin.name,
            destination.name,
            plane.co2_kg,
            plane.duration_display()
        ),
    });

    RouteMap {
        projection,
        origin: Marker {
            city: origin.name.clone(),
            position: origin.point().to_position(),
            mode: None,
            size: ORIGIN_MARKER_SIZE,
            tooltip: origin.name.clone(),
        },
        destination: markers,
        train_route,
        plane_route,
        transfers: geometry.map(RouteGeometry::transfers),
        train_route_km: geometry.map(RouteGeometry::length_km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::TravelDuration;
    use crate::error::PlannerError;
    use crate::models::TripRecord;
    use crate::routes::{ARC_SEGMENTS, RouteStop};

    struct FixedRoutes(Option<RouteGeometry>);

    impl RouteGeometrySource for FixedRoutes {
        fn route_geometry(
            &self,
            _origin: &str,
            _destination: &str,
        ) -> Result<Option<RouteGeometry>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRoutes;

    impl RouteGeometrySource for BrokenRoutes {
        fn route_geometry(
            &self,
            _origin: &str,
            _destination: &str,
        ) -> Result<Option<RouteGeometry>> {
            Err(PlannerError::data_integrity("corrupt route file"))
        }
    }

    fn data() -> Arc<TravelData> {
        let trips = vec![
            TripRecord {
                city_a: "Amsterdam".to_string(),
                city_b: "Berlin".to_string(),
                train_duration: TravelDuration::parse("6:15").unwrap(),
                train_co2_kg: 15.0,
                plane_duration: Some(TravelDuration::parse("1:20").unwrap()),
                plane_total_duration: Some(TravelDuration::parse("4:20").unwrap()),
                plane_co2_kg: Some(75.0),
            },
            TripRecord {
                city_a: "Amsterdam".to_string(),
                city_b: "Brussels".to_string(),
                train_duration: TravelDuration::parse("1:52").unwrap(),
                train_co2_kg: 4.8,
                plane_duration: None,
                plane_total_duration: None,
                plane_co2_kg: None,
            },
        ];
        let cities = vec![
            CityCoordinate::new("Amsterdam", 4.9041, 52.3676),
            CityCoordinate::new("Berlin", 13.405, 52.52),
            CityCoordinate::new("Brussels", 4.3517, 50.8503),
            CityCoordinate::new("Paris", 2.3522, 48.8566),
        ];
        Arc::new(TravelData::from_parts(cities, trips).unwrap())
    }

    fn stop(name: &str, position: [f64; 2]) -> RouteStop {
        RouteStop {
            name: Some(name.to_string()),
            position,
        }
    }

    fn geometry() -> RouteGeometry {
        RouteGeometry {
            path: vec![[4.9041, 52.3676], [9.74, 52.38], [13.405, 52.52]],
            stops: vec![
                stop("Amsterdam", [4.9041, 52.3676]),
                stop("Hannover", [9.74, 52.38]),
                stop("Berlin", [13.405, 52.52]),
            ],
        }
    }

    fn dashboard(routes: Arc<dyn RouteGeometrySource>) -> Dashboard {
        Dashboard::new(data(), routes, ProjectionSettings::default())
    }

    fn found(outcome: SearchOutcome) -> TripView {
        match outcome {
            SearchOutcome::Found(view) => *view,
            SearchOutcome::NotFound { message } => panic!("expected a trip, got: {message}"),
        }
    }

    #[test]
    fn test_search_with_plane_and_route() {
        let dashboard = dashboard(Arc::new(FixedRoutes(Some(geometry()))));
        let query = TripQuery::new("Amsterdam", "Berlin").with_passengers(2);
        let view = found(dashboard.search(&query).unwrap());

        assert_eq!(view.metrics.train.co2_kg, 30.0);
        assert_eq!(view.notices, vec![AIRPORT_OVERHEAD_NOTICE.to_string()]);

        let map = &view.map;
        assert_eq!(map.origin.size, ORIGIN_MARKER_SIZE);
        assert_eq!(map.destination.len(), 2);
        assert_eq!(map.destination[0].mode, Some(TravelMode::Plane));
        assert_eq!(map.destination[0].size, 1500.0);
        assert_eq!(map.destination[1].size, 300.0);
        assert_eq!(map.train_route.as_ref().unwrap().stroke_width, 2.0);
        assert_eq!(map.plane_route.as_ref().unwrap().stroke_width, 10.0);
        assert_eq!(map.plane_route.as_ref().unwrap().path.len(), ARC_SEGMENTS + 1);
        assert_eq!(map.transfers, Some(1));
        assert!(map.train_route_km.unwrap() > 500.0);
        assert!(map.projection.scale.is_finite());
    }

    #[test]
    fn test_search_without_plane_or_route() {
        let dashboard = dashboard(Arc::new(FixedRoutes(None)));
        let query = TripQuery::new("Brussels", "Amsterdam").with_round_trip(true);
        let view = found(dashboard.search(&query).unwrap());

        assert_eq!(view.metrics.plane, PlaneMetrics::Unavailable);
        assert_eq!(view.charts.durations[1].minutes, 0);
        assert_eq!(view.map.destination.len(), 1);
        assert!(view.map.plane_route.is_none());
        assert!(view.map.train_route.is_none());
        assert_eq!(view.map.transfers, None);
        assert_eq!(view.notices[0], NO_FLIGHTS_NOTICE);
        assert!(view.notices[1].contains("No route geometry"));
    }

    #[test]
    fn test_round_trip_airport_notice() {
        let dashboard = dashboard(Arc::new(FixedRoutes(Some(geometry()))));
        let query = TripQuery::new("Berlin", "Amsterdam").with_round_trip(true);
        let view = found(dashboard.search(&query).unwrap());

        assert_eq!(
            view.notices,
            vec![ROUND_TRIP_AIRPORT_OVERHEAD_NOTICE.to_string()]
        );
        assert!(view.notices[0].contains("+6h"));
        assert_eq!(view.metrics.plane.as_available().unwrap().duration_minutes(), 520);
    }

    #[test]
    fn test_search_not_found() {
        let dashboard = dashboard(Arc::new(FixedRoutes(None)));
        let outcome = dashboard.search(&TripQuery::new("Paris", "Berlin")).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                message: "No travel data available for the route from Paris to Berlin."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_search_propagates_errors() {
        let dashboard = dashboard(Arc::new(BrokenRoutes));
        let err = dashboard
            .search(&TripQuery::new("Amsterdam", "Berlin"))
            .unwrap_err();
        assert!(matches!(err, PlannerError::DataIntegrity { .. }));

        let err = dashboard
            .search(&TripQuery::new("Amsterdam", "Amsterdam"))
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidQuery { .. }));
    }
}
