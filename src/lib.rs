//! Sustainable travel planner
//!
//! Compares train and plane trips between European cities: travel duration
//! and CO2 emissions for a party of passengers, one way or round trip, plus
//! the map framing and route geometry to display the journey.

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod duration;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod routes;
pub mod web;

// Re-export core types for public API
pub use chart::{ComparisonCharts, tick_interval, tick_values};
pub use config::PlannerConfig;
pub use dashboard::{Dashboard, SearchOutcome, TripView};
pub use data::TravelData;
pub use duration::{TravelDuration, double_duration};
pub use error::PlannerError;
pub use metrics::{ModeMetrics, PlaneMetrics, TripMetrics, compute_trip_metrics};
pub use models::{CityCoordinate, GeoPoint, RouteKey, TripQuery, TripRecord};
pub use projection::{ProjectionParams, ProjectionSettings, compute_projection_params};
pub use routes::{GeoJsonRouteDirectory, RouteGeometry, RouteGeometrySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
