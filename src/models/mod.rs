//! Data models for the travel planner
//!
//! This module contains the core domain models organized by concern:
//! - City: selectable endpoints and their coordinates
//! - Trip: base travel records, route keys and user queries

pub mod city;
pub mod trip;

// Re-export all public types for convenient access
pub use city::{CityCoordinate, GeoPoint};
pub use trip::{MAX_PASSENGERS, RouteKey, TripQuery, TripRecord, normalize_city_pair};
