//! Trip records, route keys and user queries

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::duration::TravelDuration;
use crate::error::PlannerError;
use crate::Result;

/// Largest party size a single query may ask for
pub const MAX_PASSENGERS: u32 = 10;

/// Canonical identifier of an unordered city pair.
///
/// The two names are kept in lexicographic order, so `new(a, b)` and
/// `new(b, a)` produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteKey {
    first: String,
    second: String,
}

impl RouteKey {
    #[must_use]
    pub fn new(city_a: &str, city_b: &str) -> Self {
        let (first, second) = if city_a <= city_b {
            (city_a, city_b)
        } else {
            (city_b, city_a)
        };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Lexicographically smaller city
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger city
    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Join two city names into the order-independent route identifier
#[must_use]
pub fn normalize_city_pair(city_a: &str, city_b: &str) -> String {
    RouteKey::new(city_a, city_b).to_string()
}

/// Base travel data for one unordered city pair, per passenger and one way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub city_a: String,
    pub city_b: String,
    pub train_duration: TravelDuration,
    pub train_co2_kg: f64,
    /// Time in the air, absent when no flight exists
    pub plane_duration: Option<TravelDuration>,
    /// Door-to-door plane time including airport overhead
    pub plane_total_duration: Option<TravelDuration>,
    pub plane_co2_kg: Option<f64>,
}

impl TripRecord {
    #[must_use]
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(&self.city_a, &self.city_b)
    }

    /// Plane figures for this pair, if both total duration and CO2 are known
    #[must_use]
    pub fn plane_figures(&self) -> Option<(TravelDuration, f64)> {
        match (self.plane_total_duration, self.plane_co2_kg) {
            (Some(duration), Some(co2)) if co2.is_finite() => Some((duration, co2)),
            _ => None,
        }
    }
}

/// A single comparison request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    pub passengers: u32,
    pub round_trip: bool,
}

impl TripQuery {
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            passengers: 1,
            round_trip: false,
        }
    }

    #[must_use]
    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    #[must_use]
    pub fn with_round_trip(mut self, round_trip: bool) -> Self {
        self.round_trip = round_trip;
        self
    }

    #[must_use]
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(&self.origin, &self.destination)
    }

    /// Check the query shape. City existence is checked against the dataset.
    pub fn validate(&self) -> Result<()> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(PlannerError::invalid_query(
                "Please select both \"From\" and \"To\" cities.",
            ));
        }

        if self.origin == self.destination {
            return Err(PlannerError::invalid_query(
                "Departure and destination must be different cities.",
            ));
        }

        if !(1..=MAX_PASSENGERS).contains(&self.passengers) {
            return Err(PlannerError::invalid_query(format!(
                "Number of people must be between 1 and {MAX_PASSENGERS}, got {}",
                self.passengers
            )));
        }

        Ok(())
    }
}
