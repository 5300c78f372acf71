//! Trip metrics calculator
//!
//! Turns a [`TripQuery`] into presentation-ready train and plane figures.
//! CO2 is first multiplied by the passenger count; for round trips both the
//! duration and the already scaled CO2 are doubled afterwards. Durations are
//! never scaled by passenger count.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::data::TravelData;
use crate::duration::TravelDuration;
use crate::models::{RouteKey, TripQuery, TripRecord};
use crate::Result;

/// Duration and emissions of one transport mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeMetrics {
    pub duration: TravelDuration,
    /// Total emissions for the whole party in kilograms
    pub co2_kg: f64,
}

impl ModeMetrics {
    fn scaled(duration: TravelDuration, co2_per_passenger: f64, query: &TripQuery) -> Self {
        let mut duration = duration;
        let mut co2_kg = co2_per_passenger * f64::from(query.passengers);

        if query.round_trip {
            duration = duration.doubled();
            co2_kg *= 2.0;
        }

        Self { duration, co2_kg }
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration.total_minutes()
    }

    /// `HH:MM`
    #[must_use]
    pub fn duration_display(&self) -> String {
        self.duration.to_string()
    }
}

/// Plane figures, which do not exist for every route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaneMetrics {
    Available(ModeMetrics),
    Unavailable,
}

impl PlaneMetrics {
    #[must_use]
    pub fn as_available(&self) -> Option<&ModeMetrics> {
        match self {
            PlaneMetrics::Available(metrics) => Some(metrics),
            PlaneMetrics::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, PlaneMetrics::Available(_))
    }
}

/// Derived figures for a single query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub route: RouteKey,
    pub passengers: u32,
    pub round_trip: bool,
    pub train: ModeMetrics,
    pub plane: PlaneMetrics,
}

impl TripMetrics {
    /// Derive the figures for `query` from one base record
    #[must_use]
    pub fn from_record(record: &TripRecord, query: &TripQuery) -> Self {
        let train = ModeMetrics::scaled(record.train_duration, record.train_co2_kg, query);
        let plane = match record.plane_figures() {
            Some((duration, co2)) => {
                PlaneMetrics::Available(ModeMetrics::scaled(duration, co2, query))
            }
            None => PlaneMetrics::Unavailable,
        };

        Self {
            route: record.route_key(),
            passengers: query.passengers,
            round_trip: query.round_trip,
            train,
            plane,
        }
    }

    /// Longest duration among the available modes
    #[must_use]
    pub fn max_duration_minutes(&self) -> u32 {
        let plane = self.plane.as_available().map_or(0, ModeMetrics::duration_minutes);
        self.train.duration_minutes().max(plane)
    }
}

/// Look up the query's route and derive its metrics.
///
/// Returns `Ok(None)` when both cities are valid but no record exists for the
/// pair. Invalid queries (same city twice, passenger count out of range,
/// unknown cities) are rejected before the lookup.
#[instrument(skip(data))]
pub fn compute_trip_metrics(data: &TravelData, query: &TripQuery) -> Result<Option<TripMetrics>> {
    query.validate()?;
    data.require_city(&query.origin)?;
    data.require_city(&query.destination)?;

    let key = query.route_key();
    let Some(record) = data.trip(&key) else {
        debug!("No trip record for route {}", key);
        return Ok(None);
    };

    Ok(Some(TripMetrics::from_record(record, query)))
}
