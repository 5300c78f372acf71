//! Read-only travel dataset
//!
//! Trip records and city coordinates are loaded once at startup from two CSV
//! files and never mutated afterwards. The resulting [`TravelData`] is shared
//! freely (usually behind an `Arc`) by every request.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::duration::TravelDuration;
use crate::error::PlannerError;
use crate::models::{CityCoordinate, RouteKey, TripRecord};
use crate::Result;

/// Raw row of the trips CSV
#[derive(Debug, Deserialize)]
struct TripRow {
    #[serde(rename = "City_1")]
    city_1: String,
    #[serde(rename = "City_2")]
    city_2: String,
    #[serde(rename = "Duration_train")]
    duration_train: String,
    #[serde(rename = "Train_CO2_kg")]
    train_co2_kg: f64,
    #[serde(rename = "Duration_plane", default)]
    duration_plane: Option<String>,
    #[serde(rename = "Duration_plane_total", default)]
    duration_plane_total: Option<String>,
    #[serde(rename = "Plane_CO2_kg", default)]
    plane_co2_kg: Option<String>,
}

/// Cells that stand for "no value" in the optional plane columns
fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("n/a")
}

fn optional_duration(cell: Option<&str>) -> Result<Option<TravelDuration>> {
    match cell {
        Some(cell) if !is_missing(cell) => TravelDuration::parse(cell).map(Some),
        _ => Ok(None),
    }
}

fn optional_co2(cell: Option<&str>, route: &RouteKey) -> Result<Option<f64>> {
    match cell {
        Some(cell) if !is_missing(cell) => {
            let value: f64 = cell.trim().parse().map_err(|_| {
                PlannerError::data_integrity(format!(
                    "Invalid plane CO2 value '{cell}' for route {route}"
                ))
            })?;
            Ok(value.is_finite().then_some(value))
        }
        _ => Ok(None),
    }
}

impl TripRow {
    fn into_record(self) -> Result<TripRecord> {
        let route = RouteKey::new(&self.city_1, &self.city_2);

        if !self.train_co2_kg.is_finite() || self.train_co2_kg < 0.0 {
            return Err(PlannerError::data_integrity(format!(
                "Invalid train CO2 value {} for route {route}",
                self.train_co2_kg
            )));
        }

        Ok(TripRecord {
            train_duration: TravelDuration::parse(&self.duration_train)?,
            train_co2_kg: self.train_co2_kg,
            plane_duration: optional_duration(self.duration_plane.as_deref())?,
            plane_total_duration: optional_duration(self.duration_plane_total.as_deref())?,
            plane_co2_kg: optional_co2(self.plane_co2_kg.as_deref(), &route)?,
            city_a: self.city_1,
            city_b: self.city_2,
        })
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

/// Parse the trips table
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<TripRecord>> {
    let mut trips = Vec::new();
    for row in csv_reader(reader).deserialize::<TripRow>() {
        trips.push(row?.into_record()?);
    }
    Ok(trips)
}

/// Parse the city coordinates table
pub fn parse_cities<R: Read>(reader: R) -> Result<Vec<CityCoordinate>> {
    let mut cities = Vec::new();
    for row in csv_reader(reader).deserialize::<CityCoordinate>() {
        let city = row?;
        if !city.longitude.is_finite() || !city.latitude.is_finite() {
            return Err(PlannerError::data_integrity(format!(
                "City '{}' has non-finite coordinates",
                city.name
            )));
        }
        cities.push(city);
    }
    Ok(cities)
}

/// The trip and coordinate lookup tables
#[derive(Debug, Clone)]
pub struct TravelData {
    cities: Vec<CityCoordinate>,
    city_index: HashMap<String, usize>,
    trips: HashMap<RouteKey, TripRecord>,
}

impl TravelData {
    /// Build the repository, checking referential integrity.
    ///
    /// Fails on duplicate city names, duplicate route keys and trip records
    /// referencing a city without coordinates.
    pub fn from_parts(cities: Vec<CityCoordinate>, trips: Vec<TripRecord>) -> Result<Self> {
        let mut city_index = HashMap::with_capacity(cities.len());
        for (idx, city) in cities.iter().enumerate() {
            if city_index.insert(city.name.clone(), idx).is_some() {
                return Err(PlannerError::data_integrity(format!(
                    "City '{}' appears more than once in the coordinates data",
                    city.name
                )));
            }
        }

        let mut by_route = HashMap::with_capacity(trips.len());
        for trip in trips {
            for city in [&trip.city_a, &trip.city_b] {
                if !city_index.contains_key(city) {
                    return Err(PlannerError::data_integrity(format!(
                        "City '{city}' is referenced in trip data but has no coordinates"
                    )));
                }
            }

            let key = trip.route_key();
            if by_route.contains_key(&key) {
                return Err(PlannerError::data_integrity(format!(
                    "Route {key} appears more than once in the trip data"
                )));
            }
            by_route.insert(key, trip);
        }

        debug!(
            "Indexed {} cities and {} routes",
            cities.len(),
            by_route.len()
        );

        Ok(Self {
            cities,
            city_index,
            trips: by_route,
        })
    }

    /// Parse both tables from readers
    pub fn from_readers<T: Read, C: Read>(trips: T, coordinates: C) -> Result<Self> {
        let cities = parse_cities(coordinates)?;
        let trips = parse_trips(trips)?;
        Self::from_parts(cities, trips)
    }

    /// Load both tables from CSV files
    #[instrument]
    pub fn load(trips_path: &Path, coordinates_path: &Path) -> Result<Self> {
        info!("Loading travel data");

        let data = Self::from_readers(File::open(trips_path)?, File::open(coordinates_path)?)?;

        info!(
            "Loaded {} cities and {} routes",
            data.cities.len(),
            data.trips.len()
        );
        Ok(data)
    }

    /// All selectable cities in dataset order
    #[must_use]
    pub fn cities(&self) -> &[CityCoordinate] {
        &self.cities
    }

    #[must_use]
    pub fn city(&self, name: &str) -> Option<&CityCoordinate> {
        self.city_index.get(name).map(|&idx| &self.cities[idx])
    }

    /// Like [`TravelData::city`], but an unknown name is an invalid query
    pub fn require_city(&self, name: &str) -> Result<&CityCoordinate> {
        self.city(name)
            .ok_or_else(|| PlannerError::invalid_query(format!("Unknown city '{name}'")))
    }

    #[must_use]
    pub fn trip(&self, key: &RouteKey) -> Option<&TripRecord> {
        self.trips.get(key)
    }

    #[must_use]
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}
