//! Chart series for the duration and emissions bar charts
//!
//! This is the presentation boundary: an unavailable plane mode is drawn as a
//! zero-length bar here, while [`PlaneMetrics`] keeps the distinction.

use serde::{Deserialize, Serialize};

use crate::metrics::{PlaneMetrics, TripMetrics};

/// Label shown instead of a duration when no flight exists
pub const UNAVAILABLE_LABEL: &str = "N/A";

/// Gridline step (minutes) for a duration axis whose largest value is `max_minutes`
#[must_use]
pub fn tick_interval(max_minutes: u32) -> u32 {
    match max_minutes {
        0..=180 => 30,
        181..=360 => 60,
        361..=720 => 120,
        721..=1440 => 240,
        _ => 480,
    }
}

/// Ascending tick values `0, step, 2*step, ...` up to and including the first
/// value that reaches `max_minutes`. Always contains at least `0`.
#[must_use]
pub fn tick_values(max_minutes: u32) -> Vec<u32> {
    let step = tick_interval(max_minutes);
    let mut ticks = vec![0];
    let mut value = 0u32;
    while value < max_minutes {
        value = value.saturating_add(step);
        ticks.push(value);
    }
    ticks
}

/// Axis label in hours: whole hours as `"2"`, anything else as `"1.5"`
#[must_use]
pub fn tick_label(minutes: u32) -> String {
    if minutes % 60 == 0 {
        format!("{}", minutes / 60)
    } else {
        format!("{}.5", minutes / 60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Train,
    Plane,
}

impl TravelMode {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            TravelMode::Train => "🚂",
            TravelMode::Plane => "✈️",
        }
    }
}

/// One bar of the duration chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBar {
    pub mode: TravelMode,
    pub minutes: u32,
    pub label: String,
}

/// One bar of the emissions chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionBar {
    pub mode: TravelMode,
    pub co2_kg: f64,
    /// One decimal, e.g. `"14.6"`
    pub label: String,
}

/// The duration axis ticks with their hour labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationAxis {
    pub values: Vec<u32>,
    pub labels: Vec<String>,
}

impl DurationAxis {
    #[must_use]
    pub fn for_max(max_minutes: u32) -> Self {
        let values = tick_values(max_minutes);
        let labels = values.iter().copied().map(tick_label).collect();
        Self { values, labels }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCharts {
    pub durations: Vec<DurationBar>,
    pub emissions: Vec<EmissionBar>,
    pub duration_axis: DurationAxis,
}

impl ComparisonCharts {
    #[must_use]
    pub fn from_metrics(metrics: &TripMetrics) -> Self {
        let (plane_minutes, plane_label, plane_co2) = match &metrics.plane {
            PlaneMetrics::Available(plane) => {
                (plane.duration_minutes(), plane.duration_display(), plane.co2_kg)
            }
            PlaneMetrics::Unavailable => (0, UNAVAILABLE_LABEL.to_string(), 0.0),
        };

        let durations = vec![
            DurationBar {
                mode: TravelMode::Train,
                minutes: metrics.train.duration_minutes(),
                label: metrics.train.duration_display(),
            },
            DurationBar {
                mode: TravelMode::Plane,
                minutes: plane_minutes,
                label: plane_label,
            },
        ];

        let emissions = vec![
            EmissionBar {
                mode: TravelMode::Train,
                co2_kg: metrics.train.co2_kg,
                label: format!("{:.1}", metrics.train.co2_kg),
            },
            EmissionBar {
                mode: TravelMode::Plane,
                co2_kg: plane_co2,
                label: format!("{plane_co2:.1}"),
            },
        ];

        let max_minutes = durations.iter().map(|bar| bar.minutes).max().unwrap_or(0);

        Self {
            durations,
            emissions,
            duration_axis: DurationAxis::for_max(max_minutes),
        }
    }
}
