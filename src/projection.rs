//! Map projection framing
//!
//! Derives a mercator center and scale so that every given point is visible.
//! All tuning values come from [`ProjectionSettings`]; the defaults are visual
//! constants tuned for a map of Europe.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::GeoPoint;
use crate::Result;

/// Tunable constants of the projection calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Added to the mean longitude to compensate for the map's cropping
    pub longitude_offset: f64,
    /// Latitude spread above which a route counts as north-south
    pub north_south_lat_threshold: f64,
    /// Longitude spread below which a route counts as north-south
    pub north_south_lon_threshold: f64,
    pub fallback_center: [f64; 2],
    pub fallback_scale: f64,
    pub base_scale: f64,
    pub range_exponent: f64,
    pub scale_multiplier: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Rotation handed to the renderer together with center and scale
    pub rotation: [f64; 3],
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            longitude_offset: 2.0,
            north_south_lat_threshold: 7.0,
            north_south_lon_threshold: 10.0,
            fallback_center: [12.0, 50.0],
            fallback_scale: 700.0,
            base_scale: 300.0,
            range_exponent: 0.7,
            scale_multiplier: 25.0,
            min_scale: 400.0,
            max_scale: 4000.0,
            rotation: [5.0, 0.0, 0.0],
        }
    }
}

impl ProjectionSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(PlannerError::config(format!(
                "Projection scale bounds are invalid: min {} max {}",
                self.min_scale, self.max_scale
            )));
        }
        if self.fallback_scale <= 0.0 || self.base_scale <= 0.0 || self.range_exponent <= 0.0 {
            return Err(PlannerError::config(
                "Projection fallback scale, base scale and range exponent must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub scale: f64,
    pub rotate: [f64; 3],
}

struct Extent {
    min: f64,
    max: f64,
    sum: f64,
}

impl Extent {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Extent {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                sum: 0.0,
            },
            |acc, v| Extent {
                min: acc.min.min(v),
                max: acc.max.max(v),
                sum: acc.sum + v,
            },
        )
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Compute center and scale for a non-empty set of points
pub fn compute_projection_params(
    points: &[GeoPoint],
    settings: &ProjectionSettings,
) -> Result<ProjectionParams> {
    if points.is_empty() {
        return Err(PlannerError::invalid_query(
            "At least one point is needed to frame the map",
        ));
    }
    if points.iter().any(|p| !p.lon.is_finite() || !p.lat.is_finite()) {
        return Err(PlannerError::invalid_query("Map points must have finite coordinates"));
    }

    let count = points.len() as f64;
    let lon = Extent::of(points.iter().map(|p| p.lon));
    let lat = Extent::of(points.iter().map(|p| p.lat));

    let center_lon = lon.sum / count + settings.longitude_offset;
    let center_lat = lat.sum / count;

    let lon_range = lon.range();
    let lat_range = lat.range();

    if lat_range > settings.north_south_lat_threshold
        && lon_range < settings.north_south_lon_threshold
    {
        return Ok(ProjectionParams {
            center: settings.fallback_center,
            scale: settings.fallback_scale,
            rotate: settings.rotation,
        });
    }

    let weighted_lat_range = lat_range * center_lat.to_radians().cos();
    let max_range = lon_range.max(weighted_lat_range);

    let scale = if max_range > 0.0 && max_range.is_finite() {
        let factor = settings.base_scale / max_range.powf(settings.range_exponent);
        (factor * settings.scale_multiplier).clamp(settings.min_scale, settings.max_scale)
    } else {
        settings.min_scale
    };

    Ok(ProjectionParams {
        center: [center_lon, center_lat],
        scale,
        rotate: settings.rotation,
    })
}
