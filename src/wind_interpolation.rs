//! Wind interpolation between altitude ladder rungs
//!
//! Speeds and gusts interpolate linearly. Direction is a circular quantity, so
//! it interpolates along the shortest arc: between 350° and 10° the midpoint is
//! 0°, not 180°. Queries outside the ladder clamp to the nearest end rung.

use serde::{Deserialize, Serialize};

use crate::models::AltitudeSample;
use crate::units::SpeedUnit;

/// Wind at an arbitrary altitude, in the requested unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InterpolatedWind {
    pub wind_speed: f64,
    pub gust_speed: f64,
    /// Degrees in [0, 360)
    pub direction: f64,
}

impl InterpolatedWind {
    fn at_rung(sample: &AltitudeSample, unit: SpeedUnit) -> Self {
        Self {
            wind_speed: sample.wind_speed(unit),
            gust_speed: sample.gust_speed(unit),
            direction: sample.wind_direction,
        }
    }
}

/// Interpolate wind speed, gust and direction at `altitude_ft`.
///
/// An empty ladder yields a zeroed result.
#[must_use]
pub fn interpolate_at_altitude(
    ladder: &[AltitudeSample],
    altitude_ft: f64,
    unit: SpeedUnit,
) -> InterpolatedWind {
    let mut sorted = ladder.to_vec();
    sorted.sort_by(|a, b| a.altitude_ft.total_cmp(&b.altitude_ft));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return InterpolatedWind::default();
    };

    let (lower, upper) = sorted
        .windows(2)
        .find(|pair| altitude_ft >= pair[0].altitude_ft && altitude_ft <= pair[1].altitude_ft)
        .map_or((first, last), |pair| (&pair[0], &pair[1]));

    if altitude_ft <= lower.altitude_ft {
        return InterpolatedWind::at_rung(lower, unit);
    }
    if altitude_ft >= upper.altitude_ft {
        return InterpolatedWind::at_rung(upper, unit);
    }

    let factor = (altitude_ft - lower.altitude_ft) / (upper.altitude_ft - lower.altitude_ft);

    InterpolatedWind {
        wind_speed: lerp(lower.wind_speed(unit), upper.wind_speed(unit), factor),
        gust_speed: lerp(lower.gust_speed(unit), upper.gust_speed(unit), factor),
        direction: interpolate_direction(lower.wind_direction, upper.wind_direction, factor),
    }
}

fn lerp(lower: f64, upper: f64, factor: f64) -> f64 {
    lower + factor * (upper - lower)
}

/// Signed shortest angular difference `to - from`, in (-180, 180]
#[must_use]
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Interpolate between two headings along the shorter arc, result in [0, 360)
#[must_use]
pub fn interpolate_direction(lower: f64, upper: f64, factor: f64) -> f64 {
    let direction = lower + factor * shortest_angle_delta(lower, upper);
    let wrapped = direction.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
