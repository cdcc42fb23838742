//! Sun event times for photography planning
//!
//! Event instants come from the `sunrise` crate's `SolarDay`. When the sun
//! never reaches the target elevation on the requested day (polar day or
//! night) the event is `None`.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};
use tracing::debug;

use crate::units::TimeFormat;

/// Upper bound of the golden hour, degrees above the horizon
pub const GOLDEN_HOUR_ELEVATION: f64 = 6.0;

/// Placeholder rendered for an event that does not occur
pub const INVALID_TIME: &str = "--:--";

/// Sun events for one calendar day at one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SolarTimes {
    /// Civil dawn, sun 6° below the horizon
    pub dawn: Option<DateTime<Utc>>,
    pub sunrise: Option<DateTime<Utc>>,
    /// Morning golden hour ends
    pub golden_hour_end: Option<DateTime<Utc>>,
    /// Evening golden hour begins
    pub golden_hour: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub dusk: Option<DateTime<Utc>>,
}

/// Morning and evening windows rendered as `"<start> - <end>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub am: String,
    pub pm: String,
}

impl SolarTimes {
    /// Golden hour: sunrise until the sun clears 6°, and back down to sunset
    #[must_use]
    pub fn golden_hour_window(&self, tz: Tz, format: TimeFormat) -> HourWindow {
        HourWindow {
            am: format_range(self.sunrise, self.golden_hour_end, tz, format),
            pm: format_range(self.golden_hour, self.sunset, tz, format),
        }
    }

    /// Blue hour: civil dawn until sunrise, and sunset until civil dusk
    #[must_use]
    pub fn blue_hour_window(&self, tz: Tz, format: TimeFormat) -> HourWindow {
        HourWindow {
            am: format_range(self.dawn, self.sunrise, tz, format),
            pm: format_range(self.sunset, self.dusk, tz, format),
        }
    }
}

/// Compute the sun events for the calendar day `date` at `lat`/`lon`.
#[must_use]
pub fn solar_times(date: NaiveDate, lat: f64, lon: f64) -> SolarTimes {
    let Some(coordinates) = Coordinates::new(lat, lon) else {
        debug!("No sun events for invalid coordinates lat={}, lon={}", lat, lon);
        return SolarTimes::default();
    };
    let solar_day = SolarDay::new(coordinates, date);

    // The crate measures elevation events as depression below the horizon
    let golden = |morning| SolarEvent::Elevation {
        elevation: -GOLDEN_HOUR_ELEVATION.to_radians(),
        morning,
    };

    SolarTimes {
        dawn: solar_day.event_time(SolarEvent::Dawn(DawnType::Civil)),
        sunrise: solar_day.event_time(SolarEvent::Sunrise),
        golden_hour_end: solar_day.event_time(golden(true)),
        golden_hour: solar_day.event_time(golden(false)),
        sunset: solar_day.event_time(SolarEvent::Sunset),
        dusk: solar_day.event_time(SolarEvent::Dusk(DawnType::Civil)),
    }
}

#[must_use]
pub fn golden_hour_window(
    date: NaiveDate,
    lat: f64,
    lon: f64,
    tz: Tz,
    format: TimeFormat,
) -> HourWindow {
    solar_times(date, lat, lon).golden_hour_window(tz, format)
}

#[must_use]
pub fn blue_hour_window(
    date: NaiveDate,
    lat: f64,
    lon: f64,
    tz: Tz,
    format: TimeFormat,
) -> HourWindow {
    solar_times(date, lat, lon).blue_hour_window(tz, format)
}

/// Render an instant as wall-clock time in `tz`.
///
/// 12-hour times look like `6:05 AM`, 24-hour times like `06:05`.
#[must_use]
pub fn format_time(instant: Option<DateTime<Utc>>, tz: Tz, format: TimeFormat) -> String {
    let Some(instant) = instant else {
        return INVALID_TIME.to_string();
    };
    let local = instant.with_timezone(&tz);
    match format {
        TimeFormat::H12 => local.format("%-I:%M %p").to_string(),
        TimeFormat::H24 => local.format("%H:%M").to_string(),
    }
}

fn format_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    tz: Tz,
    format: TimeFormat,
) -> String {
    format!("{} - {}", format_time(start, tz, format), format_time(end, tz, format))
}
