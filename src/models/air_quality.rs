//! US AQI value, category and the daylight reduction

use serde::{Deserialize, Serialize};

/// Hour indices treated as "daytime" when reducing hourly AQI to one figure.
///
/// A fixed approximation; it is not tied to the location's sunrise/sunset.
pub const DAYLIGHT_HOURS: std::ops::RangeInclusive<usize> = 6..=19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitive,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
    #[default]
    Unknown,
}

impl AqiCategory {
    /// Step function with breakpoints at 50/100/150/200/300 (inclusive upper bounds)
    #[must_use]
    pub fn from_value(value: i32) -> Self {
        match value {
            i32::MIN..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitive,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Good => "Air quality is satisfactory.",
            Self::Moderate => "Air quality is acceptable.",
            Self::UnhealthyForSensitive => "May affect sensitive groups.",
            Self::Unhealthy => "May cause health effects.",
            Self::VeryUnhealthy => "Health alert: risk of serious effects.",
            Self::Hazardous => "Health warning of emergency conditions.",
            Self::Unknown => "Data unavailable.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityIndex {
    pub value: i32,
    pub category: AqiCategory,
}

impl AirQualityIndex {
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self {
            value,
            category: AqiCategory::from_value(value),
        }
    }
}

/// Reduce a day of hourly US AQI readings to a single index.
///
/// Takes the maximum over [`DAYLIGHT_HOURS`], ignoring gaps. When the whole
/// window is empty the first hour is used instead, and when that is missing
/// too there is no index.
#[must_use]
pub fn daylight_aqi(hourly: &[Option<f64>]) -> Option<AirQualityIndex> {
    let start = (*DAYLIGHT_HOURS.start()).min(hourly.len());
    let end = (*DAYLIGHT_HOURS.end() + 1).min(hourly.len());

    let peak = hourly[start..end]
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::max);

    peak.or_else(|| hourly.first().copied().flatten())
        .map(|value| AirQualityIndex::new(value.round() as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, AqiCategory::Good)]
    #[case(50, AqiCategory::Good)]
    #[case(51, AqiCategory::Moderate)]
    #[case(100, AqiCategory::Moderate)]
    #[case(101, AqiCategory::UnhealthyForSensitive)]
    #[case(150, AqiCategory::UnhealthyForSensitive)]
    #[case(151, AqiCategory::Unhealthy)]
    #[case(200, AqiCategory::Unhealthy)]
    #[case(201, AqiCategory::VeryUnhealthy)]
    #[case(300, AqiCategory::VeryUnhealthy)]
    #[case(301, AqiCategory::Hazardous)]
    #[case(500, AqiCategory::Hazardous)]
    fn test_category_breakpoints(#[case] value: i32, #[case] expected: AqiCategory) {
        assert_eq!(AqiCategory::from_value(value), expected);
    }

    #[test]
    fn test_daylight_max_ignores_missing_values() {
        let mut hourly = vec![None; 24];
        hourly[0] = Some(200.0);
        hourly[10] = Some(40.0);
        hourly[11] = Some(60.0);
        hourly[22] = Some(180.0);

        let aqi = daylight_aqi(&hourly).unwrap();
        assert_eq!(aqi.value, 60);
        assert_eq!(aqi.category, AqiCategory::Moderate);
    }

    #[test]
    fn test_daylight_window_edges_are_inclusive_of_19_only() {
        let mut hourly = vec![Some(10.0); 24];
        hourly[19] = Some(90.0);
        hourly[20] = Some(400.0);
        hourly[5] = Some(400.0);
        assert_eq!(daylight_aqi(&hourly).unwrap().value, 90);
    }

    #[test]
    fn test_falls_back_to_first_hour() {
        let mut hourly = vec![None; 24];
        hourly[0] = Some(35.0);
        let aqi = daylight_aqi(&hourly).unwrap();
        assert_eq!(aqi.value, 35);
        assert_eq!(aqi.category, AqiCategory::Good);
    }

    #[test]
    fn test_no_data_means_no_index() {
        assert_eq!(daylight_aqi(&[None; 24]), None);
        assert_eq!(daylight_aqi(&[]), None);
    }

    #[test]
    fn test_short_series_uses_available_daylight_hours() {
        let hourly = vec![Some(12.0), None, None, None, None, None, None, Some(77.0)];
        assert_eq!(daylight_aqi(&hourly).unwrap().value, 77);
    }

    #[test]
    fn test_category_serializes_to_display_name() {
        let json = serde_json::to_string(&AqiCategory::UnhealthyForSensitive).unwrap();
        assert_eq!(json, "\"Unhealthy for Sensitive Groups\"");
        assert_eq!(AqiCategory::Unknown.description(), "Data unavailable.");
    }
}
