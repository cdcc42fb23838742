//! Wind-by-altitude snapshot used for drone flight planning

use serde::{Deserialize, Serialize};

use crate::units::{self, SpeedUnit};

/// Wind at one rung of the altitude ladder, in every display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudeSample {
    pub altitude_ft: f64,
    pub wind_speed_mph: f64,
    pub gust_speed_mph: f64,
    pub wind_speed_kph: f64,
    pub gust_speed_kph: f64,
    pub wind_speed_kts: f64,
    pub gust_speed_kts: f64,
    /// Degrees in [0, 360)
    pub wind_direction: f64,
}

impl AltitudeSample {
    /// Build a sample from speeds in metres per second
    #[must_use]
    pub fn from_mps(altitude_ft: f64, wind_mps: f64, gust_mps: f64, wind_direction: f64) -> Self {
        Self {
            altitude_ft,
            wind_speed_mph: units::mps_to_mph(wind_mps),
            gust_speed_mph: units::mps_to_mph(gust_mps),
            wind_speed_kph: units::mps_to_kph(wind_mps),
            gust_speed_kph: units::mps_to_kph(gust_mps),
            wind_speed_kts: units::mps_to_kts(wind_mps),
            gust_speed_kts: units::mps_to_kts(gust_mps),
            wind_direction,
        }
    }

    #[must_use]
    pub fn wind_speed(&self, unit: SpeedUnit) -> f64 {
        match unit {
            SpeedUnit::Mph => self.wind_speed_mph,
            SpeedUnit::Kph => self.wind_speed_kph,
            SpeedUnit::Kts => self.wind_speed_kts,
        }
    }

    #[must_use]
    pub fn gust_speed(&self, unit: SpeedUnit) -> f64 {
        match unit {
            SpeedUnit::Mph => self.gust_speed_mph,
            SpeedUnit::Kph => self.gust_speed_kph,
            SpeedUnit::Kts => self.gust_speed_kts,
        }
    }
}

/// Flight conditions derived from the base provider's first forecast hour
///
/// UV and visibility serialize as `null` when the provider had no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneConditions {
    pub altitudes: Vec<AltitudeSample>,
    #[serde(rename = "uv_index_max")]
    pub uv_index_max: Option<f64>,
    #[serde(rename = "visibility_km")]
    pub visibility_km: Option<f64>,
    #[serde(rename = "visibility_mi")]
    pub visibility_mi: Option<f64>,
    pub source_name: String,
}

/// The fixed altitude ladder sampled by the base provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderRung {
    /// 10 m sensor height, displayed as 0 ft
    Surface,
    M50,
    M80,
    M100,
    M120,
    M150,
    M180,
}

impl LadderRung {
    pub const ALL: [LadderRung; 7] = [
        Self::Surface,
        Self::M50,
        Self::M80,
        Self::M100,
        Self::M120,
        Self::M150,
        Self::M180,
    ];

    #[must_use]
    pub fn meters(self) -> u32 {
        match self {
            Self::Surface => 10,
            Self::M50 => 50,
            Self::M80 => 80,
            Self::M100 => 100,
            Self::M120 => 120,
            Self::M150 => 150,
            Self::M180 => 180,
        }
    }

    /// Display altitude; the surface rung is shown at 0 ft rather than 10 m
    #[must_use]
    pub fn altitude_ft(self) -> f64 {
        match self {
            Self::Surface => 0.0,
            rung => units::m_to_ft(f64::from(rung.meters())),
        }
    }

    /// Rung whose measured direction stands in for this one.
    ///
    /// Direction is only sampled at 10/80/120/180 m; 50, 100 and 150 m borrow
    /// the next measured rung above them.
    #[must_use]
    pub fn direction_source(self) -> Self {
        match self {
            Self::M50 => Self::M80,
            Self::M100 => Self::M120,
            Self::M150 => Self::M180,
            rung => rung,
        }
    }
}
