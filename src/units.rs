//! Scalar unit conversions and the unit enums used to select display values.
//!
//! Conversions are exact linear maps. Nothing here rounds; rounding is left to
//! whoever renders the number.

use serde::{Deserialize, Serialize};

pub const MPS_TO_MPH: f64 = 2.23694;
pub const MPS_TO_KPH: f64 = 3.6;
pub const MPS_TO_KTS: f64 = 1.94384;
pub const M_TO_FT: f64 = 3.28084;
pub const KM_TO_MI: f64 = 0.621371;

#[must_use]
pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

#[must_use]
pub fn mps_to_kph(mps: f64) -> f64 {
    mps * MPS_TO_KPH
}

#[must_use]
pub fn mps_to_kts(mps: f64) -> f64 {
    mps * MPS_TO_KTS
}

#[must_use]
pub fn c_to_f(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn m_to_ft(meters: f64) -> f64 {
    meters * M_TO_FT
}

#[must_use]
pub fn ft_to_m(feet: f64) -> f64 {
    feet / M_TO_FT
}

#[must_use]
pub fn km_to_mi(km: f64) -> f64 {
    km * KM_TO_MI
}

/// Wind speed display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Mph,
    Kph,
    Kts,
}

impl SpeedUnit {
    #[must_use]
    pub fn from_mps(self, mps: f64) -> f64 {
        match self {
            Self::Mph => mps_to_mph(mps),
            Self::Kph => mps_to_kph(mps),
            Self::Kts => mps_to_kts(mps),
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Mph => "mph",
            Self::Kph => "km/h",
            Self::Kts => "kts",
        }
    }
}

/// Temperature display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    C,
    #[default]
    F,
}

/// Clock format for rendered times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}
