//! Location value object and favorites handling

use serde::{Deserialize, Serialize};

/// A named point on the map.
///
/// Two coordinates are the same place when their display names match
/// exactly. Latitude and longitude do not take part in equality, so a
/// favorite saved as "Denver, Colorado, United States" is recognised no matter
/// how precisely the position was geocoded.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Display label
    pub name: String,
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Coordinates {}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            name: name.into(),
        }
    }

    /// Label used for positions typed in as raw `lat,lon`
    #[must_use]
    pub fn from_raw_position(lat: f64, lon: f64) -> Self {
        Self::new(lat, lon, format!("Coordinates ({lat:.2}, {lon:.2})"))
    }
}

/// Result of toggling the current location in the favorites list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub favorites: Vec<Coordinates>,
    /// `true` when the location was added, `false` when it was removed
    pub added: bool,
}

/// Adds `current` to `favorites`, or removes every entry with its name.
#[must_use]
pub fn toggle_favorite(favorites: &[Coordinates], current: &Coordinates) -> FavoriteToggle {
    if favorites.contains(current) {
        FavoriteToggle {
            favorites: favorites.iter().filter(|f| *f != current).cloned().collect(),
            added: false,
        }
    } else {
        let mut favorites = favorites.to_vec();
        favorites.push(current.clone());
        FavoriteToggle {
            favorites,
            added: true,
        }
    }
}

#[must_use]
pub fn is_favorite(favorites: &[Coordinates], current: &Coordinates) -> bool {
    favorites.contains(current)
}
