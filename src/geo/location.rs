//! Geographic location values consumed by the solar calculations.
//!
//! A [`Location`] can only be built through [`Location::new`], which rejects
//! out-of-range or non-finite coordinates, so every value reaching the calculation
//! core is already validated.

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::constants::*;
use crate::error::{CalculationError, CalculationResult};

/// A named point on Earth with a display-only timezone label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    name: String,
    timezone: String,
}

impl Location {
    /// Create a location, rejecting NaN, infinite, or out-of-range coordinates.
    /// `timezone` is only a display label.
    pub fn new(
        latitude: f64,
        longitude: f64,
        name: impl Into<String>,
        timezone: impl Into<String>,
    ) -> CalculationResult<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            name: name.into(),
            timezone: timezone.into(),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Approximate local offset derived from longitude (15° per hour).
    ///
    /// This is mean solar time, not civil time: the timezone label is never consulted.
    pub fn mean_solar_offset(&self) -> FixedOffset {
        // |longitude| <= 180 keeps this within ±12h, always a valid offset
        let seconds = (self.longitude * (SECONDS_PER_DAY as f64 / 360.0)).round() as i32;
        FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
    }
}

/// Check a coordinate pair against the geographic limits.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> CalculationResult<()> {
    if !latitude.is_finite() || !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        return Err(CalculationError::InvalidLatitude(latitude));
    }
    if !longitude.is_finite() || !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        return Err(CalculationError::InvalidLongitude(longitude));
    }
    Ok(())
}

/// A built-in quick location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub key: &'static str,
    pub city: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: &'static str,
}

impl Preset {
    pub fn to_location(&self) -> CalculationResult<Location> {
        Location::new(self.latitude, self.longitude, self.city, self.timezone)
    }
}

pub const PRESETS: [Preset; 4] = [
    Preset {
        key: "new-york",
        city: "New York",
        latitude: 40.7128,
        longitude: -74.0060,
        timezone: "America/New_York",
    },
    Preset {
        key: "london",
        city: "London",
        latitude: 51.5074,
        longitude: -0.1278,
        timezone: "Europe/London",
    },
    Preset {
        key: "paris",
        city: "Paris",
        latitude: 48.8566,
        longitude: 2.3522,
        timezone: "Europe/Paris",
    },
    Preset {
        key: "tokyo",
        city: "Tokyo",
        latitude: 35.6762,
        longitude: 139.6503,
        timezone: "Asia/Tokyo",
    },
];

/// Look up a preset by key (`new-york`) or city name (`New York`), ignoring case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let wanted = name.trim().to_lowercase();
    PRESETS
        .iter()
        .find(|p| p.key == wanted || p.city.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_accepts_boundaries() {
        assert!(Location::new(90.0, 180.0, "Pole", "UTC").is_ok());
        assert!(Location::new(-90.0, -180.0, "Pole", "UTC").is_ok());
        assert!(Location::new(0.0, 0.0, "Null Island", "UTC").is_ok());
    }

    #[test]
    fn test_location_rejects_out_of_range() {
        assert_eq!(
            Location::new(91.0, 0.0, "x", "UTC"),
            Err(CalculationError::InvalidLatitude(91.0))
        );
        assert_eq!(
            Location::new(0.0, -180.5, "x", "UTC"),
            Err(CalculationError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn test_location_rejects_non_finite() {
        assert!(matches!(
            Location::new(f64::NAN, 0.0, "x", "UTC"),
            Err(CalculationError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Location::new(0.0, f64::INFINITY, "x", "UTC"),
            Err(CalculationError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_mean_solar_offset_from_longitude() {
        let greenwich = Location::new(51.4779, 0.0, "Greenwich", "Europe/London").unwrap();
        assert_eq!(greenwich.mean_solar_offset().local_minus_utc(), 0);

        let east = Location::new(0.0, 15.0, "x", "UTC").unwrap();
        assert_eq!(east.mean_solar_offset().local_minus_utc(), 3600);

        let west = Location::new(0.0, -74.0060, "x", "UTC").unwrap();
        // -74.006° * 240 s/° = -17761.44 s
        assert_eq!(west.mean_solar_offset().local_minus_utc(), -17761);

        let dateline = Location::new(0.0, 180.0, "x", "UTC").unwrap();
        assert_eq!(dateline.mean_solar_offset().local_minus_utc(), 12 * 3600);
    }

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("tokyo").map(|p| p.city), Some("Tokyo"));
        assert_eq!(find_preset("New York").map(|p| p.key), Some("new-york"));
        assert_eq!(find_preset(" LONDON ").map(|p| p.key), Some("london"));
        assert!(find_preset("atlantis").is_none());
    }

    #[test]
    fn test_presets_are_valid_locations() {
        for preset in PRESETS.iter() {
            let location = preset.to_location().unwrap();
            assert_eq!(location.name(), preset.city);
            assert_eq!(location.timezone(), preset.timezone);
        }
    }
}
