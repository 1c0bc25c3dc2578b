//! Utility functions shared across the codebase.
//!
//! Formatting helpers for times, durations and coordinates, plus the serde glue used
//! when the calculation results are written out as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};

/// Clock style used when printing instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12h",
            TimeFormat::TwentyFourHour => "24h",
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "12h" | "12" => Ok(TimeFormat::TwelveHour),
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            other => Err(format!(
                "Invalid time format '{}'. Expected \"12h\" or \"24h\"",
                other
            )),
        }
    }
}

/// Format an instant as a wall-clock time in its own offset.
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use planetr::utils::{TimeFormat, format_time};
/// let t = DateTime::parse_from_rfc3339("2024-06-19T17:05:00+00:00").unwrap();
/// assert_eq!(format_time(t, TimeFormat::TwelveHour), "05:05 PM");
/// assert_eq!(format_time(t, TimeFormat::TwentyFourHour), "17:05");
/// ```
pub fn format_time(instant: DateTime<FixedOffset>, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => instant.format("%I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => instant.format("%H:%M").to_string(),
    }
}

/// Format a duration as hours and whole minutes. Negative durations print as zero.
///
/// # Examples
/// ```
/// use chrono::TimeDelta;
/// use planetr::utils::format_duration;
/// assert_eq!(format_duration(TimeDelta::minutes(13 * 60 + 12)), "13h 12m");
/// assert_eq!(format_duration(TimeDelta::seconds(59)), "0h 0m");
/// ```
pub fn format_duration(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Format a coordinate pair with hemisphere letters.
///
/// # Examples
/// ```
/// use planetr::utils::format_coordinates;
/// assert_eq!(format_coordinates(40.7128, -74.0060), "40.7128°N, 74.0060°W");
/// ```
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let lat_dir = if latitude >= 0.0 { 'N' } else { 'S' };
    let lon_dir = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lon_dir
    )
}

/// Serialize a `TimeDelta` as whole seconds.
pub fn serialize_delta_seconds<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(delta.num_seconds())
}

/// Replace the home directory prefix of a path with `~` for display.
pub fn path_for_display(path: &std::path::Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_format_time_uses_instant_offset() {
        let t = at("2024-06-19T00:30:00-04:56");
        assert_eq!(format_time(t, TimeFormat::TwelveHour), "12:30 AM");
        assert_eq!(format_time(t, TimeFormat::TwentyFourHour), "00:30");

        let noon = at("2024-06-19T12:00:00+09:00");
        assert_eq!(format_time(noon, TimeFormat::TwelveHour), "12:00 PM");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::hours(24)), "24h 0m");
        assert_eq!(format_duration(TimeDelta::minutes(75)), "1h 15m");
        assert_eq!(format_duration(TimeDelta::zero()), "0h 0m");
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "0h 0m");
    }

    #[test]
    fn test_format_coordinates_hemispheres() {
        assert_eq!(format_coordinates(-33.8688, 151.2093), "33.8688°S, 151.2093°E");
        assert_eq!(format_coordinates(0.0, 0.0), "0.0000°N, 0.0000°E");
    }

    #[test]
    fn test_time_format_parsing() {
        assert_eq!("12h".parse::<TimeFormat>(), Ok(TimeFormat::TwelveHour));
        assert_eq!(" 24H ".parse::<TimeFormat>(), Ok(TimeFormat::TwentyFourHour));
        assert!("36h".parse::<TimeFormat>().is_err());
        assert_eq!(TimeFormat::default().to_string(), "12h");
    }

    #[test]
    fn test_serialize_delta_seconds() {
        #[derive(Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_delta_seconds")]
            length: TimeDelta,
        }
        let json = serde_json::to_string(&Wrapper {
            length: TimeDelta::minutes(90),
        })
        .unwrap();
        assert_eq!(json, r#"{"length":5400}"#);
    }

    #[test]
    fn test_path_for_display_outside_home() {
        let path = std::path::Path::new("/etc/planetr/planetr.toml");
        assert_eq!(path_for_display(path), "/etc/planetr/planetr.toml");
    }
}
