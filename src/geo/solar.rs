//! Solar position calculations for sunrise/sunset times.
//!
//! This module implements the first-order solar position model (mean longitude, mean
//! anomaly, equation of center, declination, and equation of time) and turns it into
//! sunrise and sunset instants for a date and location. Polar day and polar night are
//! detected from the hour-angle cosine and reported as valid results, not errors.
//!
//! Times are expressed at the location's mean solar offset (longitude / 15 hours).
//! Longitude stands in for the civil timezone; the timezone label of a
//! [`Location`] is never consulted.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta};
use serde::Serialize;

use crate::constants::*;
use crate::error::{CalculationError, CalculationResult};
use crate::geo::location::{Location, validate_coordinates};

/// Sunrise, sunset, and the day/night split for one (date, location) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunCalculation {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    #[serde(serialize_with = "crate::utils::serialize_delta_seconds")]
    pub day_length: TimeDelta,
    #[serde(serialize_with = "crate::utils::serialize_delta_seconds")]
    pub night_length: TimeDelta,
}

impl SunCalculation {
    /// Sun never rises on this date.
    pub fn is_polar_night(&self) -> bool {
        self.day_length.is_zero()
    }

    /// Sun never sets on this date.
    pub fn is_polar_day(&self) -> bool {
        self.night_length.is_zero()
    }
}

/// Intermediate solar position for a Julian day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Declination in radians
    pub declination: f64,
    /// Equation of time in minutes
    pub equation_of_time: f64,
}

/// Julian day number of a Gregorian calendar date (integer formula).
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use planetr::geo::solar::julian_day_number;
///
/// let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
/// assert_eq!(julian_day_number(epoch), 2451545);
/// ```
pub fn julian_day_number(date: NaiveDate) -> i64 {
    let year = date.year() as i64;
    let month = date.month() as i64;
    let day = date.day() as i64;

    let a = (14 - month).div_euclid(12);
    let y = year - a;
    let m = month + 12 * a - 3;

    day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + JULIAN_DAY_OFFSET
}

/// Declination and equation of time for a Julian day.
pub fn sun_position(julian_day: f64) -> SunPosition {
    let n = julian_day - J2000_JULIAN_DAY;
    let mean_longitude = (MEAN_LONGITUDE_AT_EPOCH + MEAN_LONGITUDE_RATE * n) % 360.0;
    let mean_anomaly = ((MEAN_ANOMALY_AT_EPOCH + MEAN_ANOMALY_RATE * n) % 360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + EQUATION_OF_CENTER_1 * mean_anomaly.sin()
        + EQUATION_OF_CENTER_2 * (2.0 * mean_anomaly).sin())
    .to_radians();

    let obliquity = OBLIQUITY_OF_ECLIPTIC.to_radians();
    let declination = (obliquity.sin() * ecliptic_longitude.sin()).asin();

    // atan2(tan λ, cos ε) only recovers right ascension modulo 180°
    let right_ascension = ecliptic_longitude
        .tan()
        .atan2(obliquity.cos())
        .to_degrees();
    let mut difference = mean_longitude - right_ascension;
    difference -= 180.0 * (difference / 180.0).round();

    SunPosition {
        declination,
        equation_of_time: MINUTES_PER_DEGREE * difference,
    }
}

/// Compute sunrise, sunset, and day/night lengths for a date and location.
///
/// # Arguments
/// * `date` - Calendar date the planetary day is anchored to
/// * `location` - Validated location
///
/// # Returns
/// * `Ok(SunCalculation)` - Also for polar day and polar night
/// * `Err(CalculationError)` - Invalid coordinates, non-finite intermediate values,
///   or instants outside the representable range
pub fn compute_sun_times(date: NaiveDate, location: &Location) -> CalculationResult<SunCalculation> {
    let latitude = location.latitude();
    let longitude = location.longitude();
    validate_coordinates(latitude, longitude)?;

    let position = sun_position(julian_day_number(date) as f64);
    ensure_finite(position.declination, "declination")?;
    ensure_finite(position.equation_of_time, "equation of time")?;

    let cos_hour_angle = -latitude.to_radians().tan() * position.declination.tan();
    ensure_finite(cos_hour_angle, "hour angle")?;

    let offset = location.mean_solar_offset();
    let local_midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(offset).single())
        .ok_or(CalculationError::TimestampOutOfRange {
            what: "local midnight",
            date,
        })?;
    let full_day = TimeDelta::seconds(SECONDS_PER_DAY);

    let (sunrise, sunset) = if cos_hour_angle > 1.0 {
        // Polar night - sun never rises
        (local_midnight, local_midnight)
    } else if cos_hour_angle < -1.0 {
        // Polar day - sun never sets
        let next_midnight = local_midnight.checked_add_signed(full_day).ok_or(
            CalculationError::TimestampOutOfRange {
                what: "next local midnight",
                date,
            },
        )?;
        (local_midnight, next_midnight)
    } else {
        let hour_angle = cos_hour_angle.acos().to_degrees();
        let solar_noon =
            12.0 - position.equation_of_time / 60.0 - longitude / DEGREES_PER_HOUR;
        let sunrise_hours = solar_noon - hour_angle / DEGREES_PER_HOUR;
        let sunset_hours = solar_noon + hour_angle / DEGREES_PER_HOUR;

        (
            instant_from_hours(date, sunrise_hours, offset, "sunrise")?,
            instant_from_hours(date, sunset_hours, offset, "sunset")?,
        )
    };

    // The whole planetary day must stay representable for the partition.
    sunrise
        .checked_add_signed(full_day + full_day)
        .ok_or(CalculationError::TimestampOutOfRange {
            what: "planetary day",
            date,
        })?;

    let day_length = sunset - sunrise;
    Ok(SunCalculation {
        sunrise,
        sunset,
        day_length,
        night_length: full_day - day_length,
    })
}

/// Convert fractional hours after UTC midnight of `date` into an instant.
///
/// Truncated to the whole minute; negative or >24 values roll into the adjacent day.
fn instant_from_hours(
    date: NaiveDate,
    hours: f64,
    offset: FixedOffset,
    what: &'static str,
) -> CalculationResult<DateTime<FixedOffset>> {
    ensure_finite(hours, what)?;
    let minutes = (hours * 60.0).floor() as i64;

    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .and_then(|midnight| midnight.checked_add_signed(TimeDelta::try_minutes(minutes)?))
        .map(|instant| instant.with_timezone(&offset))
        .ok_or(CalculationError::TimestampOutOfRange { what, date })
}

fn ensure_finite(value: f64, quantity: &'static str) -> CalculationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalculationError::NonFiniteResult { quantity })
    }
}
