//! Partitioning of a solar day into 24 planetary hours.
//!
//! The daylight span (sunrise to sunset) and the night span (sunset to the next
//! sunrise) are each split into 12 equal hours. Rulership walks the planet catalog
//! one step per hour starting at the day's ruler and continues unbroken from the
//! last day hour into the first night hour.
//!
//! ## Boundaries
//!
//! Hour `k` of a half starts at `origin + length * k / 12` and ends where hour `k + 1`
//! starts, so adjacent hours share an exact boundary and the twelfth hour ends
//! exactly at `origin + length`. A half with zero length (polar day or night) still
//! produces 12 hours whose start equals their end.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta};
use serde::Serialize;

use crate::constants::HOURS_PER_HALF;
use crate::error::CalculationResult;
use crate::geo::location::Location;
use crate::geo::solar::{SunCalculation, compute_sun_times};
use crate::planets::{Planet, day_ruler_index, planet_by_index};

/// One planetary hour: a half-open interval `[start, end)` ruled by a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanetaryHour {
    pub planet: &'static Planet,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// 1..=12 within its half
    pub hour_number: u8,
    pub is_day_hour: bool,
}

impl PlanetaryHour {
    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn half_name(&self) -> &'static str {
        if self.is_day_hour { "Day" } else { "Night" }
    }
}

/// Complete planetary hour result for one date and location.
///
/// Recomputed wholesale whenever the date or location changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetaryHoursCalculation {
    pub date: NaiveDate,
    pub location: Location,
    pub sun_data: SunCalculation,
    pub day_hours: [PlanetaryHour; HOURS_PER_HALF],
    pub night_hours: [PlanetaryHour; HOURS_PER_HALF],
    /// Snapshot of the hour containing the reference instant, if one was given
    pub current_hour: Option<PlanetaryHour>,
    pub ruling_planet: &'static Planet,
}

/// Split a solar day into 12 day hours and 12 night hours.
///
/// # Arguments
/// * `sun` - Sunrise/sunset and day/night lengths
/// * `ruling_index` - Rotation index of the day's ruling planet
///
/// # Returns
/// Tuple of (day_hours, night_hours) in chronological order
pub fn partition_hours(
    sun: &SunCalculation,
    ruling_index: usize,
) -> (
    [PlanetaryHour; HOURS_PER_HALF],
    [PlanetaryHour; HOURS_PER_HALF],
) {
    let day_hours = partition_half(sun.sunrise, sun.day_length, ruling_index, true);
    // Night hour 1 continues the rotation where a 13th day hour would have been
    let night_hours = partition_half(
        sun.sunset,
        sun.night_length,
        ruling_index + HOURS_PER_HALF,
        false,
    );
    (day_hours, night_hours)
}

fn partition_half(
    origin: DateTime<FixedOffset>,
    length: TimeDelta,
    first_index: usize,
    is_day_hour: bool,
) -> [PlanetaryHour; HOURS_PER_HALF] {
    let boundary = |k: usize| origin + length * (k as i32) / (HOURS_PER_HALF as i32);

    std::array::from_fn(|i| PlanetaryHour {
        planet: planet_by_index(first_index + i),
        start: boundary(i),
        end: boundary(i + 1),
        hour_number: (i + 1) as u8,
        is_day_hour,
    })
}

/// Compute the planetary hours for `date` at `location`.
///
/// The weekday of `date` picks the ruling planet. When `now` is given, the hour
/// containing it is stored as `current_hour`.
pub fn calculate_planetary_hours(
    date: NaiveDate,
    location: &Location,
    now: Option<DateTime<FixedOffset>>,
) -> CalculationResult<PlanetaryHoursCalculation> {
    let sun_data = compute_sun_times(date, location)?;
    let ruling_index = day_ruler_index(date.weekday());
    let (day_hours, night_hours) = partition_hours(&sun_data, ruling_index);

    let mut calculation = PlanetaryHoursCalculation {
        date,
        location: location.clone(),
        sun_data,
        day_hours,
        night_hours,
        current_hour: None,
        ruling_planet: planet_by_index(ruling_index),
    };
    calculation.current_hour = now.and_then(|instant| calculation.current_hour_at(instant));

    Ok(calculation)
}
