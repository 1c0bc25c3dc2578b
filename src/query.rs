//! Point-in-time queries over a computed planetary day.
//!
//! Every query takes the instant as a parameter; nothing here reads the clock.
//! Hours are half-open, so an instant exactly on a boundary belongs to the hour
//! that starts there.

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::error::CalculationResult;
use crate::geo::location::Location;
use crate::hours::{PlanetaryHour, PlanetaryHoursCalculation, calculate_planetary_hours};
use crate::logger::Log;

impl PlanetaryHoursCalculation {
    /// All 24 hours, day hours first, in chronological order.
    pub fn all_hours(&self) -> impl Iterator<Item = &PlanetaryHour> {
        self.day_hours.iter().chain(self.night_hours.iter())
    }

    /// The hour containing `instant`, or `None` outside sunrise..next sunrise.
    pub fn current_hour_at(&self, instant: DateTime<FixedOffset>) -> Option<PlanetaryHour> {
        self.all_hours().find(|hour| hour.contains(instant)).copied()
    }

    /// The first hour starting strictly after `instant`.
    pub fn next_hour_at(&self, instant: DateTime<FixedOffset>) -> Option<PlanetaryHour> {
        self.all_hours().find(|hour| hour.start > instant).copied()
    }

    /// Whether `instant` falls between sunrise (inclusive) and sunset (exclusive).
    pub fn is_daytime_at(&self, instant: DateTime<FixedOffset>) -> bool {
        self.sun_data.sunrise <= instant && instant < self.sun_data.sunset
    }

    /// Start of the modeled window (sunrise).
    pub fn window_start(&self) -> DateTime<FixedOffset> {
        self.day_hours[0].start
    }

    /// End of the modeled window (the following sunrise).
    pub fn window_end(&self) -> DateTime<FixedOffset> {
        self.night_hours[self.night_hours.len() - 1].end
    }
}

/// Time left in `hour` at `instant`, never negative.
pub fn time_remaining(hour: &PlanetaryHour, instant: DateTime<FixedOffset>) -> TimeDelta {
    (hour.end - instant).max(TimeDelta::zero())
}

/// Compute the planetary day that contains `instant`.
///
/// The instant's local date is tried first. Before sunrise the instant belongs to
/// the previous date's night, so that date is tried next, then the following date.
/// The returned calculation carries the current-hour snapshot for `instant`.
///
/// If no candidate contains the instant, the local date's calculation is returned
/// with no current hour. Between ordinary days the gap is at most a minute or so.
/// After polar night it can last hours: the last dark day's window ends at local
/// midnight, and the next one only opens at that date's first sunrise.
pub fn resolve_planetary_day(
    location: &Location,
    instant: DateTime<FixedOffset>,
) -> CalculationResult<PlanetaryHoursCalculation> {
    let local_date = instant
        .with_timezone(&location.mean_solar_offset())
        .date_naive();

    let candidates = [
        Some(local_date),
        local_date.pred_opt(),
        local_date.succ_opt(),
    ];

    let mut fallback = None;
    for date in candidates.into_iter().flatten() {
        let calculation = calculate_planetary_hours(date, location, Some(instant))?;
        if calculation.current_hour.is_some() {
            Log::log_debug(&format!(
                "Instant {} falls in the planetary day of {}",
                instant.to_rfc3339(),
                date
            ));
            return Ok(calculation);
        }
        if fallback.is_none() {
            fallback = Some(calculation);
        }
    }

    match fallback {
        Some(calculation) => {
            Log::log_debug(&format!(
                "No planetary day contains {}, using {}",
                instant.to_rfc3339(),
                calculation.date
            ));
            Ok(calculation)
        }
        // local_date itself is always a candidate
        None => calculate_planetary_hours(local_date, location, Some(instant)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use chrono::NaiveDate;

    fn new_york() -> Location {
        Location::new(TEST_NYC_LATITUDE, TEST_NYC_LONGITUDE, "New York", "America/New_York")
            .unwrap()
    }

    fn sample_day() -> PlanetaryHoursCalculation {
        let date = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
        calculate_planetary_hours(date, &new_york(), None).unwrap()
    }

    #[test]
    fn test_all_hours_yields_24_in_order() {
        let calc = sample_day();
        let hours: Vec<&PlanetaryHour> = calc.all_hours().collect();
        assert_eq!(hours.len(), 24);
        assert!(hours[..12].iter().all(|h| h.is_day_hour));
        assert!(hours[12..].iter().all(|h| !h.is_day_hour));
        for pair in hours.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn test_current_hour_at_boundaries() {
        let calc = sample_day();

        // Exactly at sunrise: first day hour
        let first = calc.current_hour_at(calc.sun_data.sunrise).unwrap();
        assert_eq!(first, calc.day_hours[0]);

        // Exactly at a shared boundary: the later hour
        let boundary = calc.day_hours[3].end;
        assert_eq!(calc.current_hour_at(boundary), Some(calc.day_hours[4]));

        // Exactly at sunset: first night hour
        assert_eq!(
            calc.current_hour_at(calc.sun_data.sunset),
            Some(calc.night_hours[0])
        );
    }

    #[test]
    fn test_current_hour_outside_window() {
        let calc = sample_day();
        let before = calc.window_start() - TimeDelta::seconds(1);
        assert_eq!(calc.current_hour_at(before), None);
        assert_eq!(calc.current_hour_at(calc.window_end()), None);
        assert_eq!(
            calc.current_hour_at(calc.window_end() + TimeDelta::hours(3)),
            None
        );
    }

    #[test]
    fn test_next_hour_at() {
        let calc = sample_day();

        let before = calc.window_start() - TimeDelta::minutes(30);
        assert_eq!(calc.next_hour_at(before), Some(calc.day_hours[0]));

        let inside = calc.day_hours[11].start + TimeDelta::minutes(1);
        assert_eq!(calc.next_hour_at(inside), Some(calc.night_hours[0]));

        // A start equal to the instant is not "next"
        assert_eq!(
            calc.next_hour_at(calc.night_hours[2].start),
            Some(calc.night_hours[3])
        );

        let last = calc.night_hours[11].start;
        assert_eq!(calc.next_hour_at(last), None);
    }

    #[test]
    fn test_time_remaining_is_clamped() {
        let calc = sample_day();
        let hour = calc.day_hours[2];
        assert_eq!(time_remaining(&hour, hour.start), hour.duration());
        assert_eq!(
            time_remaining(&hour, hour.end - TimeDelta::minutes(5)),
            TimeDelta::minutes(5)
        );
        assert_eq!(
            time_remaining(&hour, hour.end + TimeDelta::hours(1)),
            TimeDelta::zero()
        );
    }

    #[test]
    fn test_is_daytime_at() {
        let calc = sample_day();
        assert!(calc.is_daytime_at(calc.sun_data.sunrise));
        assert!(calc.is_daytime_at(calc.day_hours[6].start));
        assert!(!calc.is_daytime_at(calc.sun_data.sunset));
        assert!(!calc.is_daytime_at(calc.night_hours[5].start));
    }

    #[test]
    fn test_resolve_planetary_day_midday() {
        let location = new_york();
        let calc = sample_day();
        let instant = calc.day_hours[6].start + TimeDelta::minutes(2);

        let resolved = resolve_planetary_day(&location, instant).unwrap();
        assert_eq!(resolved.date, calc.date);
        assert_eq!(resolved.current_hour, Some(calc.day_hours[6]));
    }

    #[test]
    fn test_resolve_planetary_day_before_sunrise_uses_previous_date() {
        let location = new_york();
        let calc = sample_day();
        let instant = calc.sun_data.sunrise - TimeDelta::minutes(20);

        let resolved = resolve_planetary_day(&location, instant).unwrap();
        assert_eq!(resolved.date, calc.date.pred_opt().unwrap());
        let current = resolved.current_hour.unwrap();
        assert!(!current.is_day_hour);
        assert_eq!(current.hour_number, 12);
        // Tuesday's ruler is Mars
        assert_eq!(resolved.ruling_planet.id, "mars");
    }

    #[test]
    fn test_resolve_planetary_day_polar_night() {
        let location = Location::new(TEST_SVALBARD_LATITUDE, TEST_SVALBARD_LONGITUDE, "Svalbard", "Arctic/Longyearbyen")
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let calc = calculate_planetary_hours(date, &location, None).unwrap();
        let noon = calc.sun_data.sunrise + TimeDelta::hours(12);

        let resolved = resolve_planetary_day(&location, noon).unwrap();
        assert_eq!(resolved.date, date);
        let current = resolved.current_hour.unwrap();
        assert!(!current.is_day_hour);
        assert_eq!(current.hour_number, 7);
    }

    #[test]
    fn test_resolve_planetary_day_gap_after_polar_night() {
        let location = Location::new(
            TEST_SVALBARD_LATITUDE,
            TEST_SVALBARD_LONGITUDE,
            "Longyearbyen",
            "Arctic/Longyearbyen",
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 18).unwrap();
        let instant = DateTime::parse_from_rfc3339("2024-02-18T08:05:00+01:00").unwrap();

        let calc = resolve_planetary_day(&location, instant).unwrap();
        assert_eq!(calc.date, date);
        assert!(calc.current_hour.is_none());
        assert!(instant < calc.window_start());

        let previous = calculate_planetary_hours(date.pred_opt().unwrap(), &location, None).unwrap();
        assert!(previous.sun_data.is_polar_night());
        assert!(previous.window_end() <= instant);
    }
}
