//! Cross-check sunrise and sunset against the `sunrise` crate.
//!
//! The two models differ in refraction handling and minute truncation, so agreement is
//! expected within a few minutes at mid latitudes, not exactly.

use chrono::{NaiveDate, TimeDelta, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use planetr::{Location, compute_sun_times};

const TOLERANCE_MINUTES: i64 = 15;

const CITIES: [(&str, f64, f64); 6] = [
    ("New York", 40.7128, -74.0060),
    ("London", 51.5074, -0.1278),
    ("Tokyo", 35.6762, 139.6503),
    ("Sydney", -33.8688, 151.2093),
    ("Quito", -0.1807, -78.4678),
    ("Cape Town", -33.9249, 18.4241),
];

fn dates() -> Vec<NaiveDate> {
    [(2024, 1, 15), (2024, 3, 20), (2024, 6, 21), (2024, 9, 22), (2024, 12, 21)]
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

fn assert_close(city: &str, date: NaiveDate, what: &str, ours: TimeDelta, tolerance: i64) {
    assert!(
        ours.num_minutes().abs() <= tolerance,
        "{} on {}: {} differs from sunrise crate by {} minutes",
        city,
        date,
        what,
        ours.num_minutes()
    );
}

#[test]
fn test_sunrise_matches_reference() {
    for (city, lat, lon) in CITIES {
        let location = Location::new(lat, lon, city, "UTC").unwrap();
        let coord = Coordinates::new(lat, lon).unwrap();

        for date in dates() {
            let ours = compute_sun_times(date, &location).unwrap();
            let reference = SolarDay::new(coord, date).event_time(SolarEvent::Sunrise);

            assert_close(
                city,
                date,
                "sunrise",
                ours.sunrise.with_timezone(&Utc) - reference,
                TOLERANCE_MINUTES,
            );
        }
    }
}

#[test]
fn test_sunset_matches_reference() {
    for (city, lat, lon) in CITIES {
        let location = Location::new(lat, lon, city, "UTC").unwrap();
        let coord = Coordinates::new(lat, lon).unwrap();

        for date in dates() {
            let ours = compute_sun_times(date, &location).unwrap();
            let reference = SolarDay::new(coord, date).event_time(SolarEvent::Sunset);

            assert_close(
                city,
                date,
                "sunset",
                ours.sunset.with_timezone(&Utc) - reference,
                TOLERANCE_MINUTES,
            );
        }
    }
}

#[test]
fn test_day_length_tracks_reference() {
    let (city, lat, lon) = CITIES[1];
    let location = Location::new(lat, lon, city, "UTC").unwrap();
    let coord = Coordinates::new(lat, lon).unwrap();

    for date in dates() {
        let ours = compute_sun_times(date, &location).unwrap();
        let day = SolarDay::new(coord, date);
        let reference =
            day.event_time(SolarEvent::Sunset) - day.event_time(SolarEvent::Sunrise);

        // Refraction lengthens the reference day on both ends
        let difference = ours.day_length - reference;
        assert!(difference <= TimeDelta::zero());
        assert_close(city, date, "day length", difference, 2 * TOLERANCE_MINUTES);
    }
}
