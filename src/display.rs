//! Terminal and JSON rendering of a computed planetary day.
//!
//! Row and card text is built by plain functions returning strings; the `render_*`
//! functions push those lines through [`Log`] so quiet mode silences everything.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::constants::QUALITIES_IN_TABLE;
use crate::hours::{PlanetaryHour, PlanetaryHoursCalculation};
use crate::logger::Log;
use crate::query::time_remaining;
use crate::utils::{TimeFormat, format_coordinates, format_duration, format_time};

/// User-facing presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub time_format: TimeFormat,
    pub show_qualities: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::default(),
            show_qualities: true,
        }
    }
}

/// One schedule table row.
pub fn format_hour_row(hour: &PlanetaryHour, options: DisplayOptions, is_current: bool) -> String {
    let marker = if is_current { "►" } else { " " };
    let mut row = format!(
        "{} {:>2}  {} {:<8} {} - {}",
        marker,
        hour.hour_number,
        hour.planet.symbol,
        hour.planet.name,
        format_time(hour.start, options.time_format),
        format_time(hour.end, options.time_format),
    );
    if options.show_qualities {
        let qualities: Vec<&str> = hour
            .planet
            .qualities
            .iter()
            .take(QUALITIES_IN_TABLE)
            .copied()
            .collect();
        row.push_str("  ");
        row.push_str(&qualities.join(", "));
    }
    row
}

/// Whole minutes left in `hour`, as shown on the current-hour card.
pub fn minutes_remaining(hour: &PlanetaryHour, instant: DateTime<FixedOffset>) -> i64 {
    time_remaining(hour, instant).num_minutes()
}

/// Lines of the current-hour card.
pub fn current_hour_lines(
    calculation: &PlanetaryHoursCalculation,
    hour: &PlanetaryHour,
    instant: DateTime<FixedOffset>,
    options: DisplayOptions,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} {} Hour #{}",
            hour.planet,
            hour.half_name(),
            hour.hour_number
        ),
        format!(
            "Start: {}  End: {}  Remaining: {} minutes",
            format_time(hour.start, options.time_format),
            format_time(hour.end, options.time_format),
            minutes_remaining(hour, instant)
        ),
        hour.planet.description.to_string(),
    ];
    if options.show_qualities {
        lines.push(format!(
            "Qualities: {} (element: {})",
            hour.planet.qualities.join(", "),
            hour.planet.element
        ));
    }
    if let Some(next) = calculation.next_hour_at(instant) {
        lines.push(format!(
            "Next: {} at {}",
            next.planet,
            format_time(next.start, options.time_format)
        ));
    }
    lines
}

/// Log the location, date and sun summary.
pub fn render_summary(calculation: &PlanetaryHoursCalculation, options: DisplayOptions) {
    let location = &calculation.location;
    let sun = &calculation.sun_data;

    Log::log_block_start(&format!(
        "{} ({}) on {}",
        location.name(),
        format_coordinates(location.latitude(), location.longitude()),
        calculation.date.format("%A, %B %-d, %Y")
    ));
    Log::log_indented(&format!(
        "Day ruler: {}",
        calculation.ruling_planet
    ));
    Log::log_indented(&format!(
        "Sunrise: {}  Sunset: {}",
        format_time(sun.sunrise, options.time_format),
        format_time(sun.sunset, options.time_format)
    ));
    Log::log_indented(&format!(
        "Day length: {}  Night length: {}",
        format_duration(sun.day_length),
        format_duration(sun.night_length)
    ));
    if sun.is_polar_night() {
        Log::log_indented("Polar night: the sun does not rise");
    } else if sun.is_polar_day() {
        Log::log_indented("Polar day: the sun does not set");
    }
    Log::log_indented(&format!(
        "Times are local mean solar time (UTC{}); timezone {} is shown for reference",
        sun.sunrise.offset(),
        location.timezone()
    ));
}

/// Log the current hour card, or a note when `instant` is outside the day.
pub fn render_current_hour(
    calculation: &PlanetaryHoursCalculation,
    instant: DateTime<FixedOffset>,
    options: DisplayOptions,
) {
    match calculation.current_hour_at(instant) {
        Some(hour) => {
            let lines = current_hour_lines(calculation, &hour, instant, options);
            if let Some((title, rest)) = lines.split_first() {
                Log::log_block_start(&format!("Current planetary hour: {}", title));
                for line in rest {
                    Log::log_indented(line);
                }
            }
        }
        None => {
            Log::log_block_start(&format!(
                "{} is outside this planetary day",
                format_time(instant, options.time_format)
            ));
        }
    }
}

/// Log the day and night tables, marking the hour that contains `instant`.
pub fn render_schedule(
    calculation: &PlanetaryHoursCalculation,
    instant: Option<DateTime<FixedOffset>>,
    options: DisplayOptions,
) {
    let current = instant.and_then(|i| calculation.current_hour_at(i));
    let is_daytime = instant.is_some_and(|i| calculation.is_daytime_at(i));

    let halves = [
        ("Day hours", &calculation.day_hours, is_daytime),
        (
            "Night hours",
            &calculation.night_hours,
            current.is_some() && !is_daytime,
        ),
    ];

    for (title, hours, active) in halves {
        let title = if active {
            format!("{} (now)", title)
        } else {
            title.to_string()
        };
        Log::log_block_start(&title);
        for hour in hours.iter() {
            let is_current = current.as_ref() == Some(hour);
            Log::log_indented(&format_hour_row(hour, options, is_current));
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    calculation: &'a PlanetaryHoursCalculation,
    #[serde(skip_serializing_if = "Option::is_none")]
    instant: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_hour: Option<PlanetaryHour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minutes_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_daytime: Option<bool>,
}

/// Serialize a calculation, with the live fields filled in when `instant` is given.
pub fn to_json(
    calculation: &PlanetaryHoursCalculation,
    instant: Option<DateTime<FixedOffset>>,
) -> Result<String> {
    let report = JsonReport {
        calculation,
        instant,
        next_hour: instant.and_then(|i| calculation.next_hour_at(i)),
        minutes_remaining: instant.and_then(|i| {
            calculation
                .current_hour_at(i)
                .map(|hour| minutes_remaining(&hour, i))
        }),
        is_daytime: instant.map(|i| calculation.is_daytime_at(i)),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize planetary hours")
}
