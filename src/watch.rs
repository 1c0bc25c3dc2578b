//! Live mode: report each planetary hour as it begins.
//!
//! The loop reads the clock, resolves the planetary day containing it, and prints the
//! current-hour card whenever the hour changes. Between checks it sleeps in
//! [`CHECK_INTERVAL_SECS`] chunks so SIGINT/SIGTERM stop it promptly.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use crate::constants::*;
use crate::display::{DisplayOptions, render_current_hour, render_summary};
use crate::geo::location::Location;
use crate::hours::{PlanetaryHour, PlanetaryHoursCalculation};
use crate::logger::Log;
use crate::query::{resolve_planetary_day, time_remaining};
use crate::utils::format_time;

const CHECK_INTERVAL: Duration = Duration::from_secs(CHECK_INTERVAL_SECS);

/// Register SIGINT/SIGTERM and return the flag they clear.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to register signal handlers")?;
    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    Ok(running)
}

/// The current instant at the location's mean solar offset.
pub fn now_at(location: &Location) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&location.mean_solar_offset())
}

/// How long to sleep before the next check.
///
/// Wakes at the end of the current hour or after `interval`, whichever comes first,
/// and never sleeps less than one check interval.
pub fn next_check_delay(
    current: Option<&PlanetaryHour>,
    instant: DateTime<FixedOffset>,
    interval: Duration,
) -> Duration {
    let until_change = current
        .map(|hour| time_remaining(hour, instant))
        .and_then(|remaining| remaining.to_std().ok())
        .unwrap_or(interval);
    until_change.min(interval).max(CHECK_INTERVAL)
}

/// Whether the cached calculation still models `instant`.
pub fn needs_recompute(
    calculation: Option<&PlanetaryHoursCalculation>,
    instant: DateTime<FixedOffset>,
) -> bool {
    match calculation {
        Some(calc) => !(calc.window_start() <= instant && instant < calc.window_end()),
        None => true,
    }
}

/// Whether `next` covers a different planetary day than the one last shown.
pub fn is_new_day(
    previous: Option<&PlanetaryHoursCalculation>,
    next: &PlanetaryHoursCalculation,
) -> bool {
    previous.is_none_or(|calc| calc.date != next.date)
}

/// Run the watch loop until a shutdown signal arrives.
pub fn run_watch(
    location: &Location,
    options: DisplayOptions,
    interval_secs: u64,
    running: &AtomicBool,
) -> Result<()> {
    let interval = Duration::from_secs(interval_secs);
    let mut calculation: Option<PlanetaryHoursCalculation> = None;
    let mut last_reported: Option<PlanetaryHour> = None;

    Log::log_block_start(&format!(
        "Watching planetary hours (checking at least every {} seconds)",
        interval_secs
    ));

    while running.load(Ordering::SeqCst) {
        let now = now_at(location);

        if needs_recompute(calculation.as_ref(), now) {
            let calc = resolve_planetary_day(location, now)?;
            Log::log_debug(&format!("Recomputed planetary day for {}", calc.date));
            if is_new_day(calculation.as_ref(), &calc) {
                render_summary(&calc, options);
            }
            calculation = Some(calc);
        }

        let current = calculation
            .as_ref()
            .and_then(|calc| calc.current_hour_at(now));

        if current != last_reported {
            if let Some(calc) = calculation.as_ref() {
                render_current_hour(calc, now, options);
            }
            last_reported = current;
        }

        let delay = next_check_delay(current.as_ref(), now, interval);
        Log::log_debug(&format!(
            "Next check at {}",
            format_time(
                now + TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero()),
                options.time_format
            )
        ));

        let mut slept = Duration::from_secs(0);
        while slept < delay && running.load(Ordering::SeqCst) {
            let sleep_chunk = CHECK_INTERVAL.min(delay - slept);
            thread::sleep(sleep_chunk);
            slept += sleep_chunk;
        }
    }

    Log::log_block_start("Stopping watch");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::calculate_planetary_hours;
    use chrono::NaiveDate;
    use serial_test::serial;

    fn sample_day() -> PlanetaryHoursCalculation {
        let location = Location::new(40.7128, -74.0060, "New York", "America/New_York").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
        calculate_planetary_hours(date, &location, None).unwrap()
    }

    #[test]
    fn test_next_check_delay_wakes_at_hour_end() {
        let calc = sample_day();
        let hour = calc.day_hours[0];
        let instant = hour.end - TimeDelta::seconds(30);
        assert_eq!(
            next_check_delay(Some(&hour), instant, Duration::from_secs(60)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_next_check_delay_capped_by_interval() {
        let calc = sample_day();
        let hour = calc.day_hours[0];
        assert_eq!(
            next_check_delay(Some(&hour), hour.start, Duration::from_secs(60)),
            Duration::from_secs(60)
        );
        assert_eq!(
            next_check_delay(None, hour.start, Duration::from_secs(45)),
            Duration::from_secs(45)
        );
    }

    #[test]
    fn test_next_check_delay_minimum() {
        let calc = sample_day();
        let hour = calc.day_hours[0];
        assert_eq!(
            next_check_delay(Some(&hour), hour.end, Duration::from_secs(60)),
            CHECK_INTERVAL
        );
    }

    #[test]
    fn test_needs_recompute() {
        let calc = sample_day();
        assert!(needs_recompute(None, calc.window_start()));
        assert!(!needs_recompute(Some(&calc), calc.window_start()));
        assert!(!needs_recompute(
            Some(&calc),
            calc.window_end() - TimeDelta::seconds(1)
        ));
        assert!(needs_recompute(Some(&calc), calc.window_end()));
        assert!(needs_recompute(
            Some(&calc),
            calc.window_start() - TimeDelta::seconds(1)
        ));
    }

    #[test]
    fn test_gap_after_polar_night_is_not_a_new_day() {
        let location = Location::new(78.0, 15.0, "Longyearbyen", "Arctic/Longyearbyen").unwrap();
        let before_sunrise = DateTime::parse_from_rfc3339("2024-02-18T08:05:00+01:00").unwrap();

        let first = resolve_planetary_day(&location, before_sunrise).unwrap();
        assert!(first.current_hour.is_none());
        assert!(needs_recompute(Some(&first), before_sunrise));

        let later = before_sunrise + TimeDelta::minutes(1);
        let second = resolve_planetary_day(&location, later).unwrap();
        assert!(is_new_day(None, &first));
        assert!(!is_new_day(Some(&first), &second));

        let next_day = calculate_planetary_hours(first.date.succ_opt().unwrap(), &location, None)
            .unwrap();
        assert!(is_new_day(Some(&first), &next_day));
    }

    #[test]
    #[serial]
    fn test_run_watch_exits_when_not_running() {
        let location = Location::new(51.5074, -0.1278, "London", "Europe/London").unwrap();
        let running = AtomicBool::new(false);
        Log::set_enabled(false);
        let result = run_watch(&location, DisplayOptions::default(), 60, &running);
        Log::set_enabled(true);
        assert!(result.is_ok());
    }
}
