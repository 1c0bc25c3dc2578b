//! Geographic locations and the solar calculations built on them.
//!
//! - [`location`]: validated coordinates, presets, mean-solar offsets
//! - [`solar`]: sunrise, sunset, and day/night lengths for a date

pub mod location;
pub mod solar;

pub use location::{Location, PRESETS, Preset, find_preset};
pub use solar::{SunCalculation, compute_sun_times};

use chrono::NaiveDate;

use crate::logger::Log;
use crate::utils::format_coordinates;

/// Log the intermediate solar quantities for a date and location.
///
/// Only produces output when debug logging is on.
pub fn log_solar_debug_info(location: &Location, date: NaiveDate) -> anyhow::Result<()> {
    if !Log::is_debug() {
        return Ok(());
    }

    let jdn = solar::julian_day_number(date);
    let position = solar::sun_position(jdn as f64);
    let sun = compute_sun_times(date, location)?;

    Log::log_pipe();
    Log::log_debug("Solar calculation details:");
    Log::log_indented(&format!(
        "       Coordinates: {}",
        format_coordinates(location.latitude(), location.longitude())
    ));
    Log::log_indented(&format!("  Julian day number: {}", jdn));
    Log::log_indented(&format!(
        "        Declination: {:.3}°",
        position.declination.to_degrees()
    ));
    Log::log_indented(&format!(
        "   Equation of time: {:+.2} minutes",
        position.equation_of_time
    ));
    Log::log_indented(&format!(
        "  Mean solar offset: UTC{}",
        location.mean_solar_offset()
    ));
    Log::log_indented(&format!(
        "        Sunrise UTC: {}",
        sun.sunrise.naive_utc().format("%Y-%m-%d %H:%M")
    ));
    Log::log_indented(&format!(
        "         Sunset UTC: {}",
        sun.sunset.naive_utc().format("%Y-%m-%d %H:%M")
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_log_solar_debug_info() {
        let location = Location::new(78.0, 15.0, "Longyearbyen", "Arctic/Longyearbyen").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();

        Log::set_enabled(false);
        Log::set_debug(true);
        let result = log_solar_debug_info(&location, date);
        Log::set_debug(false);
        Log::set_enabled(true);

        assert!(result.is_ok());
    }
}
