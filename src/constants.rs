//! Application constants and default values for planetr.
//!
//! This module contains the astronomical constants used by the solar calculations,
//! the fixed sizes of the planetary-hour partition, configuration defaults, and
//! validation limits used throughout the application.

// ═══ Astronomical Constants ═══
// First-order solar position model (same constants as the almanac approximation)

pub const J2000_JULIAN_DAY: f64 = 2451545.0; // Julian day of epoch J2000.0
pub const JULIAN_DAY_OFFSET: i64 = 1721119; // Gregorian integer formula offset
pub const MEAN_LONGITUDE_AT_EPOCH: f64 = 280.460; // degrees
pub const MEAN_LONGITUDE_RATE: f64 = 0.9856474; // degrees per day
pub const MEAN_ANOMALY_AT_EPOCH: f64 = 357.528; // degrees
pub const MEAN_ANOMALY_RATE: f64 = 0.9856003; // degrees per day
pub const EQUATION_OF_CENTER_1: f64 = 1.915; // degrees, coefficient of sin(g)
pub const EQUATION_OF_CENTER_2: f64 = 0.020; // degrees, coefficient of sin(2g)
pub const OBLIQUITY_OF_ECLIPTIC: f64 = 23.439; // degrees
pub const DEGREES_PER_HOUR: f64 = 15.0; // Earth rotation
pub const MINUTES_PER_DEGREE: f64 = 4.0; // Equation of time scale

// ═══ Planetary Hour Partition ═══

pub const HOURS_PER_HALF: usize = 12; // 12 day hours and 12 night hours
pub const PLANET_COUNT: usize = 7; // Classical planets in the rotation
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

// ═══ Geographic Validation Limits ═══

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_CITY: &str = "New York";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_LATITUDE: f64 = 40.7128;
pub const DEFAULT_LONGITUDE: f64 = -74.0060;
pub const DEFAULT_TIME_FORMAT: &str = "12h";
pub const DEFAULT_SHOW_QUALITIES: bool = true;
pub const DEFAULT_WATCH_INTERVAL: u64 = 60; // seconds between watch refreshes

// Watch interval limits
pub const MINIMUM_WATCH_INTERVAL: u64 = 10; // seconds
pub const MAXIMUM_WATCH_INTERVAL: u64 = 3600; // seconds (1 hour)

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_SECS: u64 = 1; // How often the watch loop checks the running flag

// ═══ User Interface Constants ═══

pub const QUALITIES_IN_TABLE: usize = 2; // Quality tags shown per row in schedule tables

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
