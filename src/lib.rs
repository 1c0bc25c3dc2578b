//! # Planetr
//!
//! Planetary hours for any date and location.
//!
//! The daylight and night of a date are each split into twelve equal "hours", and
//! each hour is assigned one of the seven classical planets by rotating through a
//! fixed order, starting from the planet that rules the weekday.
//!
//! ## Architecture
//!
//! - **geo**: Validated locations and sunrise/sunset calculations
//! - **planets**: The planet catalog and weekday rulers
//! - **hours**: Partitioning a solar day into 24 planetary hours
//! - **query**: Current/next hour lookups for an instant
//! - **config**: Configuration loading, validation, and default generation
//! - **display**: Terminal and JSON rendering
//! - **watch**: Live mode with signal handling
//! - **args**: Command-line parsing
//! - **logger**: Structured logging with visual formatting
//!
//! The calculation core (`geo`, `planets`, `hours`, `query`) never reads the clock
//! and reports failures through [`CalculationError`].
//!
//! ```
//! use chrono::NaiveDate;
//! use planetr::{Location, calculate_planetary_hours};
//!
//! let location = Location::new(40.7128, -74.0060, "New York", "America/New_York").unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap(); // a Wednesday
//! let hours = calculate_planetary_hours(date, &location, None).unwrap();
//! assert_eq!(hours.ruling_planet.name, "Mercury");
//! assert_eq!(hours.day_hours.len(), 12);
//! ```

pub mod args;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod geo;
pub mod hours;
pub mod logger;
pub mod planets;
pub mod query;
pub mod utils;
pub mod watch;

// Re-export important types for easier access
pub use config::Config;
pub use error::{CalculationError, CalculationResult};
pub use geo::location::Location;
pub use geo::solar::{SunCalculation, compute_sun_times};
pub use hours::{PlanetaryHour, PlanetaryHoursCalculation, calculate_planetary_hours, partition_hours};
pub use logger::{Log, LogLevel};
pub use planets::{CHALDEAN_ORDER, Planet, day_ruler, planet_by_id, planet_by_index};
pub use query::{resolve_planetary_day, time_remaining};
