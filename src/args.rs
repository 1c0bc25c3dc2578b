//! Command-line argument parsing and processing.
//!
//! Flags are declared with clap's derive API and then folded into a [`CliAction`],
//! so the binary only has to match on what to do.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::geo::location::{Location, PRESETS, find_preset};

/// Planetary hours for any date and location
#[derive(Debug, clap::Parser)]
#[command(author, long_about = None, name = "planetr", version)]
pub struct Cli {
    /// Date to compute (YYYY-MM-DD); defaults to the planetary day containing now
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Use this instant as "now" (RFC 3339, e.g. 2024-06-19T14:30:00-04:00)
    #[arg(long, value_name = "INSTANT", value_parser = parse_instant)]
    pub at: Option<DateTime<FixedOffset>>,

    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true, requires = "longitude")]
    pub latitude: Option<f64>,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true, requires = "latitude")]
    pub longitude: Option<f64>,

    /// Display name for the location
    #[arg(long)]
    pub city: Option<String>,

    /// Timezone label shown next to the location
    #[arg(long)]
    pub timezone: Option<String>,

    /// Built-in location: new-york, london, paris, tokyo
    #[arg(short, long, value_name = "NAME", conflicts_with = "latitude")]
    pub preset: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(short, long, conflicts_with = "watch")]
    pub json: bool,

    /// Keep running and report each new planetary hour
    #[arg(short, long)]
    pub watch: bool,

    /// Store the chosen location in the configuration file and exit
    #[arg(long, conflicts_with_all = ["json", "watch"])]
    pub save: bool,

    /// Show debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except JSON
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("expected an RFC 3339 instant ({})", e))
}

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
    Watch,
}

/// Where the location comes from, highest precedence first.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Coordinates { latitude: f64, longitude: f64 },
    Preset(String),
    Config,
}

/// Settings for a calculation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub date: Option<NaiveDate>,
    pub at: Option<DateTime<FixedOffset>>,
    pub location: LocationSource,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub config_path: Option<PathBuf>,
    pub mode: OutputMode,
    pub debug_enabled: bool,
    pub quiet: bool,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// Compute and show planetary hours
    Run(RunOptions),
    /// Persist the selected location to the config file
    SaveLocation(RunOptions),
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments, program name first
    ///
    /// # Returns
    /// The action to run, or the clap error (which also covers `--help` and `--version`)
    pub fn parse<I, S>(args: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        Ok(ParsedArgs {
            action: cli.into_action(),
        })
    }

    /// Parse the process arguments.
    pub fn from_env() -> Result<ParsedArgs, clap::Error> {
        Self::parse(std::env::args_os())
    }
}

impl Cli {
    pub fn into_action(self) -> CliAction {
        let location = match (self.latitude, self.longitude, self.preset) {
            (Some(latitude), Some(longitude), _) => LocationSource::Coordinates {
                latitude,
                longitude,
            },
            (_, _, Some(preset)) => LocationSource::Preset(preset),
            _ => LocationSource::Config,
        };

        let mode = if self.json {
            OutputMode::Json
        } else if self.watch {
            OutputMode::Watch
        } else {
            OutputMode::Text
        };

        let options = RunOptions {
            date: self.date,
            at: self.at,
            location,
            city: self.city,
            timezone: self.timezone,
            config_path: self.config,
            mode,
            debug_enabled: self.debug,
            quiet: self.quiet,
        };

        if self.save {
            CliAction::SaveLocation(options)
        } else {
            CliAction::Run(options)
        }
    }
}

impl RunOptions {
    /// Build the location to use, applying CLI > preset > config precedence.
    ///
    /// `--city` and `--timezone` rename whatever location was chosen.
    pub fn resolve_location(&self, config: &Config) -> Result<Location> {
        let base = match &self.location {
            LocationSource::Coordinates {
                latitude,
                longitude,
            } => Location::new(
                *latitude,
                *longitude,
                "Current Location",
                config.timezone.as_deref().unwrap_or("UTC"),
            )
            .context("Invalid coordinates on the command line")?,
            LocationSource::Preset(name) => {
                let preset = find_preset(name).with_context(|| {
                    let known: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
                    format!(
                        "Unknown preset '{}'. Available presets: {}",
                        name,
                        known.join(", ")
                    )
                })?;
                preset.to_location()?
            }
            LocationSource::Config => config.to_location()?,
        };

        if self.city.is_none() && self.timezone.is_none() {
            return Ok(base);
        }

        let location = Location::new(
            base.latitude(),
            base.longitude(),
            self.city.as_deref().unwrap_or(base.name()),
            self.timezone.as_deref().unwrap_or(base.timezone()),
        )?;
        Ok(location)
    }
}
