//! Configuration system for planetr with validation and private coordinate overrides.
//!
//! ## Configuration Sources
//!
//! The configuration lives in `planetr.toml` under the user's config directory
//! (`$XDG_CONFIG_HOME/planetr/planetr.toml` on Linux). A sibling `geo.toml` may hold
//! the coordinates instead, so the main file can be version controlled without
//! revealing a location. When present, `geo.toml` overrides the main file.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Planetr configuration]
//! city = "New York"              # Display name for the location
//! timezone = "America/New_York"  # Timezone label (display only)
//! time_format = "12h"            # "12h" or "24h"
//! show_qualities = true          # Show planetary qualities in the schedule
//! watch_interval = 60            # Seconds between refreshes in --watch mode
//!
//! #[Location]
//! latitude = 40.712800
//! longitude = -74.006000
//! ```
//!
//! ## Validation and Error Handling
//!
//! - **Geographic validation**: Latitude (-90° to +90°), longitude (-180° to +180°)
//! - **Range validation**: Watch interval (10-3600 seconds)
//! - **Format validation**: Time format must be `12h` or `24h`
//!
//! When no configuration exists, [`Config::load`] writes a commented default using
//! New York as the location.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::geo::location::{Location, validate_coordinates};
use crate::logger::Log;
use crate::utils::{TimeFormat, format_coordinates, path_for_display};

/// Contents of the optional `geo.toml` next to the main config file.
#[derive(Debug, Deserialize, Clone)]
struct GeoConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Configuration structure for planetr application settings.
///
/// Every field is optional in the file; [`Config::load_from_path`] fills in
/// defaults for anything missing before validating.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub city: Option<String>,
    pub timezone: Option<String>, // display label only
    pub time_format: Option<String>, // "12h" or "24h"
    pub show_qualities: Option<bool>,
    pub watch_interval: Option<u64>, // seconds
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: Some(DEFAULT_CITY.to_string()),
            timezone: Some(DEFAULT_TIMEZONE.to_string()),
            time_format: Some(DEFAULT_TIME_FORMAT.to_string()),
            show_qualities: Some(DEFAULT_SHOW_QUALITIES),
            watch_interval: Some(DEFAULT_WATCH_INTERVAL),
            latitude: Some(DEFAULT_LATITUDE),
            longitude: Some(DEFAULT_LONGITUDE),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("planetr").join("planetr.toml"))
    }

    /// Path of the `geo.toml` that sits next to `config_path`.
    pub fn geo_path_for(config_path: &Path) -> Option<PathBuf> {
        config_path.parent().map(|parent| parent.join("geo.toml"))
    }

    /// Write a commented default configuration.
    ///
    /// # Arguments
    /// * `path` - Path where the config file should be created
    /// * `location` - Location to store instead of New York
    ///
    /// If a `geo.toml` already exists next to `path`, the coordinates are written there
    /// and left out of the main file.
    pub fn create_default_config(path: &Path, location: Option<&Location>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let (lat, lon, city, timezone) = match location {
            Some(location) => (
                location.latitude(),
                location.longitude(),
                location.name(),
                location.timezone(),
            ),
            None => (
                DEFAULT_LATITUDE,
                DEFAULT_LONGITUDE,
                DEFAULT_CITY,
                DEFAULT_TIMEZONE,
            ),
        };

        let geo_path = Self::geo_path_for(path).filter(|p| p.exists());
        if let Some(geo_path) = &geo_path {
            fs::write(geo_path, geo_file_content(lat, lon)).with_context(|| {
                format!("Failed to write coordinates to {}", geo_path.display())
            })?;
            Log::log_indented(&format!(
                "Saved coordinates to separate geo file: {}",
                path_for_display(geo_path)
            ));
        }

        let builder = ConfigBuilder::new()
            .add_section("Planetr configuration")
            .add_setting("city", &toml_string(city), "Display name for the location")
            .add_setting(
                "timezone",
                &toml_string(timezone),
                "Timezone label (display only, times use mean solar time)",
            )
            .add_setting(
                "time_format",
                &toml_string(DEFAULT_TIME_FORMAT),
                "Clock style: \"12h\" or \"24h\"",
            )
            .add_setting(
                "show_qualities",
                &DEFAULT_SHOW_QUALITIES.to_string(),
                "Show planetary qualities in the schedule",
            )
            .add_setting(
                "watch_interval",
                &DEFAULT_WATCH_INTERVAL.to_string(),
                &format!(
                    "Seconds between refreshes in --watch mode ({}-{})",
                    MINIMUM_WATCH_INTERVAL, MAXIMUM_WATCH_INTERVAL
                ),
            );

        let builder = if geo_path.is_none() {
            builder
                .add_section("Location")
                .add_setting("latitude", &format!("{:.6}", lat), "Geographic latitude")
                .add_setting(
                    "longitude",
                    &format!("{:.6}", lon),
                    "Geographic longitude (use 'planetr --save' to change)",
                )
        } else {
            builder
        };

        fs::write(path, builder.build()).context("Failed to write default config file")?;
        Ok(())
    }

    fn apply_defaults(config: &mut Config) {
        if config.city.is_none() {
            config.city = Some(DEFAULT_CITY.to_string());
        }
        if config.timezone.is_none() {
            config.timezone = Some(DEFAULT_TIMEZONE.to_string());
        }
        if config.time_format.is_none() {
            config.time_format = Some(DEFAULT_TIME_FORMAT.to_string());
        }
        if config.show_qualities.is_none() {
            config.show_qualities = Some(DEFAULT_SHOW_QUALITIES);
        }
        if config.watch_interval.is_none() {
            config.watch_interval = Some(DEFAULT_WATCH_INTERVAL);
        }
        if config.latitude.is_none() && config.longitude.is_none() {
            config.latitude = Some(DEFAULT_LATITUDE);
            config.longitude = Some(DEFAULT_LONGITUDE);
        }
    }

    /// Load a config file without creating a default one.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::load_geo_override_from_path(&mut config, path);
        Self::apply_defaults(&mut config);
        validate_config(&config)?;

        Ok(config)
    }

    /// Apply `geo.toml` coordinates, if any. A malformed file is reported and ignored.
    fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
        let Some(geo_path) = Self::geo_path_for(config_path) else {
            return;
        };
        if !geo_path.exists() {
            return;
        }

        match fs::read_to_string(&geo_path) {
            Ok(content) => match toml::from_str::<GeoConfig>(&content) {
                Ok(geo_config) => {
                    if let Some(lat) = geo_config.latitude {
                        config.latitude = Some(lat);
                    }
                    if let Some(lon) = geo_config.longitude {
                        config.longitude = Some(lon);
                    }
                    Log::log_debug(&format!(
                        "Loaded geographic overrides from {}",
                        path_for_display(&geo_path)
                    ));
                }
                Err(e) => {
                    Log::log_warning(&format!(
                        "Failed to parse geo.toml: {}. Using coordinates from main config.",
                        e
                    ));
                }
            },
            Err(e) => {
                Log::log_warning(&format!(
                    "Failed to read geo.toml: {}. Using coordinates from main config.",
                    e
                ));
            }
        }
    }

    /// Load the user's configuration, creating a default one on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Log::log_block_start(&format!(
                "Creating default config at {}",
                path_for_display(&config_path)
            ));
            Self::create_default_config(&config_path, None)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Store `location` in the user's config file.
    pub fn update_coordinates(location: &Location) -> Result<()> {
        let config_path = Self::get_config_path()?;
        Self::update_coordinates_at(&config_path, location)
    }

    /// Store `location` in the config file at `config_path`.
    ///
    /// Existing lines keep their trailing comments and missing keys are appended. When
    /// a `geo.toml` exists next to the config, the coordinates go there instead and the
    /// main file keeps none.
    pub fn update_coordinates_at(config_path: &Path, location: &Location) -> Result<()> {
        if !config_path.exists() {
            anyhow::bail!("No existing config file found at {}", config_path.display());
        }

        let (latitude, longitude) = (location.latitude(), location.longitude());
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut updated_content =
            replace_or_append(&content, "city", &toml_string(location.name()));
        updated_content =
            replace_or_append(&updated_content, "timezone", &toml_string(location.timezone()));

        let geo_path = Self::geo_path_for(config_path).filter(|p| p.exists());
        if let Some(geo_path) = &geo_path {
            fs::write(geo_path, geo_file_content(latitude, longitude)).with_context(|| {
                format!("Failed to write coordinates to {}", geo_path.display())
            })?;
        } else {
            updated_content =
                replace_or_append(&updated_content, "latitude", &format!("{:.6}", latitude));
            updated_content =
                replace_or_append(&updated_content, "longitude", &format!("{:.6}", longitude));
        }

        if updated_content != content {
            fs::write(config_path, updated_content).with_context(|| {
                format!(
                    "Failed to write updated config to {}",
                    config_path.display()
                )
            })?;
        }

        let target = geo_path.as_deref().unwrap_or(config_path);
        Log::log_block_start(&format!(
            "Updated coordinates in {}",
            path_for_display(target)
        ));
        Log::log_indented(&format!(
            "Location: {}",
            format_coordinates(latitude, longitude)
        ));

        Ok(())
    }

    pub fn log_config(&self, config_path: Option<&Path>) {
        if let Some(path) = config_path {
            Log::log_block_start(&format!(
                "Loaded configuration from {}",
                path_for_display(path)
            ));
        } else {
            Log::log_block_start("Using built-in configuration");
        }

        Log::log_indented(&format!(
            "City: {}",
            self.city.as_deref().unwrap_or(DEFAULT_CITY)
        ));
        Log::log_indented(&format!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        ));
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            Log::log_indented(&format!("Location: {}", format_coordinates(lat, lon)));
        }
        Log::log_indented(&format!("Time format: {}", self.time_format()));
        Log::log_indented(&format!(
            "Show qualities: {}",
            self.show_qualities.unwrap_or(DEFAULT_SHOW_QUALITIES)
        ));
        Log::log_indented(&format!(
            "Watch interval: {} seconds",
            self.watch_interval()
        ));
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn watch_interval(&self) -> u64 {
        self.watch_interval.unwrap_or(DEFAULT_WATCH_INTERVAL)
    }

    /// Build the configured [`Location`].
    pub fn to_location(&self) -> Result<Location> {
        let latitude = self.latitude.context("Configuration has no latitude")?;
        let longitude = self.longitude.context("Configuration has no longitude")?;
        let location = Location::new(
            latitude,
            longitude,
            self.city.as_deref().unwrap_or(DEFAULT_CITY),
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE),
        )?;
        Ok(location)
    }
}

/// Validate value ranges of an already-loaded configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(lat), Some(lon)) => validate_coordinates(lat, lon)?,
        (Some(_), None) => anyhow::bail!("Latitude is set but longitude is missing"),
        (None, Some(_)) => anyhow::bail!("Longitude is set but latitude is missing"),
        (None, None) => {}
    }

    if let Some(interval) = config.watch_interval {
        if !(MINIMUM_WATCH_INTERVAL..=MAXIMUM_WATCH_INTERVAL).contains(&interval) {
            anyhow::bail!(
                "Watch interval ({} seconds) must be between {} and {} seconds",
                interval,
                MINIMUM_WATCH_INTERVAL,
                MAXIMUM_WATCH_INTERVAL
            );
        }
    }

    if let Some(format) = config.time_format.as_deref() {
        format
            .parse::<TimeFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(city) = config.city.as_deref() {
        if city.trim().is_empty() {
            anyhow::bail!("City name cannot be empty");
        }
    }

    Ok(())
}

fn geo_file_content(latitude: f64, longitude: f64) -> String {
    format!(
        "#[Private geo coordinates]\nlatitude = {:.6}\nlongitude = {:.6}\n",
        latitude, longitude
    )
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments are padded to one column past the longest setting line.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}

/// Find the uncommented line assigning `key`.
fn find_config_line(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .find(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with('#')
                && trimmed
                    .split_once('=')
                    .is_some_and(|(lhs, _)| lhs.trim() == key)
        })
        .map(str::to_string)
}

/// Quote `value` as a TOML string, escaping as needed.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Byte offset of the `#` starting a trailing comment, skipping any inside string values.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return Some(i),
            None => {}
        }
    }
    None
}

/// Rebuild a `key = value` line, keeping its trailing comment at the same column.
fn preserve_comment_formatting(original_line: &str, key: &str, new_value: &str) -> String {
    let key_value_part = format!("{} = {}", key, new_value);
    match comment_start(original_line) {
        Some(comment_pos) => {
            let comment_part = &original_line[comment_pos..];
            let padding = comment_pos.saturating_sub(key_value_part.len()).max(1);
            format!("{}{}{}", key_value_part, " ".repeat(padding), comment_part)
        }
        None => key_value_part,
    }
}

fn replace_or_append(content: &str, key: &str, value: &str) -> String {
    match find_config_line(content, key) {
        Some(line) => {
            let new_line = preserve_comment_formatting(&line, key, value);
            content.replacen(&line, &new_line, 1)
        }
        None => {
            let mut updated = content.to_string();
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&format!("{} = {}\n", key, value));
            updated
        }
    }
}
