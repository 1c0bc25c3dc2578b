use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};

use planetr::args::{CliAction, OutputMode, ParsedArgs, RunOptions};
use planetr::config::Config;
use planetr::constants::{DEFAULT_SHOW_QUALITIES, EXIT_FAILURE};
use planetr::display::{
    DisplayOptions, render_current_hour, render_schedule, render_summary, to_json,
};
use planetr::geo::location::Location;
use planetr::geo::log_solar_debug_info;
use planetr::hours::{PlanetaryHoursCalculation, calculate_planetary_hours};
use planetr::logger::Log;
use planetr::query::resolve_planetary_day;
use planetr::watch::{now_at, run_watch, setup_signal_handler};

fn main() {
    let parsed = match ParsedArgs::from_env() {
        Ok(parsed) => parsed,
        // Covers --help and --version as well as usage errors
        Err(err) => err.exit(),
    };

    let result = match parsed.action {
        CliAction::Run(options) => run(options),
        CliAction::SaveLocation(options) => save_location(options),
    };

    if let Err(e) = result {
        // Errors are reported even under --quiet or --json
        Log::set_enabled(true);
        Log::log_critical(&format!("{:#}", e));
        std::process::exit(EXIT_FAILURE);
    }
}

/// Apply the output switches shared by every action.
fn init_logging(options: &RunOptions) {
    Log::set_enabled(!options.quiet && options.mode != OutputMode::Json);
    Log::set_debug(options.debug_enabled);
    Log::log_version();
}

/// Load the configuration named on the command line, or the user's default one.
fn load_config(options: &RunOptions) -> Result<Config> {
    let config = match &options.config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if Log::is_debug() {
        let path = match &options.config_path {
            Some(path) => Some(path.clone()),
            None => Config::get_config_path().ok(),
        };
        config.log_config(path.as_deref());
    }
    Ok(config)
}

fn compute(
    options: &RunOptions,
    location: &Location,
    now: DateTime<FixedOffset>,
) -> Result<PlanetaryHoursCalculation> {
    let calculation = match options.date {
        Some(date) => calculate_planetary_hours(date, location, Some(now))
            .with_context(|| format!("Failed to compute planetary hours for {}", date))?,
        None => resolve_planetary_day(location, now)
            .context("Failed to compute planetary hours for the current day")?,
    };
    Ok(calculation)
}

fn run(options: RunOptions) -> Result<()> {
    init_logging(&options);

    let config = load_config(&options)?;
    let location = options.resolve_location(&config)?;
    let display = DisplayOptions {
        time_format: config.time_format(),
        show_qualities: config.show_qualities.unwrap_or(DEFAULT_SHOW_QUALITIES),
    };

    match options.mode {
        OutputMode::Watch => {
            let running = setup_signal_handler()?;
            run_watch(&location, display, config.watch_interval(), &running)?;
        }
        OutputMode::Json => {
            let now = reference_instant(&options, &location);
            let calculation = compute(&options, &location, now)?;
            println!("{}", to_json(&calculation, Some(now))?);
        }
        OutputMode::Text => {
            let now = reference_instant(&options, &location);
            let calculation = compute(&options, &location, now)?;
            log_solar_debug_info(&location, calculation.date)?;
            render_summary(&calculation, display);
            if calculation.current_hour.is_some() {
                render_current_hour(&calculation, now, display);
            }
            render_schedule(&calculation, Some(now), display);
        }
    }

    Log::log_end();
    Ok(())
}

/// `--at` if given, otherwise the clock, expressed at the location's mean solar offset.
fn reference_instant(options: &RunOptions, location: &Location) -> DateTime<FixedOffset> {
    match options.at {
        Some(at) => at.with_timezone(&location.mean_solar_offset()),
        None => now_at(location),
    }
}

fn save_location(options: RunOptions) -> Result<()> {
    init_logging(&options);

    let config_path = match &options.config_path {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    let existing = if config_path.exists() {
        Config::load_from_path(&config_path)?
    } else {
        Config::default()
    };
    let location = options.resolve_location(&existing)?;

    if config_path.exists() {
        match &options.config_path {
            Some(path) => Config::update_coordinates_at(path, &location)?,
            None => Config::update_coordinates(&location)?,
        }
    } else {
        Log::log_block_start("Creating configuration with the selected location");
        Config::create_default_config(&config_path, Some(&location))?;
    }

    Log::log_end();
    Ok(())
}
