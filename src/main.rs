mod config;
mod predict;
mod schedule;
mod trajectory;
mod web;

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use strum::EnumString;
use strum_macros::Display;

use crate::config::Config;
use crate::predict::GroundStation;
use crate::schedule::{compute_schedule, ScheduleRequest};
use crate::trajectory::{render_trajectory, TrajectorySampler};
use crate::web::form::{check_duration, parse_display_time, parse_form_start, station};
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "wx-pass")]
#[command(about = "Weather satellite pass scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
struct StationArgs {
    /// Observer latitude in degrees, defaults to the configured station
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Observer altitude in meters
    #[arg(long, allow_hyphen_values = true)]
    alt: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web form and JSON API
    Serve {
        #[arg(long, short)]
        config: String,
    },
    /// Print the merged pass schedule
    Schedule {
        #[arg(long, short)]
        config: String,
        #[command(flatten)]
        station: StationArgs,
        #[arg(long, allow_hyphen_values = true)]
        min_elevation: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        min_apogee: Option<f64>,
        /// Window start, YYYY-MM-DDTHH:MM (UTC)
        #[arg(long)]
        start: String,
        /// Window length, e.g. 12h
        #[arg(long, default_value = "24h")]
        duration: humantime::Duration,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Export the per-second trajectory of one pass
    Trajectory {
        #[arg(long, short)]
        config: String,
        #[arg(long)]
        satellite: String,
        /// Pass start, YYYY.MM.DD HH:MM:SS (UTC)
        #[arg(long)]
        start: String,
        /// Pass end, YYYY.MM.DD HH:MM:SS (UTC)
        #[arg(long)]
        end: String,
        #[command(flatten)]
        station: StationArgs,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Schedule {
            config,
            station,
            min_elevation,
            min_apogee,
            start,
            duration,
            format,
        } => {
            let options = ScheduleOptions {
                station,
                min_elevation,
                min_apogee,
                start,
                duration,
                format,
            };
            schedule(&config, options)
        }
        Commands::Trajectory {
            config,
            satellite,
            start,
            end,
            station,
            output,
        } => trajectory(&config, &satellite, &start, &end, &station, output.as_deref()),
    }
}

struct ScheduleOptions {
    station: StationArgs,
    min_elevation: Option<f64>,
    min_apogee: Option<f64>,
    start: String,
    duration: humantime::Duration,
    format: OutputFormat,
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error reading config {}: {}", path, e);
            None
        }
    }
}

/// Command-line station, falling back to the configured one field by field.
fn resolve_station(config: &Config, args: &StationArgs) -> Result<GroundStation, String> {
    let configured = config.ground_station().map_err(|e| e.to_string())?;
    let lat = args.lat.or(configured.map(|s| s.latitude_deg));
    let lon = args.lon.or(configured.map(|s| s.longitude_deg));
    let alt = args
        .alt
        .or(configured.map(|s| s.altitude_m))
        .unwrap_or(0.0);

    match (lat, lon) {
        (Some(lat), Some(lon)) => station("lat", lat, "lon", lon, alt).map_err(|e| e.to_string()),
        _ => Err("No station configured; pass --lat and --lon".to_string()),
    }
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let observer = match config.load_observer() {
        Ok(o) => o,
        Err(e) => {
            log::error!("Failed to load orbital elements: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Tracking {} satellites: {}",
        config.catalog.satellites.len(),
        config.catalog.satellites.names().join(", ")
    );
    if let Some(station) = &config.station {
        log::info!(
            "Form defaults to station {} at {}",
            station.name.as_deref().unwrap_or("unnamed"),
            station.coordinates
        );
    }

    let state = AppState::new(config, Arc::new(observer));
    match web::run_server(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn schedule(path: &str, options: ScheduleOptions) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let request = match build_request(&config, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let observer = match config.load_observer() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Failed to load orbital elements: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let schedule = match compute_schedule(&observer, &config.catalog.satellites, &request) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Schedule failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rows = schedule.rows();
    match options.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Text => {
            for row in &rows {
                println!(
                    "{}{:<12} {} - {}  {:>6.2}",
                    if row.conflict { "! " } else { "  " },
                    row.satellite,
                    row.start_time,
                    row.end_time,
                    row.apogee_elevation_deg
                );
            }
            println!(
                "{} passes, {} in conflict",
                rows.len(),
                schedule.conflict_count()
            );
        }
    }

    ExitCode::SUCCESS
}

fn build_request(config: &Config, options: &ScheduleOptions) -> Result<ScheduleRequest, String> {
    let station = resolve_station(config, &options.station)?;
    let start = parse_form_start("start", &options.start).map_err(|e| e.to_string())?;
    let duration = chrono::Duration::from_std(*options.duration)
        .map_err(|e| format!("Invalid duration: {}", e))
        .and_then(|d| check_duration("duration", d).map_err(|e| e.to_string()))?;

    Ok(ScheduleRequest {
        station,
        min_elevation_deg: options
            .min_elevation
            .unwrap_or(config.defaults.min_elevation_deg),
        min_apogee_deg: options
            .min_apogee
            .unwrap_or(config.defaults.min_apogee_deg),
        start,
        duration,
    })
}

fn trajectory(
    path: &str,
    satellite: &str,
    start: &str,
    end: &str,
    station: &StationArgs,
    output: Option<&str>,
) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let station = match resolve_station(&config, station) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let bounds = parse_display_time("start", start).and_then(|start| {
        parse_display_time("end", end).map(|end| (start, end))
    });
    let (start, end) = match bounds {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let observer = match config.load_observer() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Failed to load orbital elements: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let samples = TrajectorySampler::new(&observer, satellite, start, end, station);
    let content = match render_trajectory(satellite, start, samples) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Trajectory failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        Some(file) => {
            if let Err(e) = fs::write(file, content) {
                eprintln!("Error writing {}: {}", file, e);
                return ExitCode::FAILURE;
            }
            println!("Trajectory written to {}", file);
        }
        None => print!("{}", content),
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn config() -> Config {
        Config::from_yaml(
            "catalog:\n  tle_file: tle.txt\nstation:\n  coordinates: \"55.75, 37.61\"\n  altitude_m: 150\n",
        )
        .unwrap()
    }

    fn no_station() -> StationArgs {
        StationArgs {
            lat: None,
            lon: None,
            alt: None,
        }
    }

    #[test]
    fn cli_station_overrides_config() {
        let args = StationArgs {
            lat: Some(-33.9),
            ..no_station()
        };
        let station = resolve_station(&config(), &args).unwrap();
        assert_eq!(station, GroundStation::new(-33.9, 37.61, 150.0));

        let bare = Config::from_yaml("catalog:\n  tle_file: tle.txt\n").unwrap();
        assert!(resolve_station(&bare, &no_station()).is_err());
    }

    #[test]
    fn builds_request_from_options() {
        let options = ScheduleOptions {
            station: no_station(),
            min_elevation: None,
            min_apogee: Some(45.0),
            start: "2024-03-01T08:00".into(),
            duration: "12h".parse().unwrap(),
            format: "json".parse().unwrap(),
        };
        let request = build_request(&config(), &options).unwrap();
        assert_eq!(request.min_elevation_deg, 10.0);
        assert_eq!(request.min_apogee_deg, 45.0);
        assert_eq!(request.start, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        assert_eq!(request.duration, chrono::Duration::hours(12));
    }

    #[test]
    fn cli_station_is_range_checked() {
        let args = StationArgs {
            lat: Some(95.0),
            ..no_station()
        };
        let err = resolve_station(&config(), &args).unwrap_err();
        assert!(err.contains("out of range"), "{err}");

        let args = StationArgs {
            lon: Some(f64::NAN),
            ..no_station()
        };
        assert!(resolve_station(&config(), &args).is_err());
    }

    #[test]
    fn oversized_duration_is_invalid_input() {
        let options = ScheduleOptions {
            station: no_station(),
            min_elevation: None,
            min_apogee: None,
            start: "2024-03-01T08:00".into(),
            duration: "2000000years".parse().unwrap(),
            format: OutputFormat::Text,
        };
        assert!(build_request(&config(), &options).is_err());

        let options = ScheduleOptions {
            duration: "32days".parse().unwrap(),
            ..options
        };
        assert!(build_request(&config(), &options).is_err());
    }

    #[test]
    fn output_format_names() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn parses_command_line() {
        let cli = Cli::try_parse_from([
            "wx-pass",
            "schedule",
            "--config",
            "config.yaml",
            "--lon",
            "-70.5",
            "--start",
            "2024-03-01T08:00",
            "--duration",
            "6h",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Schedule {
                station, format, ..
            } => {
                assert_eq!(station.lon, Some(-70.5));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected schedule command"),
        }
    }
}
