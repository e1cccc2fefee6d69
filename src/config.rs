use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::predict::{GroundStation, PredictError, Sgp4Observer, TleLoader};
use crate::schedule::SatelliteCatalog;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid station coordinates: {0}")]
    Station(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub station: Option<StationConfig>,
    #[serde(default)]
    pub defaults: FormDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub tle_file: PathBuf,
    #[serde(default)]
    pub satellites: SatelliteCatalog,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

/// Values pre-filled in the schedule form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub min_elevation_deg: f64,
    pub min_apogee_deg: f64,
    pub duration_hours: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            min_elevation_deg: 10.0,
            min_apogee_deg: 30.0,
            duration_hours: 24,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Configured observer, if any.
    pub fn ground_station(&self) -> Result<Option<GroundStation>, ConfigError> {
        self.station
            .as_ref()
            .map(|s| {
                GroundStation::from_coordinates(&s.coordinates, Some(s.altitude_m))
                    .ok_or_else(|| ConfigError::Station(s.coordinates.clone()))
            })
            .transpose()
    }

    /// Load the TLE file and warn about catalog entries it lacks.
    pub fn load_observer(&self) -> Result<Sgp4Observer, PredictError> {
        let mut tles = TleLoader::new(self.catalog.tle_file.clone());
        tles.load()?;
        if tles.len() == 0 {
            log::warn!(
                "{} holds no usable element sets",
                self.catalog.tle_file.display()
            );
        }

        for satellite in self.catalog.satellites.names() {
            if tles.get(satellite).is_err() {
                log::warn!(
                    "No elements for '{}' in {}; schedules will fail until it is added",
                    satellite,
                    self.catalog.tle_file.display()
                );
            }
        }

        Ok(Sgp4Observer::new(tles))
    }
}
