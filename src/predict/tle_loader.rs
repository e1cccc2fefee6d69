use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;

pub struct TleEntry {
    pub name: String,
    pub norad_id: u64,
    pub elements: Elements,
    pub constants: Constants,
}

/// Orbital elements keyed by satellite name, read once from a TLE file.
pub struct TleLoader {
    tle_file: PathBuf,
    satellites: HashMap<String, TleEntry>,
}

impl TleLoader {
    pub fn new(tle_file: PathBuf) -> Self {
        Self {
            tle_file,
            satellites: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<(), PredictError> {
        if !self.tle_file.is_file() {
            return Err(PredictError::FileNotFound(
                self.tle_file.display().to_string(),
            ));
        }

        let content = fs::read_to_string(&self.tle_file)?;
        let source = file_label(&self.tle_file);
        self.load_str(&content, &source);

        log::info!(
            "Loaded {} element sets from {}",
            self.satellites.len(),
            self.tle_file.display()
        );
        Ok(())
    }

    /// Replaces the loaded set with the records in `content`. Records that
    /// fail to parse are logged and skipped.
    pub fn load_str(&mut self, content: &str, source: &str) {
        self.satellites.clear();

        for (name, line1, line2) in parse_multi_tle(content) {
            match parse_entry(name, &line1, &line2, source) {
                Ok(entry) => {
                    self.satellites.insert(catalog_key(&entry.name), entry);
                }
                Err(e) => log::warn!("Skipping TLE record: {}", e),
            }
        }
    }

    pub fn get(&self, satellite: &str) -> Result<&TleEntry, PredictError> {
        self.satellites
            .get(&catalog_key(satellite))
            .ok_or_else(|| PredictError::UnknownSatellite(satellite.to_string()))
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }
}

fn parse_entry(
    name: Option<String>,
    line1: &str,
    line2: &str,
    source: &str,
) -> Result<TleEntry, PredictError> {
    let invalid = |message: String| PredictError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

    let name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

    Ok(TleEntry {
        name,
        norad_id: elements.norad_id,
        elements,
        constants,
    })
}

fn catalog_key(name: &str) -> String {
    name.trim().to_uppercase()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const NOAA_19: &str = "NOAA 19
1 33591U 09005A   24061.50000000  .00000110  00000-0  84260-4 0  9999
2 33591  99.0910  99.9366 0013460 191.1765 168.9140 14.12976400775931
";

    #[test]
    fn splits_named_and_unnamed_records() {
        let content = "\
NOAA 19
1 33591U 09005A   24061.50000000  .00000110  00000-0  84260-4 0  9999
2 33591  99.0910  99.9366 0013460 191.1765 168.9140 14.12976400775931

1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
garbage line
";
        let records = parse_multi_tle(content);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0.as_deref(), Some("NOAA 19"));
        assert_eq!(records[1].0, None);
        assert!(records[1].1.starts_with("1 25544U"));
    }

    #[test]
    fn unknown_satellite_is_a_configuration_error() {
        let loader = TleLoader::new(PathBuf::from("tle.txt"));
        match loader.get("NOAA 19") {
            Err(PredictError::UnknownSatellite(name)) => assert_eq!(name, "NOAA 19"),
            other => panic!("unexpected result: {:?}", other.map(|e| e.norad_id)),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let mut loader = TleLoader::new(PathBuf::from("/nonexistent/tle.txt"));
        assert!(matches!(loader.load(), Err(PredictError::FileNotFound(_))));
    }

    #[test]
    fn looks_up_by_trimmed_case_insensitive_name() {
        let mut loader = TleLoader::new(PathBuf::from("tle.txt"));
        loader.load_str(NOAA_19, "inline");
        assert_eq!(loader.len(), 1);
        assert_eq!(loader.get("noaa 19 ").unwrap().norad_id, 33591);
    }
}
