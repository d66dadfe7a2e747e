use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::catalog::TL81000_DEFAULT_CLASS;

/// Efficiency measured at a set of load points (% of rated power).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    pub name: String,
    pub load_levels: Vec<f64>,
    pub efficiencies: Vec<f64>,
}

/// Settings for one report run, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frequencies at which every EMC standard is queried.
    pub query_frequencies_hz: Vec<f64>,
    pub emc_class: u8,
    pub export_dir: PathBuf,
    /// Log-spaced samples per exported limit mask.
    pub export_points: usize,
    /// Scored with each weighting standard; lengths must match its checkpoints.
    pub weighted_measurements: Vec<MeasurementSet>,
    /// Checked against every 80 PLUS tier.
    pub psu_measurements: Vec<MeasurementSet>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            query_frequencies_hz: vec![150e3, 500e3, 1e6, 5e6, 30e6],
            emc_class: TL81000_DEFAULT_CLASS,
            export_dir: PathBuf::from("./export"),
            export_points: 200,
            weighted_measurements: Vec::new(),
            psu_measurements: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Settings> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings from `path`, or the defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Settings> {
        let path = path.as_ref();
        if path.exists() {
            Settings::load(path)
        } else {
            log::info!("{} not found, using default settings", path.display());
            Ok(Settings::default())
        }
    }
}
