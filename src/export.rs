//! Plot-ready JSON files, one per standard or certification name.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::domain::types::{ComplianceReport, Detector, LimitMask, WeightedEfficiency};
use crate::emc::log_spaced;

#[derive(Serialize)]
struct Export<'a, T: Serialize> {
    name: &'a str,
    generated_at: String,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct DetectorSeries {
    detector: Detector,
    dbuv: Vec<f64>,
    volts: Vec<f64>,
}

#[derive(Serialize)]
struct MaskSeries<'a> {
    document: Option<&'a str>,
    frequency_hz: Vec<f64>,
    series: Vec<DetectorSeries>,
}

/// `name` with everything except ASCII alphanumerics, `-` and `_` replaced by `_`.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_json<T: Serialize>(dir: &Path, name: &str, body: T) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{}.json", file_stem(name)));
    let export = Export {
        name,
        generated_at: Utc::now().to_rfc3339(),
        body,
    };
    let text = serde_json::to_string_pretty(&export)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

/// Samples every present detector curve at `points` log-spaced frequencies
/// over the mask's range.
pub fn write_limit_mask(dir: &Path, mask: &LimitMask, points: usize) -> anyhow::Result<PathBuf> {
    let (start, stop) = mask.frequency_range();
    let frequency_hz = log_spaced(start, stop, points);
    let queries = mask.sample(&frequency_hz)?;

    let series = mask
        .detectors()
        .into_iter()
        .map(|detector| DetectorSeries {
            detector,
            dbuv: queries.iter().map(|q| q.get(detector).dbuv).collect(),
            volts: queries.iter().map(|q| q.get(detector).volts).collect(),
        })
        .collect();

    write_json(
        dir,
        mask.name(),
        MaskSeries {
            document: mask.document(),
            frequency_hz,
            series,
        },
    )
}

pub fn write_weighted_efficiency(
    dir: &Path,
    result: &WeightedEfficiency,
) -> anyhow::Result<PathBuf> {
    write_json(dir, &result.name, result)
}

pub fn write_certification(dir: &Path, report: &ComplianceReport) -> anyhow::Result<PathBuf> {
    write_json(dir, &report.certification, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EightyPlus, EmcStandard, WeightingStandard};

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pe-limits-export-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn file_stem_replaces_spaces_and_punctuation() {
        assert_eq!(file_stem("80 PLUS Gold"), "80_PLUS_Gold");
        assert_eq!(file_stem("TL_81000_2018_03_AN"), "TL_81000_2018_03_AN");
        assert_eq!(file_stem("a/b.c"), "a_b_c");
    }

    #[test]
    fn limit_mask_export_has_one_series_per_detector() {
        let dir = scratch_dir("mask");
        let mask = EmcStandard::Tl81000.mask();
        let path = write_limit_mask(&dir, &mask, 50).unwrap();
        assert!(path.ends_with("TL_81000_2018_03_AN.json"));

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "TL_81000_2018_03_AN");
        assert_eq!(json["frequency_hz"].as_array().unwrap().len(), 50);
        let series = json["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["detector"], "Average");
        assert_eq!(series[1]["dbuv"][0], 107.0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn efficiency_and_certification_exports() {
        let dir = scratch_dir("eff");
        let eu = WeightingStandard::SolarEu.profile();
        let result = eu
            .evaluate(eu.checkpoints(), &[0.9, 0.93, 0.95, 0.96, 0.97, 0.97, 0.96])
            .unwrap();
        let path = write_weighted_efficiency(&dir, &result).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["weights"].as_array().unwrap().len(), 7);
        assert!((json["score"].as_f64().unwrap() - result.score).abs() < 1e-12);

        let report = EightyPlus::Bronze
            .mask()
            .check(&[20.0, 50.0, 100.0], &[0.83, 0.86, 0.83])
            .unwrap();
        let path = write_certification(&dir, &report).unwrap();
        assert!(path.ends_with("80_PLUS_Bronze.json"));
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["passed"], true);
        fs::remove_dir_all(&dir).unwrap();
    }
}
