use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::ValidationError;

/// EMC receiver detection mode; each one has its own limit curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr, Serialize)]
pub enum Detector {
    #[strum(serialize = "AVG")]
    Average,
    #[strum(serialize = "QP")]
    QuasiPeak,
    #[strum(serialize = "PK")]
    Peak,
}

/// Load-point weighting table of a weighted-efficiency standard.
///
/// Weights are kept exactly as published; they are not required to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyProfile {
    pub(crate) name: String,
    pub(crate) checkpoints: Vec<f64>,
    pub(crate) weights: Vec<f64>,
}

impl EfficiencyProfile {
    /// Builds a profile over `checkpoints` (% of rated power). Without
    /// `weights` every checkpoint gets `1 / checkpoints.len()`.
    pub fn new(
        name: impl Into<String>,
        checkpoints: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, ValidationError> {
        ensure_percent_axis(&checkpoints, "checkpoints")?;

        let weights = match weights {
            Some(weights) => {
                ensure_aligned(checkpoints.len(), weights.len())?;
                if let Some(w) = weights.iter().find(|w| !(0.0..=1.0).contains(*w)) {
                    return Err(ValidationError::MalformedTable(format!(
                        "weight {} outside [0, 1]",
                        w
                    )));
                }
                weights
            }
            None => vec![1.0 / checkpoints.len() as f64; checkpoints.len()],
        };

        Ok(EfficiencyProfile {
            name: name.into(),
            checkpoints,
            weights,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checkpoints(&self) -> &[f64] {
        &self.checkpoints
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Outcome of one weighted-efficiency evaluation, kept whole so it can be
/// handed on to the exporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedEfficiency {
    pub name: String,
    pub checkpoints: Vec<f64>,
    pub measurements: Vec<f64>,
    pub weights: Vec<f64>,
    pub score: f64,
}

impl WeightedEfficiency {
    pub fn score_percent(&self) -> f64 {
        self.score * 100.0
    }
}

/// Minimum efficiency per load level, e.g. one 80 PLUS tier.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificationMask {
    pub(crate) name: String,
    pub(crate) load_levels: Vec<f64>,
    pub(crate) minimum_efficiency: Vec<f64>,
}

impl CertificationMask {
    pub fn new(
        name: impl Into<String>,
        load_levels: Vec<f64>,
        minimum_efficiency: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        ensure_percent_axis(&load_levels, "load levels")?;
        ensure_aligned(load_levels.len(), minimum_efficiency.len())?;
        if let Some(e) = minimum_efficiency.iter().find(|e| !(0.0..=1.0).contains(*e)) {
            return Err(ValidationError::MalformedTable(format!(
                "minimum efficiency {} outside [0, 1]",
                e
            )));
        }
        Ok(CertificationMask {
            name: name.into(),
            load_levels,
            minimum_efficiency,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load_levels(&self) -> &[f64] {
        &self.load_levels
    }

    pub fn minimum_efficiency(&self) -> &[f64] {
        &self.minimum_efficiency
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompliancePoint {
    pub load: f64,
    pub required: f64,
    pub measured: f64,
    /// `measured - required`; negative means the point fails.
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub certification: String,
    pub points: Vec<CompliancePoint>,
    pub passed: bool,
}

/// One detector's limit line: dBµV over strictly increasing frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitCurve {
    pub(crate) frequencies_hz: Vec<f64>,
    pub(crate) limits_dbuv: Vec<f64>,
    pub(crate) log_frequencies: Vec<f64>,
}

impl LimitCurve {
    pub fn new(frequencies_hz: Vec<f64>, limits_dbuv: Vec<f64>) -> Result<Self, ValidationError> {
        if frequencies_hz.is_empty() {
            return Err(ValidationError::MalformedTable(
                "limit curve has no points".to_string(),
            ));
        }
        ensure_aligned(frequencies_hz.len(), limits_dbuv.len())?;
        if let Some(f) = frequencies_hz.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(ValidationError::MalformedTable(format!(
                "limit curve frequency {} Hz is not positive",
                f
            )));
        }
        ensure_increasing(&frequencies_hz, "limit curve frequencies")?;

        let log_frequencies = frequencies_hz.iter().map(|f| f.log10()).collect();
        Ok(LimitCurve {
            frequencies_hz,
            limits_dbuv,
            log_frequencies,
        })
    }

    pub fn frequencies_hz(&self) -> &[f64] {
        &self.frequencies_hz
    }

    pub fn limits_dbuv(&self) -> &[f64] {
        &self.limits_dbuv
    }
}

/// Conducted-emission limits of one standard. The average curve is always
/// present, quasi-peak and peak only where the standard defines them.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitMask {
    pub(crate) name: String,
    pub(crate) document: Option<String>,
    pub(crate) average: LimitCurve,
    pub(crate) quasi_peak: Option<LimitCurve>,
    pub(crate) peak: Option<LimitCurve>,
}

impl LimitMask {
    pub fn new(
        name: impl Into<String>,
        average: LimitCurve,
        quasi_peak: Option<LimitCurve>,
        peak: Option<LimitCurve>,
    ) -> Self {
        LimitMask {
            name: name.into(),
            document: None,
            average,
            quasi_peak,
            peak,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn curve(&self, detector: Detector) -> Option<&LimitCurve> {
        match detector {
            Detector::Average => Some(&self.average),
            Detector::QuasiPeak => self.quasi_peak.as_ref(),
            Detector::Peak => self.peak.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectorLimit {
    pub dbuv: f64,
    pub volts: f64,
    /// False when the standard has no curve for this detector; both values are then zero.
    pub available: bool,
}

impl DetectorLimit {
    pub(crate) fn missing() -> Self {
        DetectorLimit {
            dbuv: 0.0,
            volts: 0.0,
            available: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitQuery {
    pub frequency_hz: f64,
    pub average: DetectorLimit,
    pub quasi_peak: DetectorLimit,
    pub peak: DetectorLimit,
}

impl LimitQuery {
    pub fn get(&self, detector: Detector) -> DetectorLimit {
        match detector {
            Detector::Average => self.average,
            Detector::QuasiPeak => self.quasi_peak,
            Detector::Peak => self.peak,
        }
    }

    /// `(avg, qp, pk, avg_dbuv, qp_dbuv, pk_dbuv)`, linear values in volts.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64) {
        (
            self.average.volts,
            self.quasi_peak.volts,
            self.peak.volts,
            self.average.dbuv,
            self.quasi_peak.dbuv,
            self.peak.dbuv,
        )
    }
}

pub(crate) fn ensure_aligned(expected: usize, found: usize) -> Result<(), ValidationError> {
    if expected != found {
        return Err(ValidationError::LengthMismatch { expected, found });
    }
    Ok(())
}

pub(crate) fn ensure_increasing(values: &[f64], what: &str) -> Result<(), ValidationError> {
    if values.windows(2).any(|pair| !(pair[0] < pair[1])) {
        return Err(ValidationError::MalformedTable(format!(
            "{} must be strictly increasing",
            what
        )));
    }
    Ok(())
}

fn ensure_percent_axis(values: &[f64], what: &str) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::MalformedTable(format!("{} are empty", what)));
    }
    if let Some(v) = values.iter().find(|v| !(**v > 0.0 && **v <= 100.0)) {
        return Err(ValidationError::MalformedTable(format!(
            "{} value {} outside (0, 100]",
            what, v
        )));
    }
    ensure_increasing(values, what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_uniform() {
        let profile = EfficiencyProfile::new("flat", vec![25.0, 50.0, 75.0, 100.0], None).unwrap();
        assert_eq!(profile.weights(), &[0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn profile_rejects_misaligned_weights() {
        let err = EfficiencyProfile::new("bad", vec![20.0, 50.0], Some(vec![0.5])).unwrap_err();
        assert_eq!(err, ValidationError::LengthMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn profile_rejects_unordered_or_out_of_range_checkpoints() {
        assert!(EfficiencyProfile::new("bad", vec![50.0, 20.0], None).is_err());
        assert!(EfficiencyProfile::new("bad", vec![0.0, 20.0], None).is_err());
        assert!(EfficiencyProfile::new("bad", vec![20.0, 120.0], None).is_err());
        assert!(EfficiencyProfile::new("bad", vec![], None).is_err());
    }

    #[test]
    fn weights_may_sum_below_one() {
        let profile =
            EfficiencyProfile::new("short", vec![50.0, 100.0], Some(vec![0.5, 0.46])).unwrap();
        let total: f64 = profile.weights().iter().sum();
        assert!((total - 0.96).abs() < 1e-12);
    }

    #[test]
    fn limit_curve_needs_positive_increasing_frequencies() {
        assert!(LimitCurve::new(vec![0.0, 1e6], vec![60.0, 50.0]).is_err());
        assert!(LimitCurve::new(vec![1e6, 1e6], vec![60.0, 50.0]).is_err());
        assert!(LimitCurve::new(vec![1e6, 2e6], vec![60.0]).is_err());
        assert!(LimitCurve::new(vec![], vec![]).is_err());
        assert!(LimitCurve::new(vec![0.5e6, 0.5e6 + 1.0], vec![46.0, 50.0]).is_ok());
    }

    #[test]
    fn missing_curves_are_reported_as_none() {
        let avg = LimitCurve::new(vec![1e6, 2e6], vec![60.0, 50.0]).unwrap();
        let mask = LimitMask::new("avg only", avg, None, None);
        assert!(mask.curve(Detector::Average).is_some());
        assert!(mask.curve(Detector::QuasiPeak).is_none());
        assert!(mask.curve(Detector::Peak).is_none());
    }

    #[test]
    fn detector_labels() {
        assert_eq!(Detector::QuasiPeak.to_string(), "QP");
        assert_eq!(Detector::Peak.as_ref(), "PK");
    }
}
