use interp::{interp_slice, InterpMode};

use crate::domain::types::{
    ensure_aligned, ensure_increasing, CertificationMask, CompliancePoint, ComplianceReport,
    EfficiencyProfile, WeightedEfficiency,
};
use crate::error::ValidationError;

impl EfficiencyProfile {
    /// Weighted efficiency `Σ weights[i] * measurements[i]`.
    ///
    /// Both inputs must have one entry per configured weight. Measurements
    /// are taken as given, without range checks.
    pub fn evaluate(
        &self,
        checkpoints: &[f64],
        measurements: &[f64],
    ) -> Result<WeightedEfficiency, ValidationError> {
        ensure_aligned(checkpoints.len(), measurements.len())?;
        ensure_aligned(self.weights.len(), measurements.len())?;

        if checkpoints != self.checkpoints.as_slice() {
            log::debug!(
                "{}: evaluating at {:?} instead of the configured {:?}",
                self.name,
                checkpoints,
                self.checkpoints
            );
        }

        let score: f64 = self
            .weights
            .iter()
            .zip(measurements)
            .map(|(w, eta)| w * eta)
            .sum();

        Ok(WeightedEfficiency {
            name: self.name.clone(),
            checkpoints: checkpoints.to_vec(),
            measurements: measurements.to_vec(),
            weights: self.weights.clone(),
            score,
        })
    }
}

impl CertificationMask {
    /// Compares a measured efficiency curve against this mask at the mask's
    /// load levels. The measured curve is read piecewise-linearly and held at
    /// its end values outside the measured load range.
    pub fn check(
        &self,
        load_levels: &[f64],
        measured: &[f64],
    ) -> Result<ComplianceReport, ValidationError> {
        ensure_aligned(load_levels.len(), measured.len())?;
        if load_levels.is_empty() {
            return Err(ValidationError::MalformedTable(
                "measured curve is empty".to_string(),
            ));
        }
        ensure_increasing(load_levels, "measured load levels")?;

        let resampled = if load_levels.len() == 1 {
            vec![measured[0]; self.load_levels.len()]
        } else {
            interp_slice(load_levels, measured, &self.load_levels, &InterpMode::FirstLast)
        };

        let points: Vec<CompliancePoint> = self
            .load_levels
            .iter()
            .zip(&self.minimum_efficiency)
            .zip(resampled)
            .map(|((&load, &required), measured)| CompliancePoint {
                load,
                required,
                measured,
                margin: measured - required,
            })
            .collect();
        let passed = points.iter().all(|p| p.margin >= 0.0);

        if passed {
            log::info!("{}: passed", self.name);
        } else {
            for p in points.iter().filter(|p| p.margin < 0.0) {
                log::info!(
                    "{}: {:.1}% below minimum at {}% load ({:.1}% < {:.1}%)",
                    self.name,
                    -p.margin * 100.0,
                    p.load,
                    p.measured * 100.0,
                    p.required * 100.0
                );
            }
        }

        Ok(ComplianceReport {
            certification: self.name.clone(),
            points,
            passed,
        })
    }
}
