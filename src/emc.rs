use interp::{interp, InterpMode};
use strum::IntoEnumIterator;

use crate::domain::types::{Detector, DetectorLimit, LimitCurve, LimitMask, LimitQuery};
use crate::error::ValidationError;

/// dBµV of 1 V.
pub const DBUV_PER_VOLT: f64 = 120.0;

pub fn dbuv_to_volts(dbuv: f64) -> f64 {
    10f64.powf((dbuv - DBUV_PER_VOLT) / 20.0)
}

pub fn volts_to_dbuv(volts: f64) -> f64 {
    20.0 * volts.log10() + DBUV_PER_VOLT
}

/// `points` frequencies evenly spaced in log10 between `start_hz` and `stop_hz`, both included.
pub fn log_spaced(start_hz: f64, stop_hz: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start_hz],
        _ => {
            let (lo, hi) = (start_hz.log10(), stop_hz.log10());
            let step = (hi - lo) / (points - 1) as f64;
            (0..points)
                .map(|i| match i {
                    0 => start_hz,
                    i if i == points - 1 => stop_hz,
                    i => 10f64.powf(lo + step * i as f64),
                })
                .collect()
        }
    }
}

fn ensure_positive(frequency_hz: f64) -> Result<(), ValidationError> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveFrequency(frequency_hz))
    }
}

impl LimitCurve {
    /// Limit in dBµV at a positive frequency, linear in log10(f) between
    /// breakpoints and held at the end values outside the table.
    pub fn level_at(&self, frequency_hz: f64) -> f64 {
        let log_f = frequency_hz.log10();
        if let Some(i) = self.log_frequencies.iter().position(|&x| x == log_f) {
            return self.limits_dbuv[i];
        }
        if self.limits_dbuv.len() == 1 {
            return self.limits_dbuv[0];
        }
        interp(
            &self.log_frequencies,
            &self.limits_dbuv,
            log_f,
            &InterpMode::FirstLast,
        )
    }
}

impl LimitMask {
    pub fn interpolate(&self, frequency_hz: f64) -> Result<LimitQuery, ValidationError> {
        ensure_positive(frequency_hz)?;
        Ok(LimitQuery {
            frequency_hz,
            average: self.detector_limit(Detector::Average, frequency_hz, true),
            quasi_peak: self.detector_limit(Detector::QuasiPeak, frequency_hz, true),
            peak: self.detector_limit(Detector::Peak, frequency_hz, true),
        })
    }

    /// Interpolates every frequency. Missing detectors are reported once, not per point.
    pub fn sample(&self, frequencies_hz: &[f64]) -> Result<Vec<LimitQuery>, ValidationError> {
        for &f in frequencies_hz {
            ensure_positive(f)?;
        }
        for detector in Detector::iter().filter(|d| self.curve(*d).is_none()) {
            log::warn!("{}: no {} limit available for this standard", self.name, detector);
        }
        Ok(frequencies_hz
            .iter()
            .map(|&f| LimitQuery {
                frequency_hz: f,
                average: self.detector_limit(Detector::Average, f, false),
                quasi_peak: self.detector_limit(Detector::QuasiPeak, f, false),
                peak: self.detector_limit(Detector::Peak, f, false),
            })
            .collect())
    }

    /// Headroom `limit - measured` in dB, `None` when the detector has no curve.
    pub fn margin_db(
        &self,
        frequency_hz: f64,
        detector: Detector,
        measured_dbuv: f64,
    ) -> Result<Option<f64>, ValidationError> {
        ensure_positive(frequency_hz)?;
        Ok(self
            .curve(detector)
            .map(|curve| curve.level_at(frequency_hz) - measured_dbuv))
    }

    /// First and last frequency of the average curve.
    pub fn frequency_range(&self) -> (f64, f64) {
        let f = &self.average.frequencies_hz;
        (f[0], f[f.len() - 1])
    }

    pub fn detectors(&self) -> Vec<Detector> {
        Detector::iter().filter(|d| self.curve(*d).is_some()).collect()
    }

    fn detector_limit(&self, detector: Detector, frequency_hz: f64, warn: bool) -> DetectorLimit {
        match self.curve(detector) {
            Some(curve) => {
                let dbuv = curve.level_at(frequency_hz);
                DetectorLimit {
                    dbuv,
                    volts: dbuv_to_volts(dbuv),
                    available: true,
                }
            }
            None => {
                if warn {
                    log::warn!("{}: no {} limit available for this standard", self.name, detector);
                }
                DetectorLimit::missing()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ac_like_mask() -> LimitMask {
        let f = vec![0.15e6, 0.5e6, 0.5e6 + 1.0, 5e6, 5e6 + 1.0, 30e6];
        let avg = LimitCurve::new(f.clone(), vec![56.0, 46.0, 46.0, 46.0, 50.0, 50.0]).unwrap();
        let qp = LimitCurve::new(f, vec![66.0, 56.0, 56.0, 56.0, 60.0, 60.0]).unwrap();
        LimitMask::new("AC test", avg, Some(qp), None)
    }

    #[test]
    fn breakpoint_returns_exact_table_value() {
        let mask = ac_like_mask();
        let q = mask.interpolate(0.15e6).unwrap();
        assert_eq!(q.average.dbuv, 56.0);
        assert_eq!(q.quasi_peak.dbuv, 66.0);
        assert_eq!(q.average.volts, 10f64.powf((56.0 - 120.0) / 20.0));

        let q = mask.interpolate(5e6 + 1.0).unwrap();
        assert_eq!(q.average.dbuv, 50.0);
        assert_eq!(q.quasi_peak.dbuv, 60.0);
    }

    #[test]
    fn outside_table_clamps_to_end_values() {
        let mask = ac_like_mask();
        let below = mask.interpolate(9e3).unwrap();
        assert_eq!(below.average.dbuv, 56.0);
        assert_eq!(below.quasi_peak.dbuv, 66.0);
        let above = mask.interpolate(1e9).unwrap();
        assert_eq!(above.average.dbuv, 50.0);
        assert_eq!(above.quasi_peak.dbuv, 60.0);
    }

    #[test]
    fn between_breakpoints_is_linear_in_log_frequency() {
        let mask = ac_like_mask();
        // geometric midpoint of 150 kHz and 500 kHz sits halfway in log space
        let mid = (0.15e6f64 * 0.5e6).sqrt();
        let q = mask.interpolate(mid).unwrap();
        assert!((q.average.dbuv - 51.0).abs() < 1e-9);
        assert!((q.quasi_peak.dbuv - 61.0).abs() < 1e-9);

        let q = mask.interpolate(0.3e6).unwrap();
        assert!(q.average.dbuv < 56.0 && q.average.dbuv > 46.0);
        // log interpolation drops faster than a linear-frequency one would
        let linear_in_f = 56.0 + (46.0 - 56.0) * (0.3e6 - 0.15e6) / (0.5e6 - 0.15e6);
        assert!(q.average.dbuv < linear_in_f);
    }

    #[test]
    fn missing_detector_is_zero_not_error() {
        let mask = ac_like_mask();
        let q = mask.interpolate(1e6).unwrap();
        assert!(!q.peak.available);
        assert_eq!(q.peak.volts, 0.0);
        assert_eq!(q.peak.dbuv, 0.0);
        let (_, _, pk, _, _, pk_dbuv) = q.as_tuple();
        assert_eq!((pk, pk_dbuv), (0.0, 0.0));
    }

    #[test]
    fn non_positive_frequency_is_rejected() {
        let mask = ac_like_mask();
        assert_eq!(
            mask.interpolate(0.0).unwrap_err(),
            ValidationError::NonPositiveFrequency(0.0)
        );
        assert!(mask.interpolate(-1e6).is_err());
        assert!(mask.interpolate(f64::NAN).is_err());
        assert!(mask.sample(&[1e6, -5.0]).is_err());
    }

    #[test]
    fn dbuv_volt_round_trip() {
        for dbuv in [0.0, 46.0, 66.5, 107.0, 120.0] {
            assert!((volts_to_dbuv(dbuv_to_volts(dbuv)) - dbuv).abs() < 1e-9);
        }
        assert!((dbuv_to_volts(120.0) - 1.0).abs() < 1e-15);
        assert!((dbuv_to_volts(0.0) - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn sample_matches_single_queries() {
        let mask = ac_like_mask();
        let freqs = log_spaced(0.15e6, 30e6, 25);
        let samples = mask.sample(&freqs).unwrap();
        assert_eq!(samples.len(), 25);
        for (s, f) in samples.iter().zip(&freqs) {
            assert_eq!(*s, mask.interpolate(*f).unwrap());
        }
    }

    #[test]
    fn log_spaced_hits_both_ends() {
        let f = log_spaced(1e3, 1e6, 4);
        assert_eq!(f[0], 1e3);
        assert_eq!(f[3], 1e6);
        assert!((f[1] - 1e4).abs() < 1e-6);
        assert!(log_spaced(1e3, 1e6, 0).is_empty());
    }

    #[test]
    fn margin_is_limit_minus_measurement() {
        let mask = ac_like_mask();
        let m = mask.margin_db(1e6, Detector::Average, 40.0).unwrap();
        assert_eq!(m, Some(6.0));
        assert_eq!(mask.margin_db(1e6, Detector::Peak, 40.0).unwrap(), None);
        assert_eq!(mask.detectors(), vec![Detector::Average, Detector::QuasiPeak]);
        assert_eq!(mask.frequency_range(), (0.15e6, 30e6));
    }
}
