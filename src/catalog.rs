//! Named standards and certifications as literal tables.
//!
//! Each enum's string form is the standard's display name; `FromStr` also
//! accepts a short alias, case-insensitively.

use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::domain::types::{
    CertificationMask, EfficiencyProfile, LimitCurve, LimitMask,
};
use crate::error::{CatalogError, ValidationError};

const SOLAR_LOAD_POINTS: [f64; 7] = [5.0, 10.0, 20.0, 30.0, 50.0, 75.0, 100.0];
const SOLAR_CEC_WEIGHTS: [f64; 7] = [0.0, 0.04, 0.05, 0.12, 0.21, 0.53, 0.05];
const SOLAR_EU_WEIGHTS: [f64; 7] = [0.03, 0.06, 0.13, 0.10, 0.48, 0.0, 0.20];

const EIGHTY_PLUS_LOADS: [f64; 3] = [20.0, 50.0, 100.0];

/// Inverter weighted-efficiency tables, % of rated output power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum WeightingStandard {
    #[strum(to_string = "Solar CEC Weighted Efficiency", serialize = "cec")]
    SolarCec,
    #[strum(to_string = "Solar EU Weighted Efficiency", serialize = "eu")]
    SolarEu,
}

impl WeightingStandard {
    pub fn profile(&self) -> EfficiencyProfile {
        let weights = match self {
            WeightingStandard::SolarCec => SOLAR_CEC_WEIGHTS,
            WeightingStandard::SolarEu => SOLAR_EU_WEIGHTS,
        };
        EfficiencyProfile {
            name: self.to_string(),
            checkpoints: SOLAR_LOAD_POINTS.to_vec(),
            weights: weights.to_vec(),
        }
    }
}

/// 80 PLUS tiers in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum EightyPlus {
    #[strum(to_string = "80 PLUS Standard", serialize = "standard")]
    Standard,
    #[strum(to_string = "80 PLUS Bronze", serialize = "bronze")]
    Bronze,
    #[strum(to_string = "80 PLUS Silver", serialize = "silver")]
    Silver,
    #[strum(to_string = "80 PLUS Gold", serialize = "gold")]
    Gold,
    #[strum(to_string = "80 PLUS Platinum", serialize = "platinum")]
    Platinum,
    #[strum(to_string = "80 PLUS Titanium", serialize = "titanium")]
    Titanium,
}

impl EightyPlus {
    pub fn mask(&self) -> CertificationMask {
        let minimum_efficiency = match self {
            EightyPlus::Standard => [0.80, 0.80, 0.80],
            EightyPlus::Bronze => [0.82, 0.85, 0.82],
            EightyPlus::Silver => [0.85, 0.88, 0.85],
            EightyPlus::Gold => [0.87, 0.90, 0.87],
            EightyPlus::Platinum => [0.90, 0.92, 0.89],
            EightyPlus::Titanium => [0.90, 0.92, 0.94],
        };
        CertificationMask {
            name: self.to_string(),
            load_levels: EIGHTY_PLUS_LOADS.to_vec(),
            minimum_efficiency: minimum_efficiency.to_vec(),
        }
    }

    /// Last tier, in catalog order, that the measured curve satisfies.
    pub fn highest_passed(
        load_levels: &[f64],
        measured: &[f64],
    ) -> Result<Option<EightyPlus>, ValidationError> {
        let mut best = None;
        for tier in EightyPlus::iter() {
            if tier.mask().check(load_levels, measured)?.passed {
                best = Some(tier);
            }
        }
        Ok(best)
    }
}

/// Conducted-emission limit tables, frequencies in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum EmcStandard {
    #[strum(to_string = "ECE_R10_2012_AC_lines", serialize = "ece-r10-ac")]
    EceR10AcLines,
    #[strum(to_string = "ECE_R10_2012_DC_lines", serialize = "ece-r10-dc")]
    EceR10DcLines,
    #[strum(to_string = "TL_81000_2018_03_AN", serialize = "tl81000")]
    Tl81000,
}

pub const TL81000_DEFAULT_CLASS: u8 = 5;

impl EmcStandard {
    pub fn mask(&self) -> LimitMask {
        match self {
            EmcStandard::EceR10AcLines => ece_r10_ac_lines(),
            EmcStandard::EceR10DcLines => ece_r10_dc_lines(),
            EmcStandard::Tl81000 => tl81000_baseline(),
        }
    }

    /// Like [`EmcStandard::mask`], selecting the curve set for `emc_class`
    /// where the standard distinguishes classes.
    pub fn mask_for_class(&self, emc_class: u8) -> Result<LimitMask, ValidationError> {
        match self {
            EmcStandard::Tl81000 => tl81000(emc_class),
            _ => Ok(self.mask()),
        }
    }
}

fn curve(frequencies_hz: &[f64], limits_dbuv: &[f64]) -> LimitCurve {
    LimitCurve {
        frequencies_hz: frequencies_hz.to_vec(),
        limits_dbuv: limits_dbuv.to_vec(),
        log_frequencies: frequencies_hz.iter().map(|f| f.log10()).collect(),
    }
}

fn ece_r10_ac_lines() -> LimitMask {
    let f = [0.15e6, 0.5e6, 0.5e6 + 1.0, 5e6, 5e6 + 1.0, 30e6];
    LimitMask::new(
        EmcStandard::EceR10AcLines.to_string(),
        curve(&f, &[56.0, 46.0, 46.0, 46.0, 50.0, 50.0]),
        Some(curve(&f, &[66.0, 56.0, 56.0, 56.0, 60.0, 60.0])),
        None,
    )
    .with_document("UN ECE R10 (2012), Table 9: conducted disturbances on AC power lines")
}

fn ece_r10_dc_lines() -> LimitMask {
    let f = [0.15e6, 0.5e6, 0.5e6 + 1.0, 30e6];
    LimitMask::new(
        EmcStandard::EceR10DcLines.to_string(),
        curve(&f, &[66.0, 66.0, 60.0, 60.0]),
        Some(curve(&f, &[79.0, 79.0, 66.0, 66.0])),
        None,
    )
    .with_document("UN ECE R10 (2012), Table 10: conducted disturbances on DC power lines")
}

fn tl81000_baseline() -> LimitMask {
    let f = [0.15e6, 0.52e6, 0.52e6 + 1.0, 30e6, 30e6 + 1.0, 108e6];
    LimitMask::new(
        EmcStandard::Tl81000.to_string(),
        curve(&f, &[97.0, 65.0, 65.0, 65.0, 55.0, 55.0]),
        None,
        Some(curve(&f, &[107.0, 75.0, 75.0, 75.0, 65.0, 65.0])),
    )
    .with_document("TL 81000 (2018-03), conducted emission baseline on DC power lines")
}

/// TL 81000 conducted-emission baseline. Classes 3 to 5 share one table.
pub fn tl81000(emc_class: u8) -> Result<LimitMask, ValidationError> {
    match emc_class {
        3..=5 => Ok(tl81000_baseline()),
        other => Err(ValidationError::UnsupportedClass(other)),
    }
}

pub fn weighting_profile(name: &str) -> Result<EfficiencyProfile, CatalogError> {
    WeightingStandard::from_str(name)
        .map(|s| s.profile())
        .map_err(|_| CatalogError::UnknownStandard(name.to_string()))
}

pub fn certification(name: &str) -> Result<CertificationMask, CatalogError> {
    EightyPlus::from_str(name)
        .map(|c| c.mask())
        .map_err(|_| CatalogError::UnknownStandard(name.to_string()))
}

pub fn limit_mask(name: &str) -> Result<LimitMask, CatalogError> {
    EmcStandard::from_str(name)
        .map(|s| s.mask())
        .map_err(|_| CatalogError::UnknownStandard(name.to_string()))
}
