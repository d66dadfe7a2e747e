//! Weighted converter efficiency, 80 PLUS compliance and conducted-emission
//! limit masks.

pub mod catalog;
pub mod config;
pub mod efficiency;
pub mod emc;
pub mod error;
pub mod export;

pub mod domain {
    pub mod types;
}

pub use domain::types::{
    CertificationMask, ComplianceReport, Detector, DetectorLimit, EfficiencyProfile, LimitCurve,
    LimitMask, LimitQuery, WeightedEfficiency,
};
pub use error::{CatalogError, ValidationError};
