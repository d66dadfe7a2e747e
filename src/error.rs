use std::error::Error;
use std::fmt;

/// Rejected input to a profile, mask or certification check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Aligned sequences of different lengths.
    LengthMismatch { expected: usize, found: usize },
    /// Query frequency that has no logarithm.
    NonPositiveFrequency(f64),
    /// A table that breaks its own invariants (ordering, ranges, emptiness).
    MalformedTable(String),
    UnsupportedClass(u8),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::LengthMismatch { expected, found } => write!(
                f,
                "length mismatch: expected {} values, found {}",
                expected, found
            ),
            ValidationError::NonPositiveFrequency(freq) => {
                write!(f, "frequency must be positive, got {} Hz", freq)
            }
            ValidationError::MalformedTable(reason) => write!(f, "malformed table: {}", reason),
            ValidationError::UnsupportedClass(class) => {
                write!(f, "no limit table defined for EMC class {}", class)
            }
        }
    }
}

impl Error for ValidationError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    UnknownStandard(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownStandard(name) => write!(f, "unknown standard: {}", name),
        }
    }
}

impl Error for CatalogError {}
