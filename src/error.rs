//! Error types for the simulation core.
//!
//! Only rejected input is an error. Unknown ids are reported as `false`/`None`
//! and integration problems are corrected in place and counted in
//! [`Diagnostics`](crate::sim::Diagnostics).

use crate::entities::ParticleId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} out of range: {value} ({expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("unknown particle: {0}")]
    UnknownParticle(ParticleId),

    #[error("a bond needs two distinct particles, got {0} twice")]
    SelfBond(ParticleId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::NonFinite { field, value })
    }
}

/// Reject non-finite values and anything `<= 0`.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::OutOfRange {
            field,
            value,
            expected: "> 0",
        })
    }
}

/// Reject non-finite values and anything `< 0`.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::OutOfRange {
            field,
            value,
            expected: ">= 0",
        })
    }
}
