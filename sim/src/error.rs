//! Construction-time errors.
//!
//! Nothing in here is ever produced by the per-tick update. The tick degrades
//! to explicit fallbacks instead (flat ground, skipped wall test, and so on).

use thiserror::Error;

/// Errors raised while building geometry or validating configuration.
#[derive(Debug, Error)]
pub enum SimError {
    /// A triangle mesh collider could not be built from the supplied data.
    #[error("collider {id}: invalid triangle mesh: {reason}")]
    InvalidMesh { id: u64, reason: String },

    /// A tuning parameter is out of its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

impl SimError {
    pub(crate) fn param(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidParameter { name, reason }
    }
}

/// Require a strictly positive, finite value.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), SimError> {
    if !value.is_finite() {
        return Err(SimError::param(name, "must be finite"));
    }
    if value <= 0.0 {
        return Err(SimError::param(name, "must be greater than zero"));
    }
    Ok(())
}

/// Require a fraction in `[0, 1]`.
pub(crate) fn ensure_fraction(name: &'static str, value: f32) -> Result<(), SimError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::param(name, "must be within [0, 1]"));
    }
    Ok(())
}
