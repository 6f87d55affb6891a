//! Error types for layout computation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// A box exterior dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Depth,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Width => "width",
            Dimension::Depth => "depth",
            Dimension::Height => "height",
        })
    }
}

/// Coarse error class surfaced to callers so they can decide between
/// blocking export and keeping the last good preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    DimensionConflict,
    GeometryFailure,
}

/// Errors raised before any geometry is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Parameters that cannot produce a layout.
    #[error("{subject}: {reason}")]
    InvalidInput { subject: String, reason: String },

    /// A stack references a custom shape that is not defined.
    #[error("{subject}: shape '{shape}' is not defined")]
    ShapeNotFound { subject: String, shape: String },

    /// A custom exterior dimension is smaller than the packed minimum.
    #[error("{subject}: custom {dimension} {requested}mm is below the minimum {minimum}mm")]
    DimensionConflict {
        subject: String,
        dimension: Dimension,
        requested: f64,
        minimum: f64,
    },
}

impl LayoutError {
    pub fn invalid(subject: &str, reason: impl Into<String>) -> Self {
        LayoutError::InvalidInput {
            subject: subject.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::InvalidInput { .. } | LayoutError::ShapeNotFound { .. } => {
                ErrorKind::InvalidInput
            }
            LayoutError::DimensionConflict { .. } => ErrorKind::DimensionConflict,
        }
    }
}

/// Name used in error messages for an unnamed tray or box.
pub fn subject_name(kind: &str, name: &str) -> String {
    if name.trim().is_empty() {
        format!("{kind} (unnamed)")
    } else {
        format!("{kind} '{name}'")
    }
}

/// Reject non-finite and non-positive values.
pub(crate) fn require_positive(subject: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid(
            subject,
            format!("{field} must be positive, got {value}"),
        ))
    }
}

/// Reject non-finite and negative values.
pub(crate) fn require_non_negative(subject: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid(
            subject,
            format!("{field} must not be negative, got {value}"),
        ))
    }
}
