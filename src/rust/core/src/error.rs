// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Error taxonomy for the sieve analysis pipeline.
//!
//! Every fatal condition aborts only the derived value it affects. The
//! classifier stores these as per-field markers, so the enum is serializable
//! and travels to the host alongside partial results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum GradationError {
    #[error("unrecognised sieve label: {0:?}")]
    InvalidLabel(String),
    #[error("invalid reading at {aperture_mm} mm: {reason}")]
    InvalidReading { aperture_mm: f64, reason: String },
    #[error("at least {required} readings required, got {got}")]
    TooFewReadings { got: usize, required: usize },
    #[error("total retained mass must be positive, got {0} g")]
    EmptySample(f64),
    #[error("duplicate aperture: {0} mm")]
    DuplicateAperture(f64),
    #[error("insufficient data: {distinct} distinct passing value(s), need at least 2")]
    InsufficientData { distinct: usize },
    #[error("degenerate interval at {percent}% passing: bracketing points share the same passing value")]
    DegenerateInterval { percent: f64 },
    #[error("division by zero: {0} is zero")]
    DivisionByZero(String),
    #[error("non-physical diameter: D{percent} extrapolates to {aperture_mm} mm")]
    NonPhysicalDiameter { percent: f64, aperture_mm: f64 },
    #[error("reference sieve {0} mm missing from the dataset")]
    ReferenceSieveMissing(f64),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for GradationError {
    fn from(e: serde_json::Error) -> Self {
        GradationError::InvalidInput(e.to_string())
    }
}

impl GradationError {
    /// Short machine-readable code, used as the event topic suffix.
    pub fn code(&self) -> &'static str {
        match self {
            GradationError::InvalidLabel(_) => "INVALID_LABEL",
            GradationError::InvalidReading { .. } => "INVALID_READING",
            GradationError::TooFewReadings { .. } => "TOO_FEW_READINGS",
            GradationError::EmptySample(_) => "EMPTY_SAMPLE",
            GradationError::DuplicateAperture(_) => "DUPLICATE_APERTURE",
            GradationError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            GradationError::DegenerateInterval { .. } => "DEGENERATE_INTERVAL",
            GradationError::DivisionByZero(_) => "DIVISION_BY_ZERO",
            GradationError::NonPhysicalDiameter { .. } => "NON_PHYSICAL_DIAMETER",
            GradationError::ReferenceSieveMissing(_) => "REFERENCE_SIEVE_MISSING",
            GradationError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

pub type GradationResult<T> = Result<T, GradationError>;
