// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// Gradation Table Computer: sorted cumulative-retained / percent-passing table.

use crate::error::{GradationError, GradationResult};
use crate::science::sieve::{SieveReading, MIN_READINGS};
use serde::Serialize;
use tracing::{debug, warn};

/// Apertures closer than this (mm) are the same sieve.
pub const APERTURE_EPS: f64 = 1e-9;

/// Slack for floating-point sums of retained percentages.
const CUMULATIVE_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradationRow {
    pub aperture_mm: f64,
    pub percent_retained: f64,
    pub cumulative_retained: f64,
    pub percent_passing: f64,
}

/// Non-fatal: cumulative retained overshot 100 %, so passing went negative.
/// The raw value is kept on the row.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub aperture_mm: f64,
    pub cumulative_retained: f64,
    pub percent_passing: f64,
    pub message: String,
}

/// One point of the PSD chart (log-scale aperture axis, descending).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub aperture_mm: f64,
    pub log10_aperture: f64,
    pub percent_passing: f64,
}

/// Rows ordered by aperture, largest first, plus the warnings raised while
/// accumulating them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GradationCurve {
    rows: Vec<GradationRow>,
    warnings: Vec<DataQualityWarning>,
}

impl GradationCurve {
    pub fn rows(&self) -> &[GradationRow] {
        &self.rows
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row nearest to `aperture_mm`, if one lies within `tolerance_mm`.
    pub fn row_at(&self, aperture_mm: f64, tolerance_mm: f64) -> Option<&GradationRow> {
        self.rows
            .iter()
            .map(|r| (r, (r.aperture_mm - aperture_mm).abs()))
            .filter(|(_, dist)| *dist <= tolerance_mm)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(r, _)| r)
    }

    pub fn passing_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.percent_passing).collect()
    }

    pub fn total_retained(&self) -> f64 {
        self.rows.last().map(|r| r.cumulative_retained).unwrap_or(0.0)
    }

    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.rows
            .iter()
            .map(|r| ChartPoint {
                aperture_mm: r.aperture_mm,
                log10_aperture: r.aperture_mm.log10(),
                percent_passing: r.percent_passing,
            })
            .collect()
    }
}

/// Builds the gradation table.
///
/// Sorts by aperture descending, rejects duplicate apertures, accumulates
/// retained percentages and derives `passing = 100 - cumulative`. Overshoot
/// past 100 % is reported through [`DataQualityWarning`], never clamped.
pub fn compute_gradation(readings: &[SieveReading]) -> GradationResult<GradationCurve> {
    if readings.len() < MIN_READINGS {
        return Err(GradationError::TooFewReadings {
            got: readings.len(),
            required: MIN_READINGS,
        });
    }
    for r in readings {
        r.validate()?;
    }

    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.aperture_mm.total_cmp(&a.aperture_mm));

    if let Some(pair) = sorted
        .windows(2)
        .find(|w| (w[0].aperture_mm - w[1].aperture_mm).abs() <= APERTURE_EPS)
    {
        return Err(GradationError::DuplicateAperture(pair[0].aperture_mm));
    }

    let mut rows = Vec::with_capacity(sorted.len());
    let mut warnings = Vec::new();
    let mut cumulative = 0.0;

    for reading in &sorted {
        cumulative += reading.percent_retained;
        let passing = 100.0 - cumulative;

        if cumulative > 100.0 + CUMULATIVE_EPS {
            let warning = DataQualityWarning {
                aperture_mm: reading.aperture_mm,
                cumulative_retained: cumulative,
                percent_passing: passing,
                message: format!(
                    "cumulative retained {:.2}% exceeds 100% at {} mm (passing {:.2}%)",
                    cumulative, reading.aperture_mm, passing
                ),
            };
            warn!(
                aperture_mm = reading.aperture_mm,
                cumulative_retained = cumulative,
                "{}",
                warning.message
            );
            warnings.push(warning);
        }

        rows.push(GradationRow {
            aperture_mm: reading.aperture_mm,
            percent_retained: reading.percent_retained,
            cumulative_retained: cumulative,
            percent_passing: passing,
        });
    }

    debug!(
        rows = rows.len(),
        total_retained = cumulative,
        warnings = warnings.len(),
        "gradation table computed"
    );

    Ok(GradationCurve { rows, warnings })
}
