// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// Gradation Interpolator: aperture size at a target percent passing (Dx).

use crate::error::{GradationError, GradationResult};
use crate::formulas::lerp;
use crate::science::gradation::GradationCurve;
use serde::Serialize;
use tracing::debug;

/// Passing values closer than this are the same ordinate.
const PASSING_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interpolated {
    pub target_percent: f64,
    pub aperture_mm: f64,
    /// Target lay outside the observed passing range.
    pub extrapolated: bool,
}

/// Aperture at which the curve crosses `target_percent` passing.
///
/// Works on the inverse mapping passing → aperture, points ordered by
/// ascending passing. Between points the result is piecewise linear; beyond
/// the observed range the outermost segment is extended and the result is
/// flagged as extrapolated.
pub fn interpolate_passing(curve: &GradationCurve, target_percent: f64) -> GradationResult<Interpolated> {
    if !target_percent.is_finite() {
        return Err(GradationError::InvalidInput(format!(
            "target percent {} is not finite",
            target_percent
        )));
    }

    // Rows run largest aperture first, so reversing gives ascending passing.
    let points: Vec<(f64, f64)> = curve
        .rows()
        .iter()
        .rev()
        .map(|r| (r.percent_passing, r.aperture_mm))
        .collect();

    let distinct = count_distinct(points.iter().map(|p| p.0));
    if distinct < 2 {
        return Err(GradationError::InsufficientData { distinct });
    }

    let degenerate = || GradationError::DegenerateInterval {
        percent: target_percent,
    };

    // Exact hit on a recorded point.
    let hits: Vec<&(f64, f64)> = points
        .iter()
        .filter(|p| (p.0 - target_percent).abs() <= PASSING_EPS)
        .collect();
    match hits.as_slice() {
        [] => {}
        [(_, aperture)] => {
            return Ok(Interpolated {
                target_percent,
                aperture_mm: *aperture,
                extrapolated: false,
            })
        }
        // Plateau: several apertures share this passing value.
        _ => return Err(degenerate()),
    }

    let n = points.len();
    let (lo, hi, extrapolated) = if target_percent < points[0].0 {
        (points[0], points[1], true)
    } else if target_percent > points[n - 1].0 {
        (points[n - 2], points[n - 1], true)
    } else {
        match points
            .windows(2)
            .find(|w| w[0].0 < target_percent && target_percent < w[1].0)
        {
            Some(w) => (w[0], w[1], false),
            None => return Err(degenerate()),
        }
    };

    if (hi.0 - lo.0).abs() <= PASSING_EPS {
        return Err(degenerate());
    }

    let aperture_mm = lerp(lo.0, lo.1, hi.0, hi.1, target_percent);
    debug!(
        target_percent,
        aperture_mm, extrapolated, "interpolated passing curve"
    );

    Ok(Interpolated {
        target_percent,
        aperture_mm,
        extrapolated,
    })
}

/// Evaluates several targets independently; each keeps its own result.
pub fn interpolate_many(
    curve: &GradationCurve,
    targets: &[f64],
) -> Vec<GradationResult<Interpolated>> {
    targets
        .iter()
        .map(|&p| interpolate_passing(curve, p))
        .collect()
}

fn count_distinct(values: impl Iterator<Item = f64>) -> usize {
    let mut seen: Vec<f64> = Vec::new();
    for v in values {
        if !seen.iter().any(|s| (s - v).abs() <= PASSING_EPS) {
            seen.push(v);
        }
    }
    seen.len()
}
