// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Scalar Gradation Formulas
//!
//! Pure mathematical functions operating on scalar values. The pipeline in
//! `science` guards their preconditions and reports typed errors; the WASM
//! exports return `NaN` when a denominator vanishes so a host can never
//! mistake a degenerate input for a real zero.
//!
//! References:
//! - IS 2720 (Part 4): Grain size analysis of soils
//! - IS 383: Coarse and fine aggregate grading zones
//! - ASTM D2487: Cu / Cc gradation criteria

use wasm_bindgen::prelude::*;

// ============================================================================
// GRADATION SHAPE
// ============================================================================

/// Uniformity coefficient
///
/// Cu = D60 / D10
#[wasm_bindgen]
pub fn uniformity_coefficient(d10: f64, d60: f64) -> f64 {
    if d10 == 0.0 {
        return f64::NAN;
    }
    d60 / d10
}

/// Coefficient of curvature (coefficient of gradation)
///
/// Cc = D30² / (D10 · D60)
#[wasm_bindgen]
pub fn curvature_coefficient(d10: f64, d30: f64, d60: f64) -> f64 {
    let denom = d10 * d60;
    if denom == 0.0 {
        return f64::NAN;
    }
    d30 * d30 / denom
}

/// Well-graded test: `Cu >= cu_min` and `cc_min <= Cc <= cc_max`.
#[wasm_bindgen]
pub fn is_well_graded(cu: f64, cc: f64, cu_min: f64, cc_min: f64, cc_max: f64) -> bool {
    cu >= cu_min && cc >= cc_min && cc <= cc_max
}

// ============================================================================
// AGGREGATE GRADING
// ============================================================================

/// Fineness modulus: sum of the percent-passing column divided by 100.
#[wasm_bindgen]
pub fn fineness_modulus(percent_passing: &[f64]) -> f64 {
    percent_passing.iter().sum::<f64>() / 100.0
}

/// Zone number (1-4) for a fineness modulus.
///
/// < 2.5 → I, [2.5, 3.0] → II, (3.0, 3.5] → III, > 3.5 → IV
#[wasm_bindgen]
pub fn fineness_zone(fm: f64) -> u8 {
    if fm < 2.5 {
        1
    } else if fm <= 3.0 {
        2
    } else if fm <= 3.5 {
        3
    } else {
        4
    }
}

// ============================================================================
// SAMPLE HELPERS
// ============================================================================

/// Share of `mass` in `total`, as a percentage.
#[wasm_bindgen]
pub fn percent_of_total(mass: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return f64::NAN;
    }
    mass * 100.0 / total
}

/// Linear interpolation of `y` at `x` on the line through (x0, y0) and (x1, y1).
///
/// Also extrapolates when `x` lies outside [x0, x1]. Returns `NaN` for a
/// vertical segment (x0 == x1).
#[wasm_bindgen]
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let span = x1 - x0;
    if span == 0.0 {
        return f64::NAN;
    }
    y0 + (y1 - y0) * (x - x0) / span
}

// ============================================================================
// TESTS
// ============================================================================
