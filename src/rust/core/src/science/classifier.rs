// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// Gradation Classifier: D-values, Cu/Cc, grading verdict, fine/coarse split,
// fineness modulus and zone.

use crate::error::{GradationError, GradationResult};
use crate::formulas::{
    curvature_coefficient, fineness_modulus, fineness_zone, is_well_graded,
    uniformity_coefficient,
};
use crate::science::gradation::{DataQualityWarning, GradationCurve};
use crate::science::interpolation::{interpolate_passing, Interpolated};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use wasm_bindgen::prelude::*;

/// Diameters with magnitude below this are treated as zero.
const DIAMETER_EPS: f64 = 1e-12;

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Soil = 0,
    Aggregate = 1,
}

impl Default for MaterialKind {
    fn default() -> Self {
        MaterialKind::Soil
    }
}

impl FromStr for MaterialKind {
    type Err = GradationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soil" => Ok(MaterialKind::Soil),
            "aggregate" | "aggregates" => Ok(MaterialKind::Aggregate),
            other => Err(GradationError::InvalidInput(format!(
                "unknown material kind {:?} (expected soil or aggregate)",
                other
            ))),
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::Soil => write!(f, "soil"),
            MaterialKind::Aggregate => write!(f, "aggregate"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GradingVerdict {
    WellGraded,
    PoorlyGraded,
}

impl GradingVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            GradingVerdict::WellGraded => "well graded",
            GradingVerdict::PoorlyGraded => "poorly graded",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Texture {
    FineGrained,
    CoarseGrained,
}

/// Fine/coarse verdict with the passing value it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureVerdict {
    pub texture: Texture,
    pub percent_passing: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Zone {
    I,
    II,
    III,
    IV,
}

impl Zone {
    pub fn from_fineness_modulus(fm: f64) -> Zone {
        match fineness_zone(fm) {
            1 => Zone::I,
            2 => Zone::II,
            3 => Zone::III,
            _ => Zone::IV,
        }
    }
}

/// Thresholds used by [`classify_with`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradingCriteria {
    pub reference_sieve_mm: f64,
    pub aperture_tolerance_mm: f64,
    /// Passing at the reference sieve above this is fine grained.
    pub fine_passing_threshold: f64,
    // One Cu threshold for sand and gravel alike.
    pub well_graded_min_cu: f64,
    pub cc_min: f64,
    pub cc_max: f64,
}

impl Default for GradingCriteria {
    fn default() -> Self {
        Self {
            reference_sieve_mm: 4.75,
            aperture_tolerance_mm: 1e-6,
            fine_passing_threshold: 50.0,
            well_graded_min_cu: 4.0,
            cc_min: 1.0,
            cc_max: 3.0,
        }
    }
}

/// Derived gradation statistics. Every field holds either its value or the
/// error that blocked it, so one failure never hides the others.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradationSummary {
    pub material: MaterialKind,
    pub d10: GradationResult<Interpolated>,
    pub d30: GradationResult<Interpolated>,
    pub d60: GradationResult<Interpolated>,
    pub cu: GradationResult<f64>,
    pub cc: GradationResult<f64>,
    /// Soil only.
    pub grading: Option<GradationResult<GradingVerdict>>,
    pub texture: GradationResult<TextureVerdict>,
    /// Aggregate only.
    pub fineness_modulus: Option<f64>,
    pub zone: Option<Zone>,
    pub warnings: Vec<DataQualityWarning>,
}

impl GradationSummary {
    /// D-values that came from extrapolation.
    pub fn extrapolated(&self) -> Vec<&Interpolated> {
        [&self.d10, &self.d30, &self.d60]
            .into_iter()
            .filter_map(|d| d.as_ref().ok())
            .filter(|d| d.extrapolated)
            .collect()
    }
}

pub fn classify(curve: &GradationCurve, material: MaterialKind) -> GradationSummary {
    classify_with(curve, material, &GradingCriteria::default())
}

pub fn classify_with(
    curve: &GradationCurve,
    material: MaterialKind,
    criteria: &GradingCriteria,
) -> GradationSummary {
    let d10 = interpolate_passing(curve, 10.0);
    let d30 = interpolate_passing(curve, 30.0);
    let d60 = interpolate_passing(curve, 60.0);

    let (cu, cc) = shape_coefficients(&d10, &d30, &d60);

    let grading = match material {
        MaterialKind::Soil => Some(grading_verdict(&cu, &cc, criteria)),
        MaterialKind::Aggregate => None,
    };

    let texture = texture_verdict(curve, criteria);

    let (fm, zone) = match material {
        MaterialKind::Aggregate => {
            let fm = fineness_modulus(&curve.passing_values());
            (Some(fm), Some(Zone::from_fineness_modulus(fm)))
        }
        MaterialKind::Soil => (None, None),
    };

    debug!(
        %material,
        cu = ?cu.as_ref().ok(),
        cc = ?cc.as_ref().ok(),
        fineness_modulus = ?fm,
        "gradation classified"
    );

    GradationSummary {
        material,
        d10,
        d30,
        d60,
        cu,
        cc,
        grading,
        texture,
        fineness_modulus: fm,
        zone,
        warnings: curve.warnings().to_vec(),
    }
}

/// Cu = D60/D10 and Cc = D30²/(D10·D60). A failed D-value passes its error on.
pub fn shape_coefficients(
    d10: &GradationResult<Interpolated>,
    d30: &GradationResult<Interpolated>,
    d60: &GradationResult<Interpolated>,
) -> (GradationResult<f64>, GradationResult<f64>) {
    let d10 = checked_diameter(d10, "D10", true);
    let d30 = checked_diameter(d30, "D30", false);
    let d60 = checked_diameter(d60, "D60", true);

    let cu = d10
        .clone()
        .and_then(|d10| d60.clone().map(|d60| uniformity_coefficient(d10, d60)));
    let cc = d10.and_then(|d10| {
        let d30 = d30?;
        let d60 = d60?;
        Ok(curvature_coefficient(d10, d30, d60))
    });
    (cu, cc)
}

fn checked_diameter(
    d: &GradationResult<Interpolated>,
    name: &str,
    divisor: bool,
) -> GradationResult<f64> {
    let d = d.as_ref().map_err(Clone::clone)?;
    if divisor && d.aperture_mm.abs() <= DIAMETER_EPS {
        return Err(GradationError::DivisionByZero(name.to_string()));
    }
    if d.aperture_mm <= 0.0 {
        return Err(GradationError::NonPhysicalDiameter {
            percent: d.target_percent,
            aperture_mm: d.aperture_mm,
        });
    }
    Ok(d.aperture_mm)
}

fn grading_verdict(
    cu: &GradationResult<f64>,
    cc: &GradationResult<f64>,
    criteria: &GradingCriteria,
) -> GradationResult<GradingVerdict> {
    let cu = *cu.as_ref().map_err(Clone::clone)?;
    let cc = *cc.as_ref().map_err(Clone::clone)?;
    if is_well_graded(cu, cc, criteria.well_graded_min_cu, criteria.cc_min, criteria.cc_max) {
        Ok(GradingVerdict::WellGraded)
    } else {
        Ok(GradingVerdict::PoorlyGraded)
    }
}

fn texture_verdict(
    curve: &GradationCurve,
    criteria: &GradingCriteria,
) -> GradationResult<TextureVerdict> {
    let row = curve
        .row_at(criteria.reference_sieve_mm, criteria.aperture_tolerance_mm)
        .ok_or(GradationError::ReferenceSieveMissing(criteria.reference_sieve_mm))?;
    let texture = if row.percent_passing > criteria.fine_passing_threshold {
        Texture::FineGrained
    } else {
        Texture::CoarseGrained
    };
    Ok(TextureVerdict {
        texture,
        percent_passing: row.percent_passing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::science::gradation::compute_gradation;
    use crate::science::sieve::SieveReading;

    fn curve(pairs: &[(f64, f64)]) -> GradationCurve {
        let readings: Vec<SieveReading> = pairs
            .iter()
            .map(|&(mm, pct)| SieveReading::new(mm, pct).unwrap())
            .collect();
        compute_gradation(&readings).unwrap()
    }

    fn d(target: f64, mm: f64) -> GradationResult<Interpolated> {
        Ok(Interpolated {
            target_percent: target,
            aperture_mm: mm,
            extrapolated: false,
        })
    }

    #[test]
    fn test_shape_coefficients_well_graded_sand() {
        let (cu, cc) = shape_coefficients(&d(10.0, 0.075), &d(30.0, 0.3), &d(60.0, 1.18));
        let cu = cu.unwrap();
        let cc = cc.unwrap();
        assert!((cu - 15.73).abs() < 0.005, "Expected ~15.73, got {}", cu);
        assert!((cc - 1.02).abs() < 0.005, "Expected ~1.02, got {}", cc);
        let verdict = grading_verdict(&Ok(cu), &Ok(cc), &GradingCriteria::default());
        assert_eq!(verdict, Ok(GradingVerdict::WellGraded));
    }

    #[test]
    fn test_zero_d10_is_division_by_zero() {
        let (cu, cc) = shape_coefficients(&d(10.0, 0.0), &d(30.0, 0.3), &d(60.0, 1.18));
        assert_eq!(cu, Err(GradationError::DivisionByZero("D10".to_string())));
        assert_eq!(cc, Err(GradationError::DivisionByZero("D10".to_string())));
    }

    #[test]
    fn test_zero_d60_is_division_by_zero() {
        let (cu, _) = shape_coefficients(&d(10.0, 0.075), &d(30.0, 0.3), &d(60.0, 0.0));
        assert_eq!(cu, Err(GradationError::DivisionByZero("D60".to_string())));
    }

    #[test]
    fn test_negative_extrapolated_d10_is_non_physical() {
        let (cu, _) = shape_coefficients(&d(10.0, -0.375), &d(30.0, 0.3), &d(60.0, 1.18));
        assert!(matches!(cu, Err(GradationError::NonPhysicalDiameter { .. })));
    }

    #[test]
    fn test_failed_d30_only_blocks_cc() {
        let d30 = Err(GradationError::DegenerateInterval { percent: 30.0 });
        let (cu, cc) = shape_coefficients(&d(10.0, 0.075), &d30, &d(60.0, 1.18));
        assert!(cu.is_ok());
        assert_eq!(cc, d30.map(|_| 0.0));
    }

    #[test]
    fn test_poorly_graded_when_cu_low() {
        let verdict = grading_verdict(&Ok(3.5), &Ok(1.5), &GradingCriteria::default());
        assert_eq!(verdict, Ok(GradingVerdict::PoorlyGraded));
    }

    #[test]
    fn test_fine_grained_at_reference_sieve() {
        let c = curve(&[(4.75, 20.0), (2.36, 30.0), (0.3, 25.0), (0.075, 15.0)]);
        let summary = classify(&c, MaterialKind::Soil);
        let texture = summary.texture.unwrap();
        assert_eq!(texture.texture, Texture::FineGrained);
        assert_eq!(texture.percent_passing, 80.0);
    }

    #[test]
    fn test_exactly_fifty_passing_is_coarse() {
        let c = curve(&[(4.75, 50.0), (2.36, 30.0)]);
        let summary = classify(&c, MaterialKind::Soil);
        assert_eq!(summary.texture.unwrap().texture, Texture::CoarseGrained);
    }

    #[test]
    fn test_missing_reference_sieve_blocks_only_texture() {
        let c = curve(&[(2.36, 20.0), (1.18, 30.0), (0.3, 25.0), (0.075, 15.0)]);
        let summary = classify(&c, MaterialKind::Soil);
        assert_eq!(summary.texture, Err(GradationError::ReferenceSieveMissing(4.75)));
        assert!(summary.cu.is_ok());
        assert!(summary.grading.is_some());
    }

    #[test]
    fn test_aggregate_path_has_fineness_not_grading() {
        // passing [95, 80, 60, 35, 15, 5] → FM = 2.9 → Zone II
        let c = curve(&[
            (4.75, 5.0),
            (2.36, 15.0),
            (1.18, 20.0),
            (0.6, 25.0),
            (0.3, 20.0),
            (0.15, 10.0),
        ]);
        let summary = classify(&c, MaterialKind::Aggregate);
        let fm = summary.fineness_modulus.unwrap();
        assert!((fm - 2.9).abs() < 1e-9, "Expected 2.9, got {}", fm);
        assert_eq!(summary.zone, Some(Zone::II));
        assert!(summary.grading.is_none());
    }

    #[test]
    fn test_soil_path_has_no_fineness() {
        let c = curve(&[(4.75, 20.0), (2.36, 30.0), (0.3, 25.0), (0.075, 15.0)]);
        let summary = classify(&c, MaterialKind::Soil);
        assert!(summary.fineness_modulus.is_none());
        assert!(summary.zone.is_none());
    }

    #[test]
    fn test_zone_mapping() {
        assert_eq!(Zone::from_fineness_modulus(2.0), Zone::I);
        assert_eq!(Zone::from_fineness_modulus(2.5), Zone::II);
        assert_eq!(Zone::from_fineness_modulus(3.2), Zone::III);
        assert_eq!(Zone::from_fineness_modulus(4.0), Zone::IV);
    }

    #[test]
    fn test_material_kind_parsing() {
        assert_eq!("Soil".parse::<MaterialKind>(), Ok(MaterialKind::Soil));
        assert_eq!(" aggregate ".parse::<MaterialKind>(), Ok(MaterialKind::Aggregate));
        assert!("gravelish".parse::<MaterialKind>().is_err());
    }

    #[test]
    fn test_extrapolated_d_values_are_listed() {
        // passing [80, 50, 25, 20]: D10 below observed range
        let c = curve(&[(4.75, 20.0), (2.36, 30.0), (0.3, 25.0), (0.075, 5.0)]);
        let summary = classify(&c, MaterialKind::Soil);
        let extrapolated = summary.extrapolated();
        assert_eq!(extrapolated.len(), 1);
        assert_eq!(extrapolated[0].target_percent, 10.0);
    }
}
