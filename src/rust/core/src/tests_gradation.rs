// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT

//! Sieve Analysis Pipeline Tests
//!
//! Worked laboratory scenarios plus property checks over random sieve stacks.

use crate::analysis_kernel::{AnalysisConfig, SieveKernel};
use crate::error::GradationError;
use crate::science::classifier::{
    classify, shape_coefficients, GradingVerdict, MaterialKind, Texture,
};
use crate::science::gradation::compute_gradation;
use crate::science::interpolation::{interpolate_passing, Interpolated};
use crate::science::sieve::{SieveDatasetBuilder, SieveReading, STANDARD_SIEVES};
use proptest::prelude::*;

fn readings(pairs: &[(f64, f64)]) -> Vec<SieveReading> {
    pairs
        .iter()
        .map(|&(mm, pct)| SieveReading::new(mm, pct).unwrap())
        .collect()
}

#[test]
fn test_scenario_sorted_cumulative_passing() {
    // Entered out of order on purpose
    let input = readings(&[(0.3, 25.0), (0.075, 15.0), (4.75, 20.0), (2.36, 30.0)]);
    let curve = compute_gradation(&input).unwrap();

    let cumulative: Vec<f64> = curve.rows().iter().map(|r| r.cumulative_retained).collect();
    assert_eq!(cumulative, vec![20.0, 50.0, 75.0, 90.0]);
    assert_eq!(curve.passing_values(), vec![80.0, 50.0, 25.0, 10.0]);

    let summary = classify(&curve, MaterialKind::Soil);
    let texture = summary.texture.unwrap();
    assert_eq!(texture.texture, Texture::FineGrained);
    assert_eq!(texture.percent_passing, 80.0);
}

#[test]
fn test_scenario_cu_cc_well_graded() {
    let d = |target: f64, mm: f64| {
        Ok(Interpolated {
            target_percent: target,
            aperture_mm: mm,
            extrapolated: false,
        })
    };
    let (cu, cc) = shape_coefficients(&d(10.0, 0.075), &d(30.0, 0.3), &d(60.0, 1.18));
    let cu = cu.unwrap();
    let cc = cc.unwrap();
    println!(" Cu = {:.2}, Cc = {:.2}", cu, cc);
    assert_eq!(format!("{:.2}", cu), "15.73");
    assert_eq!(format!("{:.2}", cc), "1.02");
    assert!(crate::formulas::is_well_graded(cu, cc, 4.0, 1.0, 3.0));
}

#[test]
fn test_scenario_duplicate_aperture() {
    let input = readings(&[(4.75, 10.0), (2.36, 20.0), (2.36, 30.0)]);
    assert_eq!(
        compute_gradation(&input),
        Err(GradationError::DuplicateAperture(2.36))
    );
}

#[test]
fn test_scenario_duplicate_after_unit_normalization() {
    // "600 µm" and 0.6 mm are the same sieve
    let mut builder = SieveDatasetBuilder::new();
    builder.push_labeled("600 µm", 10.0).unwrap();
    builder.push_aperture(0.6, 20.0).unwrap();
    let input = builder.build().unwrap();
    assert!(matches!(
        compute_gradation(&input),
        Err(GradationError::DuplicateAperture(_))
    ));
}

#[test]
fn test_scenario_overshoot_warning() {
    // Retained sums to 120 %
    let input = readings(&[(4.75, 30.0), (2.36, 40.0), (0.3, 30.0), (0.075, 20.0)]);
    let curve = compute_gradation(&input).unwrap();
    let last = curve.rows().last().unwrap();
    assert_eq!(last.percent_passing, -20.0);
    assert_eq!(curve.warnings().len(), 1);
    assert_eq!(curve.warnings()[0].percent_passing, -20.0);

    // Warning survives into the summary and the kernel events
    let summary = classify(&curve, MaterialKind::Soil);
    assert_eq!(summary.warnings.len(), 1);
    let report = SieveKernel::analyze(&input, MaterialKind::Soil, &AnalysisConfig::default());
    assert!(report
        .events
        .iter()
        .any(|e| e.topic == "GRADATION.DATA_QUALITY"));
}

#[test]
fn test_scenario_all_zero_retained() {
    let input = readings(&[(4.75, 0.0), (2.36, 0.0), (0.3, 0.0), (0.075, 0.0)]);
    let curve = compute_gradation(&input).unwrap();
    assert!(curve.passing_values().iter().all(|&p| p == 100.0));
    assert_eq!(
        interpolate_passing(&curve, 10.0),
        Err(GradationError::InsufficientData { distinct: 1 })
    );

    // Interpolation failures block Cu/Cc but not the fine/coarse verdict
    let summary = classify(&curve, MaterialKind::Soil);
    assert!(summary.cu.is_err());
    assert!(matches!(summary.grading, Some(Err(_))));
    assert_eq!(summary.texture.unwrap().texture, Texture::FineGrained);
}

#[test]
fn test_typical_zone_iii_sand() {
    // Fine aggregate with a standard IS sieve stack
    let mut builder = SieveDatasetBuilder::new();
    for (label, pct) in [
        ("4.75 mm", 4.0),
        ("2.36 mm", 10.0),
        ("1.18 mm", 16.0),
        ("600 µm", 25.0),
        ("300 µm", 30.0),
        ("150 µm", 12.0),
    ] {
        builder.push_labeled(label, pct).unwrap();
    }
    let curve = compute_gradation(&builder.build().unwrap()).unwrap();
    // passing [96, 86, 70, 45, 15, 3] → FM 3.15
    let summary = classify(&curve, MaterialKind::Aggregate);
    let fm = summary.fineness_modulus.unwrap();
    assert!((fm - 3.15).abs() < 1e-9, "Expected 3.15, got {}", fm);
    assert_eq!(summary.zone, Some(crate::science::classifier::Zone::III));
    assert!(summary.grading.is_none());
}

#[test]
fn test_poorly_graded_uniform_sand() {
    // Nearly everything between 600 µm and 300 µm
    let input = readings(&[(1.18, 5.0), (0.6, 10.0), (0.3, 75.0), (0.15, 8.0)]);
    let curve = compute_gradation(&input).unwrap();
    let summary = classify(&curve, MaterialKind::Soil);
    assert_eq!(summary.grading, Some(Ok(GradingVerdict::PoorlyGraded)));
}

// ---------------------------------------------------------------------------
// Properties over random stacks drawn from the standard catalog
// ---------------------------------------------------------------------------

fn sieve_stack(retained: std::ops::Range<f64>) -> impl Strategy<Value = Vec<SieveReading>> {
    let apertures: Vec<f64> = STANDARD_SIEVES.iter().map(|s| s.aperture_mm).collect();
    proptest::sample::subsequence(apertures, 2..=STANDARD_SIEVES.len())
        .prop_flat_map(move |aps| {
            let n = aps.len();
            (Just(aps), prop::collection::vec(retained.clone(), n))
        })
        .prop_map(|(aps, pct)| {
            aps.into_iter()
                .zip(pct)
                .map(|(aperture_mm, percent_retained)| SieveReading {
                    aperture_mm,
                    percent_retained,
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn normalized(readings: Vec<SieveReading>) -> Vec<SieveReading> {
    let total: f64 = readings.iter().map(|r| r.percent_retained).sum();
    if total <= 100.0 {
        return readings;
    }
    readings
        .into_iter()
        .map(|r| SieveReading {
            percent_retained: r.percent_retained * 100.0 / total,
            ..r
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_passing_within_bounds(stack in sieve_stack(0.0..60.0)) {
        let curve = compute_gradation(&normalized(stack)).unwrap();
        for row in curve.rows() {
            prop_assert!(row.percent_passing >= -1e-9 && row.percent_passing <= 100.0,
                "passing {} out of range", row.percent_passing);
        }
        prop_assert!(curve.warnings().is_empty());
    }

    #[test]
    fn prop_passing_monotone_as_aperture_decreases(stack in sieve_stack(0.0..40.0)) {
        let curve = compute_gradation(&stack).unwrap();
        for pair in curve.rows().windows(2) {
            prop_assert!(pair[0].aperture_mm > pair[1].aperture_mm);
            prop_assert!(pair[1].percent_passing <= pair[0].percent_passing);
        }
    }

    #[test]
    fn prop_pipeline_is_idempotent(stack in sieve_stack(0.0..40.0)) {
        let first = compute_gradation(&stack).unwrap();
        let second = compute_gradation(&stack).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            classify(&first, MaterialKind::Aggregate),
            classify(&second, MaterialKind::Aggregate)
        );
    }

    #[test]
    fn prop_interpolation_round_trips_at_points(stack in sieve_stack(1.0..20.0)) {
        // Strictly positive retained → strictly decreasing passing
        let curve = compute_gradation(&stack).unwrap();
        for row in curve.rows() {
            let hit = interpolate_passing(&curve, row.percent_passing).unwrap();
            prop_assert!((hit.aperture_mm - row.aperture_mm).abs() < 1e-9);
            prop_assert!(!hit.extrapolated);
        }
    }

    #[test]
    fn prop_outside_range_extrapolates(stack in sieve_stack(1.0..20.0)) {
        let curve = compute_gradation(&stack).unwrap();
        let top = curve.rows()[0].percent_passing;
        let bottom = curve.rows().last().unwrap().percent_passing;

        let above = interpolate_passing(&curve, top + 5.0).unwrap();
        prop_assert!(above.extrapolated);
        prop_assert!(above.aperture_mm > curve.rows()[0].aperture_mm);

        let below = interpolate_passing(&curve, bottom - 5.0).unwrap();
        prop_assert!(below.extrapolated);
    }
}
