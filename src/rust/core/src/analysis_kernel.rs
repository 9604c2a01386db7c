// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SieveKernel: Sieve Analysis Orchestrator
//
// Runs Builder → Gradation Table → {Interpolator, Classifier} as one pure
// pipeline and returns a report with per-field error markers. Hosts call
// only this module (or the worksheet), not the individual stages.

use crate::error::{GradationError, GradationResult};
use crate::science::classifier::{classify_with, GradingCriteria, GradationSummary, MaterialKind};
use crate::science::gradation::{compute_gradation, ChartPoint, GradationCurve};
use crate::science::interpolation::{interpolate_many, Interpolated};
use crate::science::sieve::{readings_from_inputs, ReadingInput, SieveReading};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Sieve used for the fine/coarse split (mm).
    pub reference_sieve_mm: f64,
    /// Match tolerance when looking up the reference sieve (mm).
    pub aperture_tolerance_mm: f64,
    pub fine_passing_threshold: f64,
    pub well_graded_min_cu: f64,
    pub cc_min: f64,
    pub cc_max: f64,
    pub enable_classification: bool,
    pub enable_chart: bool,
    /// Additional Dx targets (e.g. 15, 50, 85 for filter design).
    #[wasm_bindgen(skip)]
    pub extra_targets: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let criteria = GradingCriteria::default();
        Self {
            reference_sieve_mm: criteria.reference_sieve_mm,
            aperture_tolerance_mm: criteria.aperture_tolerance_mm,
            fine_passing_threshold: criteria.fine_passing_threshold,
            well_graded_min_cu: criteria.well_graded_min_cu,
            cc_min: criteria.cc_min,
            cc_max: criteria.cc_max,
            enable_classification: true,
            enable_chart: true,
            extra_targets: Vec::new(),
        }
    }
}

#[wasm_bindgen]
impl AnalysisConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AnalysisConfig {
        AnalysisConfig::default()
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> GradationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn criteria(&self) -> GradingCriteria {
        GradingCriteria {
            reference_sieve_mm: self.reference_sieve_mm,
            aperture_tolerance_mm: self.aperture_tolerance_mm,
            fine_passing_threshold: self.fine_passing_threshold,
            well_graded_min_cu: self.well_graded_min_cu,
            cc_min: self.cc_min,
            cc_max: self.cc_max,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationEvent {
    pub topic: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationEvent {
    fn new(topic: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            topic: topic.into(),
            message: message.into(),
            severity,
        }
    }
}

/// JSON request accepted by [`SieveKernel::analyze_json`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub readings: Vec<ReadingInput>,
    #[serde(default)]
    pub material: MaterialKind,
    #[serde(default)]
    pub pan_mass: f64,
    #[serde(default)]
    pub config: AnalysisConfig,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub material: MaterialKind,
    pub curve: GradationResult<GradationCurve>,
    /// Absent when no curve could be built.
    pub summary: Option<GradationSummary>,
    pub extra_d_values: Vec<GradationResult<Interpolated>>,
    pub chart: Vec<ChartPoint>,
    pub events: Vec<ValidationEvent>,
    pub compute_time_ms: f32,
}

#[wasm_bindgen]
pub struct SieveKernel;

#[wasm_bindgen]
impl SieveKernel {
    /// Main entry point for JSON hosts.
    ///
    /// # Arguments
    /// * `request_json` - `{"readings": [...], "material": "soil", "panMass": 0, "config": {...}}`
    ///
    /// # Returns
    /// JSON report, or `{"error": "..."}` when the request itself is malformed.
    ///
    /// # Example
    /// ```json
    /// {"readings": [{"sieve": "4.75 mm", "percentRetained": 20},
    ///               {"sieve": "150 µm", "percentRetained": 30}],
    ///  "material": "aggregate"}
    /// ```
    pub fn analyze_json(request_json: &str) -> String {
        let request: AnalysisRequest = match serde_json::from_str(request_json) {
            Ok(r) => r,
            Err(e) => {
                return serde_json::to_string(&serde_json::json!({
                    "error": GradationError::from(e).to_string()
                }))
                .unwrap_or_default();
            }
        };

        let report = Self::analyze_request(&request);
        serde_json::to_string(&report).unwrap_or_default()
    }

    /// Same as [`SieveKernel::analyze_json`] over structured JS values.
    #[wasm_bindgen(js_name = analyze)]
    pub fn analyze_value(request: JsValue) -> Result<JsValue, JsValue> {
        let request: AnalysisRequest = serde_wasm_bindgen::from_value(request)?;
        let report = Self::analyze_request(&request);
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}

/// Pure Rust pipeline (non-WASM callers, worksheet, CLI, tests).
impl SieveKernel {
    /// Resolves request rows, then runs [`SieveKernel::analyze`]. A request
    /// whose rows cannot be resolved yields a report with a failed curve.
    pub fn analyze_request(request: &AnalysisRequest) -> AnalysisReport {
        match readings_from_inputs(&request.readings, request.pan_mass) {
            Ok(readings) => Self::analyze(&readings, request.material, &request.config),
            Err(e) => Self::rejected(request.material, e),
        }
    }

    pub fn analyze(
        readings: &[SieveReading],
        material: MaterialKind,
        config: &AnalysisConfig,
    ) -> AnalysisReport {
        let start = instant::Instant::now();

        // 1. Gradation table
        let curve = match compute_gradation(readings) {
            Ok(c) => c,
            Err(e) => return Self::failed(material, e, start),
        };

        let mut events = Vec::new();
        for w in curve.warnings() {
            events.push(ValidationEvent::new(
                "GRADATION.DATA_QUALITY",
                w.message.clone(),
                Severity::Warning,
            ));
        }

        // 2. Classification (D10/D30/D60, Cu/Cc, verdicts)
        let summary = if config.enable_classification {
            let summary = classify_with(&curve, material, &config.criteria());
            Self::summary_events(&summary, &mut events);
            Some(summary)
        } else {
            None
        };

        // 3. Extra Dx values
        let extra_d_values = interpolate_many(&curve, &config.extra_targets);
        for (target, result) in config.extra_targets.iter().zip(&extra_d_values) {
            Self::d_value_event(&format!("D{}", target), result, &mut events);
        }

        // 4. Chart series
        let chart = if config.enable_chart {
            curve.chart_series()
        } else {
            Vec::new()
        };

        let compute_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        info!(
            %material,
            rows = curve.len(),
            events = events.len(),
            compute_time_ms,
            "sieve analysis complete"
        );

        AnalysisReport {
            material,
            curve: Ok(curve),
            summary,
            extra_d_values,
            chart,
            events,
            compute_time_ms,
        }
    }

    /// Report for a run that never got as far as a curve.
    pub fn rejected(material: MaterialKind, error: GradationError) -> AnalysisReport {
        Self::failed(material, error, instant::Instant::now())
    }

    fn failed(material: MaterialKind, error: GradationError, start: instant::Instant) -> AnalysisReport {
        debug!(%material, error = %error, "sieve analysis aborted before the curve");
        let events = vec![ValidationEvent::new(
            format!("GRADATION.{}", error.code()),
            error.to_string(),
            Severity::Critical,
        )];
        AnalysisReport {
            material,
            curve: Err(error),
            summary: None,
            extra_d_values: Vec::new(),
            chart: Vec::new(),
            events,
            compute_time_ms: start.elapsed().as_secs_f32() * 1000.0,
        }
    }

    fn summary_events(summary: &GradationSummary, events: &mut Vec<ValidationEvent>) {
        Self::d_value_event("D10", &summary.d10, events);
        Self::d_value_event("D30", &summary.d30, events);
        Self::d_value_event("D60", &summary.d60, events);

        let mut field_error = |field: &str, err: &GradationError| {
            events.push(ValidationEvent::new(
                format!("CLASSIFIER.{}", err.code()),
                format!("{}: {}", field, err),
                Severity::Warning,
            ));
        };
        if let Err(e) = &summary.cu {
            field_error("Cu", e);
        }
        if let Err(e) = &summary.cc {
            field_error("Cc", e);
        }
        if let Some(Err(e)) = &summary.grading {
            field_error("grading", e);
        }
        if let Err(e) = &summary.texture {
            field_error("fine/coarse", e);
        }
    }

    fn d_value_event(
        name: &str,
        result: &GradationResult<Interpolated>,
        events: &mut Vec<ValidationEvent>,
    ) {
        match result {
            Ok(d) if d.extrapolated => events.push(ValidationEvent::new(
                "INTERPOLATION.EXTRAPOLATED",
                format!(
                    "{} = {:.4} mm extrapolated beyond the tested sieves",
                    name, d.aperture_mm
                ),
                Severity::Info,
            )),
            Ok(_) => {}
            Err(e) => events.push(ValidationEvent::new(
                format!("INTERPOLATION.{}", e.code()),
                format!("{}: {}", name, e),
                Severity::Warning,
            )),
        }
    }
}
