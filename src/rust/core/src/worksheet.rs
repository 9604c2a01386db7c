// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SieveWorksheet: caller-held state for one sieve analysis form.
//
// Draft (collecting readings) → Computed (report cached) → Draft again on
// any edit. The kernel itself stays stateless; this is the only place a
// report outlives its run.

use crate::analysis_kernel::{AnalysisConfig, AnalysisReport, SieveKernel};
use crate::error::GradationResult;
use crate::science::classifier::MaterialKind;
use crate::science::sieve::{SieveDatasetBuilder, SieveReading};
use tracing::debug;
use wasm_bindgen::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorksheetState {
    Draft,
    Computed,
}

#[wasm_bindgen]
pub struct SieveWorksheet {
    material: MaterialKind,
    config: AnalysisConfig,
    builder: SieveDatasetBuilder,
    // Some(..) only while Computed.
    report: Option<AnalysisReport>,
}

#[wasm_bindgen]
impl SieveWorksheet {
    #[wasm_bindgen(constructor)]
    pub fn new(material: MaterialKind) -> SieveWorksheet {
        SieveWorksheet {
            material,
            config: AnalysisConfig::default(),
            builder: SieveDatasetBuilder::new(),
            report: None,
        }
    }

    #[wasm_bindgen(js_name = addReading)]
    pub fn js_add_reading(&mut self, label: &str, percent_retained: f64) -> Result<(), JsValue> {
        self.push_labeled(label, percent_retained)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = removeReading)]
    pub fn js_remove_reading(&mut self, index: usize) -> bool {
        self.remove(index).is_some()
    }

    #[wasm_bindgen(js_name = clearReadings)]
    pub fn js_clear_readings(&mut self) {
        self.clear();
    }

    #[wasm_bindgen(js_name = setMaterial)]
    pub fn js_set_material(&mut self, material: MaterialKind) {
        self.set_material(material);
    }

    #[wasm_bindgen(js_name = readingCount)]
    pub fn reading_count(&self) -> usize {
        self.builder.len()
    }

    #[wasm_bindgen(js_name = isComputed)]
    pub fn is_computed(&self) -> bool {
        self.report.is_some()
    }

    /// Runs the analysis and returns the report as a JS object.
    #[wasm_bindgen(js_name = analyze)]
    pub fn js_analyze(&mut self) -> Result<JsValue, JsValue> {
        let report = self.analyze();
        Ok(serde_wasm_bindgen::to_value(report)?)
    }
}

impl SieveWorksheet {
    pub fn with_config(material: MaterialKind, config: AnalysisConfig) -> Self {
        SieveWorksheet {
            config,
            ..SieveWorksheet::new(material)
        }
    }

    pub fn push_labeled(&mut self, label: &str, percent_retained: f64) -> GradationResult<()> {
        self.builder.push_labeled(label, percent_retained)?;
        self.invalidate();
        Ok(())
    }

    pub fn push_aperture(&mut self, aperture_mm: f64, percent_retained: f64) -> GradationResult<()> {
        self.builder.push_aperture(aperture_mm, percent_retained)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<SieveReading> {
        let removed = self.builder.remove(index);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.builder.clear();
        self.invalidate();
    }

    pub fn set_material(&mut self, material: MaterialKind) {
        self.material = material;
        self.invalidate();
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn readings(&self) -> &[SieveReading] {
        self.builder.readings()
    }

    pub fn state(&self) -> WorksheetState {
        if self.report.is_some() {
            WorksheetState::Computed
        } else {
            WorksheetState::Draft
        }
    }

    /// Cached report, only while the worksheet is `Computed`.
    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Recomputes from scratch and moves to `Computed`.
    pub fn analyze(&mut self) -> &AnalysisReport {
        let report = match self.builder.build() {
            Ok(readings) => SieveKernel::analyze(&readings, self.material, &self.config),
            Err(e) => SieveKernel::rejected(self.material, e),
        };
        self.report.insert(report)
    }

    fn invalidate(&mut self) {
        if self.is_computed() {
            debug!("worksheet edited, back to draft");
        }
        self.report = None;
    }
}
