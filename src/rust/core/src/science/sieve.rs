// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// Sieve Dataset Builder: standard sieve catalog, label parsing and reading
// collection (percent-retained or mass-retained entry).

use crate::error::{GradationError, GradationResult};
use crate::formulas::percent_of_total;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wasm_bindgen::prelude::*;

/// Minimum number of readings needed to build a curve.
pub const MIN_READINGS: usize = 2;

/// One sieve entry: aperture in millimetres and the share of sample retained on it.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SieveReading {
    pub aperture_mm: f64,
    pub percent_retained: f64, // % of total sample mass
}

#[wasm_bindgen]
impl SieveReading {
    #[wasm_bindgen(constructor)]
    pub fn js_new(aperture_mm: f64, percent_retained: f64) -> Result<SieveReading, JsValue> {
        SieveReading::new(aperture_mm, percent_retained)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl SieveReading {
    pub fn new(aperture_mm: f64, percent_retained: f64) -> GradationResult<Self> {
        let reading = SieveReading {
            aperture_mm,
            percent_retained,
        };
        reading.validate()?;
        Ok(reading)
    }

    /// Reading from a catalog label such as `"4.75 mm"` or `"150 µm"`.
    pub fn from_label(label: &str, percent_retained: f64) -> GradationResult<Self> {
        Self::new(parse_sieve_label(label)?, percent_retained)
    }

    /// Range check for a single reading. Does not look at other readings.
    pub fn validate(&self) -> GradationResult<()> {
        if !self.aperture_mm.is_finite() || self.aperture_mm <= 0.0 {
            return Err(GradationError::InvalidReading {
                aperture_mm: self.aperture_mm,
                reason: "aperture must be a positive finite size".to_string(),
            });
        }
        if !self.percent_retained.is_finite()
            || self.percent_retained < 0.0
            || self.percent_retained > 100.0
        {
            return Err(GradationError::InvalidReading {
                aperture_mm: self.aperture_mm,
                reason: format!(
                    "percent retained {} outside [0, 100]",
                    self.percent_retained
                ),
            });
        }
        Ok(())
    }
}

// ============================================================================
// CATALOG & LABELS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SieveUnit {
    Millimetre,
    Micrometre,
}

impl SieveUnit {
    fn to_mm(self, value: f64) -> f64 {
        match self {
            SieveUnit::Millimetre => value,
            SieveUnit::Micrometre => value / 1000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StandardSieve {
    pub label: &'static str,
    pub aperture_mm: f64,
}

/// IS 460 / IS 383 test sieves, coarsest first.
pub const STANDARD_SIEVES: [StandardSieve; 14] = [
    StandardSieve { label: "80 mm", aperture_mm: 80.0 },
    StandardSieve { label: "63 mm", aperture_mm: 63.0 },
    StandardSieve { label: "40 mm", aperture_mm: 40.0 },
    StandardSieve { label: "20 mm", aperture_mm: 20.0 },
    StandardSieve { label: "12.5 mm", aperture_mm: 12.5 },
    StandardSieve { label: "10 mm", aperture_mm: 10.0 },
    StandardSieve { label: "4.75 mm", aperture_mm: 4.75 },
    StandardSieve { label: "2.36 mm", aperture_mm: 2.36 },
    StandardSieve { label: "1.18 mm", aperture_mm: 1.18 },
    StandardSieve { label: "600 µm", aperture_mm: 0.6 },
    StandardSieve { label: "425 µm", aperture_mm: 0.425 },
    StandardSieve { label: "300 µm", aperture_mm: 0.3 },
    StandardSieve { label: "150 µm", aperture_mm: 0.15 },
    StandardSieve { label: "75 µm", aperture_mm: 0.075 },
];

/// Catalog entry with this aperture, if any.
pub fn standard_sieve(aperture_mm: f64) -> Option<&'static StandardSieve> {
    STANDARD_SIEVES
        .iter()
        .find(|s| (s.aperture_mm - aperture_mm).abs() < 1e-9)
}

/// Catalog labels for populating a host's sieve selector.
#[wasm_bindgen]
pub fn standard_sieve_labels() -> Vec<String> {
    STANDARD_SIEVES.iter().map(|s| s.label.to_string()).collect()
}

/// Parses a sieve label into millimetres.
///
/// The unit suffix is stripped, the remainder trimmed and parsed, and
/// micrometre labels are divided by 1000. Accepts `mm`, `µm` (micro sign),
/// `μm` (Greek mu) and `um`, with or without a space before the unit.
pub fn parse_sieve_label(label: &str) -> GradationResult<f64> {
    let invalid = || GradationError::InvalidLabel(label.to_string());
    let lower = label.trim().to_lowercase();

    let (number, unit) = ["µm", "μm", "um"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .map(|rest| (rest, SieveUnit::Micrometre))
        .or_else(|| {
            lower
                .strip_suffix("mm")
                .map(|rest| (rest, SieveUnit::Millimetre))
        })
        .ok_or_else(invalid)?;

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    Ok(unit.to_mm(value))
}

/// WASM wrapper around [`parse_sieve_label`].
#[wasm_bindgen]
pub fn sieve_label_to_mm(label: &str) -> Result<f64, JsValue> {
    parse_sieve_label(label).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects readings for one analysis run.
///
/// Only per-reading range checks happen here; whether the retained
/// percentages add up is judged by the gradation table.
#[derive(Clone, Debug, Default)]
pub struct SieveDatasetBuilder {
    readings: Vec<SieveReading>,
}

impl SieveDatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: SieveReading) -> GradationResult<&mut Self> {
        reading.validate()?;
        self.readings.push(reading);
        Ok(self)
    }

    pub fn push_labeled(&mut self, label: &str, percent_retained: f64) -> GradationResult<&mut Self> {
        self.push(SieveReading::from_label(label, percent_retained)?)
    }

    pub fn push_aperture(&mut self, aperture_mm: f64, percent_retained: f64) -> GradationResult<&mut Self> {
        self.push(SieveReading::new(aperture_mm, percent_retained)?)
    }

    pub fn remove(&mut self, index: usize) -> Option<SieveReading> {
        if index < self.readings.len() {
            Some(self.readings.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[SieveReading] {
        &self.readings
    }

    pub fn build(&self) -> GradationResult<Vec<SieveReading>> {
        if self.readings.len() < MIN_READINGS {
            return Err(GradationError::TooFewReadings {
                got: self.readings.len(),
                required: MIN_READINGS,
            });
        }
        debug!(count = self.readings.len(), "sieve dataset built");
        Ok(self.readings.clone())
    }
}

// ============================================================================
// MASS-RETAINED ENTRY
// ============================================================================

/// Mass caught on one sieve, in grams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassRetained {
    pub aperture_mm: f64,
    pub mass_g: f64,
}

/// Converts retained masses into percent-retained readings.
///
/// The sample total is the sum of all sieve masses plus the pan.
pub fn readings_from_masses(
    entries: &[MassRetained],
    pan_mass_g: f64,
) -> GradationResult<Vec<SieveReading>> {
    for e in entries {
        if !e.mass_g.is_finite() || e.mass_g < 0.0 {
            return Err(GradationError::InvalidReading {
                aperture_mm: e.aperture_mm,
                reason: format!("retained mass {} g must be non-negative", e.mass_g),
            });
        }
    }
    if !pan_mass_g.is_finite() || pan_mass_g < 0.0 {
        return Err(GradationError::InvalidInput(format!(
            "pan mass {} g must be non-negative",
            pan_mass_g
        )));
    }

    let total: f64 = entries.iter().map(|e| e.mass_g).sum::<f64>() + pan_mass_g;
    if total <= 0.0 {
        return Err(GradationError::EmptySample(total));
    }

    let mut builder = SieveDatasetBuilder::new();
    for e in entries {
        builder.push_aperture(e.aperture_mm, percent_of_total(e.mass_g, total))?;
    }
    builder.build()
}

/// One row of a JSON request. The sieve is given either as a label or as a
/// raw aperture; the quantity either as percent retained or as mass retained.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInput {
    #[serde(default)]
    pub sieve: Option<String>,
    #[serde(default)]
    pub aperture_mm: Option<f64>,
    #[serde(default)]
    pub percent_retained: Option<f64>,
    #[serde(default)]
    pub mass_retained: Option<f64>,
}

impl ReadingInput {
    fn aperture(&self) -> GradationResult<f64> {
        match (&self.sieve, self.aperture_mm) {
            (Some(label), _) => parse_sieve_label(label),
            (None, Some(mm)) => Ok(mm),
            (None, None) => Err(GradationError::InvalidInput(
                "reading needs either `sieve` or `apertureMm`".to_string(),
            )),
        }
    }
}

/// Resolves request rows into readings.
///
/// All rows must use the same quantity: either every row has
/// `percentRetained`, or every row has `massRetained`.
pub fn readings_from_inputs(
    inputs: &[ReadingInput],
    pan_mass_g: f64,
) -> GradationResult<Vec<SieveReading>> {
    let all_percent = inputs.iter().all(|i| i.percent_retained.is_some());
    let all_mass = inputs.iter().all(|i| i.mass_retained.is_some());

    if all_percent {
        let mut builder = SieveDatasetBuilder::new();
        for input in inputs {
            builder.push_aperture(input.aperture()?, input.percent_retained.unwrap_or_default())?;
        }
        builder.build()
    } else if all_mass {
        let entries = inputs
            .iter()
            .map(|i| {
                Ok(MassRetained {
                    aperture_mm: i.aperture()?,
                    mass_g: i.mass_retained.unwrap_or_default(),
                })
            })
            .collect::<GradationResult<Vec<_>>>()?;
        readings_from_masses(&entries, pan_mass_g)
    } else {
        Err(GradationError::InvalidInput(
            "every reading needs `percentRetained`, or every reading needs `massRetained`"
                .to_string(),
        ))
    }
}
