// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// CivLab: Civil Engineering Laboratory Calculators
// Sieve Analysis / Particle-Size-Distribution Core
//

pub mod analysis_kernel;
pub mod error;
pub mod formulas;
pub mod science;
#[cfg(test)]
pub mod tests_gradation;
pub mod worksheet;

// Re-export core types
pub use analysis_kernel::{AnalysisConfig, AnalysisReport, AnalysisRequest, SieveKernel};
pub use error::{GradationError, GradationResult};
pub use science::classifier::{classify, classify_with, GradationSummary, MaterialKind};
pub use science::gradation::{compute_gradation, DataQualityWarning, GradationCurve, GradationRow};
pub use science::interpolation::{interpolate_passing, Interpolated};
pub use science::sieve::{SieveDatasetBuilder, SieveReading};
pub use worksheet::SieveWorksheet;
