// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
pub mod classifier;
pub mod gradation;
pub mod interpolation;
pub mod sieve; // Dataset builder + sieve catalog
