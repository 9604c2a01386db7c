// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
//
//! sieve_compute: CLI binary for one sieve analysis run
//!
//! Takes a JSON analysis request on stdin or as --json argument, runs the
//! gradation table, interpolator and classifier, and prints the report.
//!
//! Usage:
//!   echo '{"readings":[{"sieve":"4.75 mm","percentRetained":20},{"sieve":"75 µm","percentRetained":60}]}' | sieve_compute
//!   sieve_compute --material aggregate --json '{"readings":[...]}'
//!   sieve_compute --config thresholds.json --pretty < request.json
//!
//! Diagnostics go to stderr; stdout carries only the JSON report.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use civlab_core::{AnalysisConfig, AnalysisRequest, MaterialKind, SieveKernel};

/// CLI arguments for the sieve analysis runner.
#[derive(Debug, Parser)]
#[command(name = "sieve_compute")]
#[command(about = "Particle-size distribution analysis from sieve readings", long_about = None)]
struct Args {
    /// Request JSON inline. Read from stdin when absent.
    #[arg(long)]
    json: Option<String>,

    /// Overrides the request's material (soil, aggregate).
    #[arg(long)]
    material: Option<MaterialKind>,

    /// JSON file with analysis thresholds; replaces the request's config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let input = match &args.json {
        Some(inline) => inline.clone(),
        None => read_stdin()?,
    };

    let mut request: AnalysisRequest =
        serde_json::from_str(&input).context("invalid analysis request JSON")?;

    if let Some(material) = args.material {
        request.material = material;
    }
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        request.config = AnalysisConfig::from_json(&raw)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
    }

    info!(
        readings = request.readings.len(),
        material = %request.material,
        "running sieve analysis"
    );
    let report = SieveKernel::analyze_request(&request);

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    if let Err(e) = &report.curve {
        info!(code = e.code(), "analysis finished without a gradation curve");
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}
