//! UO Mod OCR
//!
//! Command-line front end: reads OCR text of an item tooltip and prints the
//! extracted modifiers and suggested item name as JSON.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use uo_mod_ocr::export::{csv_writer, AnalyzedItem};
use uo_mod_ocr::naming::{confidence_report, should_auto_fill, EstimationTrace};
use uo_mod_ocr::{
    paths, validate_configuration, AnalysisConfig, AnalysisConfigPatch, ModEntry,
    NameEstimation, OcrAnalyzer,
};

use cli::{Cli, Commands};

#[derive(Serialize)]
struct AnalyzeOutput {
    modifiers: Vec<ModEntry>,
    estimation: NameEstimation,
    auto_fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejections: Option<Vec<RejectionOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<EstimationTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_report: Option<String>,
}

#[derive(Serialize)]
struct RejectionOutput {
    entry: ModEntry,
    reasons: Vec<String>,
}

/// Console goes to stderr so stdout stays pure JSON; the log file is appended.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = ChronoLocal::new("%H:%M:%S%.3f".to_string());

    let file_layer = paths::ensure_directories()
        .ok()
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(paths::get_log_file())
                .ok()
        })
        .map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer.clone())
                .with_writer(Mutex::new(file))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(timer),
        )
        .with(file_layer)
        .init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read input: {}", input))
}

fn resolve_config(config: Option<&Path>, permissive: bool) -> Result<AnalysisConfig> {
    match config {
        Some(path) => AnalysisConfig::load_strict(path),
        None if permissive => Ok(AnalysisConfig::permissive()),
        None => Ok(AnalysisConfig::load(&paths::get_config_path())),
    }
}

fn analyze(
    input: &str,
    config: Option<&Path>,
    no_domain_filter: bool,
    permissive: bool,
    explain: bool,
    csv: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config, permissive)?;
    let validation = validate_configuration(&config);
    for error in &validation.errors {
        tracing::warn!("{}", error);
    }

    let mut analyzer = OcrAnalyzer::new(config);
    if no_domain_filter {
        analyzer.update_config(AnalysisConfigPatch {
            apply_domain_filter: Some(false),
            ..Default::default()
        });
    }

    let text = read_input(input)?;
    let report = analyzer.extract_with_report(&text);
    let trace = analyzer.trace_item_name(&text, &report.accepted);
    let estimation = trace.estimation.clone();
    tracing::info!(
        "Analyzed {}: {} modifiers, name \"{}\" ({:.2}, {})",
        input,
        report.accepted.len(),
        estimation.suggested_name,
        estimation.confidence,
        estimation.source
    );

    if let Some(csv_path) = csv {
        let item = AnalyzedItem::new(
            estimation.suggested_name.clone(),
            report.accepted.clone(),
            text.clone(),
            estimation.confidence,
        );
        csv_writer::init_csv(csv_path)?;
        csv_writer::append_item(csv_path, &item)?;
        tracing::info!("Appended {} to {}", item.id, csv_path.display());
    }

    let output = AnalyzeOutput {
        auto_fill: should_auto_fill(&estimation),
        rejections: explain.then(|| {
            report
                .rejected
                .iter()
                .map(|r| RejectionOutput {
                    entry: r.entry.clone(),
                    reasons: r.reasons(),
                })
                .collect()
        }),
        confidence_report: explain
            .then(|| confidence_report(std::slice::from_ref(&trace.breakdown))),
        trace: explain.then_some(trace),
        modifiers: report.accepted,
        estimation,
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}

fn validate_config_file(path: &Path) -> Result<()> {
    let config = AnalysisConfig::load_strict(path)?;
    let validation = validate_configuration(&config);
    if !validation.is_valid {
        for error in &validation.errors {
            eprintln!("{}", error);
        }
        bail!("{} invalid pattern(s) in {}", validation.errors.len(), path.display());
    }
    println!("{} is valid", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            no_domain_filter,
            permissive,
            explain,
            csv,
        } => analyze(
            &input,
            config.as_deref(),
            no_domain_filter,
            permissive,
            explain,
            csv.as_deref(),
        ),
        Commands::ValidateConfig { path } => validate_config_file(&path),
        Commands::DefaultConfig { permissive } => {
            let config = if permissive {
                AnalysisConfig::permissive()
            } else {
                AnalysisConfig::default()
            };
            let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", json);
            Ok(())
        }
    }
}
