//! Build command implementation.
//!
//! Calibrates the curves of a market file and reports their nodes, the
//! repricing residuals and the stored building blocks.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use strata_calibration::MulticurveBuilder;
use strata_curves::{CurveBuildingBlockBundle, MulticurveProvider};
use tabled::Tabled;

use crate::commands::load_config;
use crate::market::MarketFile;
use crate::output::{format_percent, format_residual, print_json, print_table};

/// Arguments for the build command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Market file (.toml or .json) listing the calibration units
    #[arg(short, long)]
    pub market: PathBuf,

    /// Configuration file (.toml or .json)
    #[arg(short, long, env = "STRATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ReportFormat,
}

/// Build report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// JSON
    Json,
}

/// A calibrated curve node.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct NodeRow {
    #[tabled(rename = "Curve")]
    pub curve: String,
    #[tabled(rename = "Time")]
    pub time: f64,
    #[tabled(rename = "Zero rate", display_with = "display_percent")]
    pub zero_rate: f64,
}

/// Calibration target of an instrument on the built curves.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ResidualRow {
    #[tabled(rename = "Unit")]
    pub unit: usize,
    #[tabled(rename = "Instrument")]
    pub instrument: usize,
    #[tabled(rename = "Residual", display_with = "display_residual")]
    pub residual: f64,
}

/// Layout of a stored building block.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BlockRow {
    #[tabled(rename = "Curve")]
    pub curve: String,
    #[tabled(rename = "Depends on")]
    pub layout: String,
    #[tabled(rename = "Rows")]
    pub rows: usize,
    #[tabled(rename = "Columns")]
    pub columns: usize,
}

/// Everything the build command reports.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub nodes: Vec<NodeRow>,
    pub residuals: Vec<ResidualRow>,
    pub blocks: Vec<BlockRow>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn display_percent(value: &f64) -> String {
    format_percent(*value)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn display_residual(value: &f64) -> String {
    format_residual(*value)
}

/// Executes the build command.
pub fn execute(args: &BuildArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let market_file = MarketFile::load(&args.market)?;
    let units = market_file.units()?;

    let builder = MulticurveBuilder::from_config(&config)?;
    tracing::info!(
        units = units.len(),
        strategy = %config.root_finder.strategy,
        decomposition = builder.decomposition_kind(),
        "building curves"
    );
    let (market, bundle) = builder
        .make_curves_from_derivatives(
            &units,
            &MulticurveProvider::new(),
            &CurveBuildingBlockBundle::new(),
        )
        .with_context(|| format!("building curves from {}", args.market.display()))?;

    let mut residuals = Vec::new();
    for (unit_index, unit) in units.iter().enumerate() {
        for (instrument, residual) in builder.residuals(unit, &market)?.into_iter().enumerate() {
            residuals.push(ResidualRow {
                unit: unit_index,
                instrument,
                residual,
            });
        }
    }

    let report = BuildReport {
        nodes: node_rows(&market),
        residuals,
        blocks: block_rows(&bundle),
    };

    match args.format {
        ReportFormat::Json => print_json(&report)?,
        ReportFormat::Table => {
            print_table("Curves", &report.nodes);
            print_table("Residuals", &report.residuals);
            print_table("Building blocks", &report.blocks);
        }
    }
    Ok(())
}

fn node_rows(market: &MulticurveProvider) -> Vec<NodeRow> {
    market
        .all_curve_names()
        .filter_map(|name| market.curve(name).ok())
        .flat_map(|curve| {
            curve
                .times()
                .iter()
                .zip(curve.parameters())
                .map(|(time, rate)| NodeRow {
                    curve: curve.name().to_string(),
                    time: *time,
                    zero_rate: *rate,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn block_rows(bundle: &CurveBuildingBlockBundle) -> Vec<BlockRow> {
    bundle
        .names()
        .filter_map(|name| {
            let (block, matrix) = bundle.block(name)?;
            let layout: Vec<&str> = block.all_names().collect();
            Some(BlockRow {
                curve: name.to_string(),
                layout: layout.join(", "),
                rows: matrix.nrows(),
                columns: matrix.ncols(),
            })
        })
        .collect()
}
