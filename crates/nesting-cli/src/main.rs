use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use nesting_core::{
    LinearNester, LinearRequest, SheetNester, SheetRequest, StockEstimate, UtilizationSummary,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nesting")]
#[command(about = "Stock nesting - sheets and bars required for a bill of materials", long_about = None)]
struct Cli {
    /// Log packing decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack rectangular parts onto sheets
    Sheet {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail when any piece is left unplaced
        #[arg(long)]
        strict: bool,
    },

    /// Pack linear parts into bars, tubes or profiles
    Linear {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail when any piece is left unplaced
        #[arg(long)]
        strict: bool,
    },

    /// Rank candidate sheet sizes without placing pieces
    Estimate {
        /// Sheet request file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sheet {
            input,
            output,
            strict,
        } => sheet_command(&input, output, strict)?,
        Commands::Linear {
            input,
            output,
            strict,
        } => linear_command(&input, output, strict)?,
        Commands::Estimate { input } => estimate_command(&input)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_request<T: DeserializeOwned>(input: &Path) -> Result<T> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let request = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(request)
}

fn sheet_command(input: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    println!("{}", "🔍 Loading sheet request...".bright_blue());
    let request: SheetRequest = load_request(input)?;

    println!(
        "  {} part lines",
        request.parts.len().to_string().bright_white().bold()
    );
    println!(
        "  {} candidate sheet sizes",
        request.sheets.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Packing sheets...".bright_blue());
    let calculation = SheetNester::new(request)?.run()?;

    println!();
    print_candidates(&calculation.candidates, "sheets");
    println!(
        "  Chosen sheet: {}",
        calculation.chosen.stock_name.bright_white().bold()
    );
    println!(
        "  Sheets required: {} (estimate {})",
        calculation
            .packing
            .total_sheets
            .to_string()
            .bright_white()
            .bold(),
        calculation.chosen.required_units
    );
    println!(
        "  Pieces placed: {}",
        calculation.packing.total_pieces_placed
    );
    println!(
        "  Mean sheet utilization: {:.1}%",
        calculation.packing.mean_utilization
    );
    print_summary(&calculation.summary, "mm²");

    let unplaced: Vec<&str> = calculation
        .packing
        .unplaced
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    report_unplaced(&unplaced);

    write_result(&calculation, output)?;

    if strict {
        calculation.packing.ensure_complete()?;
    }
    Ok(())
}

fn linear_command(input: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    println!("{}", "🔍 Loading linear request...".bright_blue());
    let request: LinearRequest = load_request(input)?;

    println!(
        "  {} part lines of {} material",
        request.parts.len().to_string().bright_white().bold(),
        request.category
    );
    println!(
        "  {} candidate bar lengths",
        request.bars.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Packing bars...".bright_blue());
    let calculation = LinearNester::new(request)?.run()?;

    println!();
    print_candidates(&calculation.candidates, "bars");
    println!(
        "  Chosen bar: {}",
        calculation.chosen.stock_name.bright_white().bold()
    );
    println!(
        "  Bars required: {} ({} packed, estimate {})",
        calculation
            .packing
            .required_bars
            .to_string()
            .bright_white()
            .bold(),
        calculation.packing.packed_bars,
        calculation.chosen.required_units
    );
    println!("  Cuts: {}", calculation.packing.total_cuts);
    print_summary(&calculation.summary, "mm");

    let unplaced: Vec<&str> = calculation
        .packing
        .unplaced
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    report_unplaced(&unplaced);

    write_result(&calculation, output)?;

    if strict {
        calculation.packing.ensure_complete()?;
    }
    Ok(())
}

fn estimate_command(input: &Path) -> Result<()> {
    let request: SheetRequest = load_request(input)?;
    let estimates = SheetNester::new(request)?.estimate()?;

    print_candidates(&estimates, "sheets");
    println!("{}", serde_json::to_string_pretty(&estimates)?);
    Ok(())
}

fn print_candidates(candidates: &[StockEstimate], unit: &str) {
    println!("{}", "📐 Candidate estimates:".bright_yellow().bold());
    for estimate in candidates {
        println!(
            "    • {}: {} {} ({:.1}% utilization, waste {:.0})",
            estimate.stock_name.bright_white(),
            estimate.required_units,
            unit,
            estimate.utilization,
            estimate.waste
        );
        if !estimate.fits_all {
            println!("      {}", "some parts do not fit this size".bright_red());
        }
    }
    println!();
}

fn print_summary(summary: &UtilizationSummary, unit: &str) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  Utilization: {}",
        format!("{:.1}%", summary.utilization).bright_white()
    );
    println!("  Used: {:.0} {unit} of {:.0} {unit}", summary.used, summary.available);
    println!("  Waste: {:.0} {unit}", summary.waste);
    println!("  Cost: {:.2}", summary.cost);
}

fn report_unplaced(unplaced: &[&str]) {
    if unplaced.is_empty() {
        println!();
        println!("{}", "✅ All pieces placed".bright_green().bold());
        return;
    }

    println!();
    println!(
        "{}",
        format!(
            "⚠️  {} pieces could not be placed - add stock or split the order:",
            unplaced.len()
        )
        .bright_red()
        .bold()
    );
    for id in unplaced {
        println!("    • {}", id.bright_red());
    }
}

fn write_result<T: Serialize>(result: &T, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!();

    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }
    Ok(())
}
