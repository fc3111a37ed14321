mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::financing::{AmortizeArgs, SolveTermArgs};
use commands::rental::{
    AnalyzeArgs, CashFlowArgs, EstimateRentArgs, MetricsArgs, NormalizeArgs, ProjectArgs,
    RiskArgs,
};

/// Rental property investment analysis
#[derive(Parser)]
#[command(
    name = "realty",
    version,
    about = "Rental property investment analysis",
    long_about = "Evaluate a buy-to-let property with decimal precision: Price-table \
                  financing, monthly cash flow after vacancy and costs, ROI and payback \
                  against CDI/savings benchmarks, a multi-year appreciation projection, \
                  and a qualitative risk score."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full analysis: financing, cash flow, ROI, payback, projection, risk
    Analyze(AnalyzeArgs),
    /// Fixed installment and total interest of a loan
    Amortize(AmortizeArgs),
    /// Number of months needed to repay a loan at a given installment
    SolveTerm(SolveTermArgs),
    /// Monthly net income and cash flow after debt service
    CashFlow(CashFlowArgs),
    /// Year-by-year rent accumulation and property appreciation
    Project(ProjectArgs),
    /// ROI, payback and viability label
    Metrics(MetricsArgs),
    /// Qualitative risk factors and investment advice
    Risk(RiskArgs),
    /// Estimate monthly rent from the purchase price (0.6% rule)
    EstimateRent(EstimateRentArgs),
    /// Convert raw form strings (cents, percent) into analysis inputs
    Normalize(NormalizeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(2);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::rental::run_analyze(args),
        Commands::Amortize(args) => commands::financing::run_amortize(args),
        Commands::SolveTerm(args) => commands::financing::run_solve_term(args),
        Commands::CashFlow(args) => commands::rental::run_cash_flow(args),
        Commands::Project(args) => commands::rental::run_project(args),
        Commands::Metrics(args) => commands::rental::run_metrics(args),
        Commands::Risk(args) => commands::rental::run_risk(args),
        Commands::EstimateRent(args) => commands::rental::run_estimate_rent(args),
        Commands::Normalize(args) => commands::rental::run_normalize(args),
        Commands::Version => {
            println!("realty {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
