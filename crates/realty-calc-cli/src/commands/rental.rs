use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use realty_calc_core::rental::analysis::{self, AnalysisInput};
use realty_calc_core::rental::cash_flow::{compute_cash_flow, estimate_rent};
use realty_calc_core::rental::form::{PropertyForm, RevenueForm};
use realty_calc_core::rental::metrics::{compute_metrics_with, CapitalBasis};
use realty_calc_core::rental::projection::{build_projection_for, AnalysisMode};
use realty_calc_core::rental::risk::assess_risk;

use crate::input;

/// Arguments for the full investment analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON/YAML input file ({ property, revenue, ... })
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the monthly cash flow breakdown
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON/YAML input file ({ property, revenue })
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the multi-year projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectArgs {
    /// Path to JSON/YAML input file ({ property, revenue })
    #[arg(long)]
    pub input: Option<String>,

    /// Projection horizon in years (overrides the file)
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual appreciation in percent (overrides the file; may be negative)
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Returns to count (overrides the file)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Rental,
    Resale,
    Full,
}

impl From<ModeArg> for AnalysisMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Rental => AnalysisMode::Rental,
            ModeArg::Resale => AnalysisMode::Resale,
            ModeArg::Full => AnalysisMode::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BasisArg {
    PurchasePrice,
    EquityInvested,
}

impl From<BasisArg> for CapitalBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::PurchasePrice => CapitalBasis::PurchasePrice,
            BasisArg::EquityInvested => CapitalBasis::EquityInvested,
        }
    }
}

/// Arguments for ROI / payback / risk label
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to JSON/YAML input file ({ property, revenue })
    #[arg(long)]
    pub input: Option<String>,

    /// Capital the ROI is measured against (overrides the file)
    #[arg(long, value_enum)]
    pub basis: Option<BasisArg>,
}

/// Arguments for the qualitative risk assessment
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON/YAML input file ({ property, revenue })
    #[arg(long)]
    pub input: Option<String>,

    /// Local market liquidity score 0-100 (overrides the file)
    #[arg(long)]
    pub liquidity: Option<Decimal>,
}

/// Arguments for the rent rule of thumb
#[derive(Args)]
pub struct EstimateRentArgs {
    /// Purchase price (whole currency units)
    #[arg(long)]
    pub price: Decimal,
}

/// Arguments for converting raw form strings
#[derive(Args)]
pub struct NormalizeArgs {
    /// Path to JSON/YAML file ({ property: {..strings..}, revenue: {..strings..} })
    #[arg(long)]
    pub input: Option<String>,
}

/// Raw form strings as captured, both halves optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormInput {
    property: PropertyForm,
    revenue: RevenueForm,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis_input: AnalysisInput = input::load(args.input.as_deref(), "analysis")?;
    let output = analysis::analyze(&analysis_input)?;

    for warning in &output.warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        annual_roi = %output.result.metrics.annual_roi,
        risk = %output.result.metrics.risk_label,
        elapsed_us = output.metadata.computation_time_us,
        "analysis complete"
    );

    Ok(serde_json::to_value(output)?)
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: AnalysisInput = input::load(args.input.as_deref(), "cash flow")?;
    let property = data.property.reconciled();
    let breakdown = compute_cash_flow(&property, &data.revenue);
    Ok(json!({ "result": breakdown }))
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: AnalysisInput = input::load(args.input.as_deref(), "projection")?;
    let years = projection_years(args.years, data.projection_years)?;
    let appreciation = args.appreciation.unwrap_or(data.appreciation_rate);
    let mode = args.mode.map(AnalysisMode::from).unwrap_or(data.analysis_mode);
    tracing::debug!(years, %appreciation, ?mode, "building projection");

    let property = data.property.reconciled();
    let points = build_projection_for(&property, &data.revenue, years, appreciation, mode);
    Ok(serde_json::to_value(points)?)
}

/// `--years` when given, else the file's horizon; either must lie in 1..=MAX_PROJECTION_YEARS.
fn projection_years(requested: Option<u32>, from_file: u32) -> Result<u32, String> {
    let years = requested.unwrap_or(from_file);
    if years == 0 || years > analysis::MAX_PROJECTION_YEARS {
        return Err(format!(
            "--years must be between 1 and {}, got {years}",
            analysis::MAX_PROJECTION_YEARS
        ));
    }
    Ok(years)
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: AnalysisInput = input::load(args.input.as_deref(), "metrics")?;
    let basis = args.basis.map(CapitalBasis::from).unwrap_or(data.capital_basis);

    let property = data.property.reconciled();
    let metrics = compute_metrics_with(&property, &data.revenue, basis);
    tracing::debug!(?basis, annual_roi = %metrics.annual_roi, "metrics computed");
    Ok(json!({ "result": metrics }))
}

pub fn run_risk(args: RiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: AnalysisInput = input::load(args.input.as_deref(), "risk assessment")?;
    let liquidity = args.liquidity.or(data.liquidity_score);
    let assessment = assess_risk(&data.property, &data.revenue, liquidity);
    Ok(json!({ "result": assessment }))
}

pub fn run_estimate_rent(args: EstimateRentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "result": {
            "purchase_price": args.price,
            "estimated_rent": estimate_rent(args.price),
        }
    }))
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form: FormInput = input::load(args.input.as_deref(), "normalization")?;
    let property = form.property.normalize();
    let revenue = form.revenue.normalize();
    Ok(json!({
        "result": {
            "canonical_form": {
                "property": PropertyForm::from_input(&property),
                "revenue": RevenueForm::from_input(&revenue),
            },
            "property": property,
            "revenue": revenue,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_years_flag_overrides_file() {
        assert_eq!(projection_years(Some(20), 10), Ok(20));
        assert_eq!(projection_years(None, 10), Ok(10));
    }

    #[test]
    fn test_years_capped() {
        let max = analysis::MAX_PROJECTION_YEARS;
        assert_eq!(projection_years(Some(max), 10), Ok(max));
        assert!(projection_years(Some(max + 1), 10).is_err());
        assert!(projection_years(None, max + 1).is_err());
        assert!(projection_years(Some(0), 10).is_err());
    }

    #[test]
    fn test_form_input_halves_are_optional() {
        let form: FormInput =
            serde_json::from_str(r#"{"property": {"purchase_price": "35000000"}}"#).unwrap();
        assert_eq!(form.property.normalize().purchase_price, Decimal::from(350000));
        assert_eq!(form.revenue.normalize().gross_monthly_rent, Decimal::ZERO);
    }
}
