use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    amortization_for_installment, compute_amortization, solve_term_months, Amortization,
};
use crate::error::RealtyError;
use crate::rental::cash_flow::{compute_cash_flow, CashFlowBreakdown};
use crate::rental::metrics::{compute_metrics_with, CapitalBasis, ComputedMetrics, Payback};
use crate::rental::projection::{
    build_projection_for, AnalysisMode, ProjectionPoint, DEFAULT_APPRECIATION_RATE,
    DEFAULT_PROJECTION_YEARS,
};
use crate::rental::property::{PropertyInput, RevenueInput};
use crate::rental::risk::{assess_risk, RiskAssessment};
use crate::types::{with_metadata, ComputationOutput, Currency, Percent, Score};
use crate::RealtyResult;

/// Longest projection horizon accepted by `analyze`.
pub const MAX_PROJECTION_YEARS: u32 = 50;

fn default_projection_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

fn default_appreciation_rate() -> Percent {
    DEFAULT_APPRECIATION_RATE
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything one "Calculate" needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub property: PropertyInput,
    pub revenue: RevenueInput,
    /// Projection horizon in years
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
    /// Annual property appreciation in percent
    #[serde(default = "default_appreciation_rate")]
    pub appreciation_rate: Percent,
    #[serde(default)]
    pub capital_basis: CapitalBasis,
    /// Returns counted by the projection
    #[serde(default)]
    pub analysis_mode: AnalysisMode,
    /// Market liquidity score 0–100 for the risk assessment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity_score: Option<Score>,
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub currency: Currency,
    /// Property record after reconciling derived fields
    pub property: PropertyInput,
    /// Loan figures when the property is financed and the annuity applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amortization: Option<Amortization>,
    pub cash_flow: CashFlowBreakdown,
    pub metrics: ComputedMetrics,
    pub projection: Vec<ProjectionPoint>,
    pub risk_assessment: RiskAssessment,
}

impl AnalysisInput {
    pub fn new(property: PropertyInput, revenue: RevenueInput) -> Self {
        AnalysisInput {
            property,
            revenue,
            projection_years: DEFAULT_PROJECTION_YEARS,
            appreciation_rate: DEFAULT_APPRECIATION_RATE,
            capital_basis: CapitalBasis::default(),
            analysis_mode: AnalysisMode::default(),
            liquidity_score: None,
            currency: Currency::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full analysis: financing, monthly cash flow, ROI/payback/risk,
/// projection and qualitative risk.
///
/// Fails only on missing or contradictory required input. Everything else that
/// looks off is reported in `warnings`.
pub fn analyze(input: &AnalysisInput) -> RealtyResult<ComputationOutput<AnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let property = reconcile_property(&input.property, &mut warnings);
    let revenue = &input.revenue;

    let amortization = loan_figures(&property);

    let cash_flow = compute_cash_flow(&property, revenue);
    let metrics = compute_metrics_with(&property, revenue, input.capital_basis);
    let projection = build_projection_for(
        &property,
        revenue,
        input.projection_years,
        input.appreciation_rate,
        input.analysis_mode,
    );
    let risk_assessment = assess_risk(&property, revenue, input.liquidity_score);

    if revenue.gross_monthly_rent.is_zero() {
        warnings.push("Gross monthly rent is zero; all income metrics are zero".into());
    }
    if cash_flow.net_monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow ({:.2}): installment exceeds net rental income",
            cash_flow.net_monthly_cash_flow
        ));
    }
    if metrics.payback == Payback::NotRecoverable {
        warnings.push("Payback not recoverable: monthly cash flow is not positive".into());
    }
    if revenue.vacancy_rate_percent > dec!(20) {
        warnings.push(format!(
            "Vacancy rate of {}% is unusually high",
            revenue.vacancy_rate_percent
        ));
    }

    let output = AnalysisOutput {
        currency: input.currency.clone(),
        property,
        amortization,
        cash_flow,
        metrics,
        projection,
        risk_assessment,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Property Investment Analysis (Price-table financing, income approach)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &AnalysisInput) -> RealtyResult<()> {
    let property = &input.property;
    let revenue = &input.revenue;

    if property.purchase_price <= Decimal::ZERO {
        return Err(RealtyError::invalid(
            "purchase_price",
            "Purchase price is required and must be positive",
        ));
    }
    if property.down_payment <= Decimal::ZERO {
        return Err(RealtyError::invalid(
            "down_payment",
            "Down payment is required and must be positive",
        ));
    }
    if property.down_payment > property.purchase_price {
        return Err(RealtyError::invalid(
            "down_payment",
            "Down payment cannot exceed the purchase price",
        ));
    }
    if property.interest_rate_annual < Decimal::ZERO {
        return Err(RealtyError::invalid(
            "interest_rate_annual",
            "Interest rate cannot be negative",
        ));
    }
    for (field, value) in [
        ("renovation_cost", property.renovation_cost),
        ("other_costs", property.other_costs),
        ("notary_fee_rate", property.notary_fee_rate),
        ("gross_monthly_rent", revenue.gross_monthly_rent),
        ("condo_fee", revenue.condo_fee),
        ("property_tax", revenue.property_tax),
        ("fixed_expenses", revenue.fixed_expenses),
        ("monthly_contributions", revenue.monthly_contributions),
    ] {
        if value < Decimal::ZERO {
            return Err(RealtyError::invalid(field, "Must not be negative"));
        }
    }
    if revenue.vacancy_rate_percent < Decimal::ZERO || revenue.vacancy_rate_percent > dec!(100) {
        return Err(RealtyError::invalid(
            "vacancy_rate_percent",
            "Vacancy rate must be between 0 and 100",
        ));
    }
    if input.projection_years == 0 || input.projection_years > MAX_PROJECTION_YEARS {
        return Err(RealtyError::invalid(
            "projection_years",
            format!("Projection horizon must be between 1 and {MAX_PROJECTION_YEARS} years"),
        ));
    }
    Ok(())
}

/// Bring financed amount, installment and term back in line, noting every
/// correction as a warning.
fn reconcile_property(property: &PropertyInput, warnings: &mut Vec<String>) -> PropertyInput {
    let reconciled = property.reconciled();
    if reconciled.financed_amount != property.financed_amount && !property.financed_amount.is_zero()
    {
        warnings.push(format!(
            "Financed amount {} does not match purchase price minus down payment; using {}",
            property.financed_amount, reconciled.financed_amount
        ));
    }

    if !reconciled.is_financed() {
        return reconciled;
    }

    match (reconciled.installment, reconciled.term_months) {
        (None, Some(term)) => {
            let derived = reconciled.with_term_months(term);
            if derived.installment.is_none() {
                warnings.push(
                    "Installment could not be derived: a positive interest rate and term are required"
                        .into(),
                );
            }
            derived
        }
        (Some(installment), None) => {
            let derived = reconciled.with_installment(installment);
            if derived.term_months.is_none() {
                warnings.push(
                    "Term could not be derived: installment does not cover the monthly interest"
                        .into(),
                );
            }
            derived
        }
        (None, None) => {
            warnings.push(
                "Property is financed but neither installment nor term was given; debt service assumed zero"
                    .into(),
            );
            reconciled
        }
        (Some(installment), Some(term)) => {
            let solved = solve_term_months(
                reconciled.financed_amount,
                reconciled.interest_rate_annual,
                installment,
            );
            match solved {
                Some(solved) if solved != term => warnings.push(format!(
                    "Term of {term} months does not match the installment of {installment}; using {solved} months"
                )),
                None if reconciled.interest_rate_annual > Decimal::ZERO => warnings.push(format!(
                    "Installment of {installment} does not cover the monthly interest; the loan never amortizes"
                )),
                _ => {}
            }
            reconciled.with_installment(installment)
        }
    }
}

/// Loan figures consistent with the installment the cash flow deducts: built
/// from the stated installment when there is one, else from the term.
fn loan_figures(property: &PropertyInput) -> Option<Amortization> {
    let term = property.term_months?;
    match property.installment {
        Some(installment) => amortization_for_installment(
            property.financed_amount,
            property.interest_rate_annual,
            term,
            installment,
        ),
        None => {
            compute_amortization(property.financed_amount, property.interest_rate_annual, term)
        }
    }
}
