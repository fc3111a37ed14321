use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::rental::cash_flow::compute_cash_flow;
use crate::rental::property::{PropertyInput, RevenueInput};
use crate::types::{Money, Percent};

/// CDI reference rate, annual percent. Fixed comparison constant.
pub const CDI_ANNUAL_RATE: Percent = dec!(11.75);

/// Savings account (poupança) reference rate, annual percent. Fixed comparison constant.
pub const SAVINGS_ANNUAL_RATE: Percent = dec!(6.17);

/// Annual ROI at or above which a cash-flow-positive property is viable.
pub const VIABLE_ANNUAL_ROI: Percent = dec!(12);

/// Annual ROI at or above which a property is moderate rather than not viable.
pub const MODERATE_ANNUAL_ROI: Percent = dec!(8);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What counts as the capital invested when computing ROI and payback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalBasis {
    /// purchase_price + renovation_cost + other_costs
    #[default]
    PurchasePrice,
    /// down_payment + notary fee + renovation_cost + other_costs
    EquityInvested,
}

/// Time needed for cumulative monthly cash to recover the invested capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Payback {
    Months { months: Decimal, years: Decimal },
    /// Monthly cash is zero or negative; capital is never recovered.
    NotRecoverable,
}

impl Payback {
    pub fn months(&self) -> Option<Decimal> {
        match self {
            Payback::Months { months, .. } => Some(*months),
            Payback::NotRecoverable => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Payback::Months { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Viable,
    Moderate,
    NotViable,
}

impl RiskLabel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLabel::Viable => "Viable",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::NotViable => "Not Viable",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLabel::Viable => "✅",
            RiskLabel::Moderate => "⚠️",
            RiskLabel::NotViable => "❌",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskLabel::Viable => "green",
            RiskLabel::Moderate => "yellow",
            RiskLabel::NotViable => "red",
        }
    }
}

/// Annual ROI against the fixed reference rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub cdi_annual_rate: Percent,
    pub savings_annual_rate: Percent,
    pub beats_cdi: bool,
    pub beats_savings: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    pub net_monthly_income: Money,
    pub net_monthly_cash_flow: Money,
    pub annual_net_income: Money,
    pub annual_net_cash_flow: Money,
    pub capital_basis: CapitalBasis,
    pub total_invested_capital: Money,
    /// Notary / registry fee on the purchase price
    pub closing_costs: Money,
    /// net_monthly_income / total_invested_capital * 100
    pub monthly_roi: Percent,
    pub annual_roi: Percent,
    pub payback: Payback,
    pub risk: RiskLabel,
    pub risk_label: String,
    pub risk_emoji: String,
    pub risk_color: String,
    pub benchmarks: BenchmarkComparison,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// ROI, payback and risk on the default (purchase price) capital basis.
pub fn compute_metrics(property: &PropertyInput, revenue: &RevenueInput) -> ComputedMetrics {
    compute_metrics_with(property, revenue, CapitalBasis::default())
}

/// ROI, payback and risk on an explicit capital basis.
///
/// Total for any input: zero capital yields zero ROI, payback is
/// `NotRecoverable` whenever monthly cash flow plus contributions is not positive,
/// and sums that leave the `Decimal` range saturate rather than panic.
pub fn compute_metrics_with(
    property: &PropertyInput,
    revenue: &RevenueInput,
    basis: CapitalBasis,
) -> ComputedMetrics {
    let cash_flow = compute_cash_flow(property, revenue);
    let total_invested_capital = total_invested_capital(property, basis);

    let monthly_roi = cash_flow
        .net_monthly_income
        .checked_div(total_invested_capital)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO);
    let annual_roi = monthly_roi.saturating_mul(dec!(12));

    let payback = payback(
        total_invested_capital,
        cash_flow
            .net_monthly_cash_flow
            .saturating_add(revenue.monthly_contributions),
    );
    let risk = classify_risk(annual_roi, cash_flow.net_monthly_cash_flow);

    ComputedMetrics {
        net_monthly_income: cash_flow.net_monthly_income,
        net_monthly_cash_flow: cash_flow.net_monthly_cash_flow,
        annual_net_income: cash_flow.annual_net_income,
        annual_net_cash_flow: cash_flow.annual_net_cash_flow,
        capital_basis: basis,
        total_invested_capital,
        closing_costs: property.notary_fee(),
        monthly_roi,
        annual_roi,
        payback,
        risk,
        risk_label: risk.label().to_string(),
        risk_emoji: risk.emoji().to_string(),
        risk_color: risk.color().to_string(),
        benchmarks: compare_benchmarks(annual_roi),
    }
}

pub fn total_invested_capital(property: &PropertyInput, basis: CapitalBasis) -> Money {
    let extras = property.renovation_cost.saturating_add(property.other_costs);
    match basis {
        CapitalBasis::PurchasePrice => property.purchase_price.saturating_add(extras),
        CapitalBasis::EquityInvested => property
            .down_payment
            .saturating_add(property.notary_fee())
            .saturating_add(extras),
    }
}

/// `capital / monthly_recovery`, or `NotRecoverable` when recovery is not positive.
pub fn payback(capital: Money, monthly_recovery: Money) -> Payback {
    if monthly_recovery <= Decimal::ZERO {
        return Payback::NotRecoverable;
    }
    match capital.max(Decimal::ZERO).checked_div(monthly_recovery) {
        Some(months) => Payback::Months {
            months,
            years: months / dec!(12),
        },
        None => Payback::NotRecoverable,
    }
}

/// ```text
/// annual_roi >= 12 and cash flow > 0  => Viable
/// annual_roi >= 8                     => Moderate
/// otherwise                           => NotViable
/// ```
pub fn classify_risk(annual_roi: Percent, net_monthly_cash_flow: Money) -> RiskLabel {
    if annual_roi >= VIABLE_ANNUAL_ROI && net_monthly_cash_flow > Decimal::ZERO {
        RiskLabel::Viable
    } else if annual_roi >= MODERATE_ANNUAL_ROI {
        RiskLabel::Moderate
    } else {
        RiskLabel::NotViable
    }
}

pub fn compare_benchmarks(annual_roi: Percent) -> BenchmarkComparison {
    BenchmarkComparison {
        cdi_annual_rate: CDI_ANNUAL_RATE,
        savings_annual_rate: SAVINGS_ANNUAL_RATE,
        beats_cdi: annual_roi > CDI_ANNUAL_RATE,
        beats_savings: annual_roi > SAVINGS_ANNUAL_RATE,
    }
}
