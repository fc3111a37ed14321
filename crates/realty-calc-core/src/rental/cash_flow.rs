use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::rental::property::{PropertyInput, RevenueInput};
use crate::types::{Money, Percent, Rate};

/// Monthly rent estimate as a share of the purchase price (0.6% per month).
pub const RENT_TO_PRICE_RATIO: Rate = dec!(0.006);

/// Monthly income statement of a rented property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowBreakdown {
    pub gross_monthly_rent: Money,
    /// Condo + tax + fixed expenses borne by the landlord (zero when the tenant pays)
    pub pass_through_costs: Money,
    pub vacancy_loss: Money,
    /// Rent after costs and vacancy, before debt service
    pub net_monthly_income: Money,
    /// Debt service deducted from income
    pub installment: Money,
    /// Income after debt service; negative means negative leverage
    pub net_monthly_cash_flow: Money,
    pub annual_net_income: Money,
    pub annual_net_cash_flow: Money,
}

/// ```text
/// pass_through = tenant_pays_costs ? 0 : condo + tax + fixed
/// vacancy_loss = rent * vacancy% / 100
/// net_income   = rent - pass_through - vacancy_loss
/// cash_flow    = net_income - installment
/// ```
///
/// Every step saturates at the `Decimal` range, so the breakdown is defined for
/// any input.
pub fn compute_cash_flow(property: &PropertyInput, revenue: &RevenueInput) -> CashFlowBreakdown {
    let pass_through_costs = if revenue.tenant_pays_costs {
        Decimal::ZERO
    } else {
        revenue.recurring_costs()
    };
    let vacancy_loss = vacancy_loss(revenue.gross_monthly_rent, revenue.vacancy_rate_percent);
    let net_monthly_income = revenue
        .gross_monthly_rent
        .saturating_sub(pass_through_costs)
        .saturating_sub(vacancy_loss);

    let installment = property.effective_installment();
    let net_monthly_cash_flow = net_monthly_income.saturating_sub(installment);

    CashFlowBreakdown {
        gross_monthly_rent: revenue.gross_monthly_rent,
        pass_through_costs,
        vacancy_loss,
        net_monthly_income,
        installment,
        net_monthly_cash_flow,
        annual_net_income: net_monthly_income.saturating_mul(dec!(12)),
        annual_net_cash_flow: net_monthly_cash_flow.saturating_mul(dec!(12)),
    }
}

pub fn vacancy_loss(gross_monthly_rent: Money, vacancy_rate_percent: Percent) -> Money {
    gross_monthly_rent.saturating_mul(vacancy_rate_percent) / dec!(100)
}

/// Rule-of-thumb monthly rent for a property bought at `purchase_price`.
pub fn estimate_rent(purchase_price: Money) -> Money {
    if purchase_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    purchase_price * RENT_TO_PRICE_RATIO
}
