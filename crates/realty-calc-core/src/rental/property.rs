use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{compute_amortization, solve_term_months};
use crate::types::{Money, Percent};

/// Notary / registry fee charged on the purchase price when none is given.
pub const DEFAULT_NOTARY_FEE_RATE: Percent = dec!(3.0);

/// Expected vacancy when none is given.
pub const DEFAULT_VACANCY_RATE: Percent = dec!(8.0);

fn default_notary_fee_rate() -> Percent {
    DEFAULT_NOTARY_FEE_RATE
}

fn default_vacancy_rate() -> Percent {
    DEFAULT_VACANCY_RATE
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
    Rural,
}

impl PropertyType {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
            PropertyType::Rural => "rural",
        }
    }
}

/// Purchase and financing parameters of a single property.
///
/// Records are values: every `with_*` method returns a new record and keeps the
/// dependent fields consistent (financed amount from price and down payment,
/// installment and term from each other at a fixed rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Acquisition price
    pub purchase_price: Money,
    /// Equity paid upfront
    pub down_payment: Money,
    /// Loan principal (purchase_price - down_payment)
    #[serde(default)]
    pub financed_amount: Money,
    /// Nominal annual interest rate in percent
    #[serde(default)]
    pub interest_rate_annual: Percent,
    /// Number of monthly installments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    /// Fixed monthly installment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Money>,
    /// Notary / registry fee in percent of the purchase price
    #[serde(default = "default_notary_fee_rate")]
    pub notary_fee_rate: Percent,
    /// Renovation and furnishing
    #[serde(default)]
    pub renovation_cost: Money,
    #[serde(default)]
    pub other_costs: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
}

/// Rental income assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueInput {
    pub gross_monthly_rent: Money,
    /// Expected share of rent lost to vacancy, in percent
    #[serde(default = "default_vacancy_rate")]
    pub vacancy_rate_percent: Percent,
    #[serde(default)]
    pub condo_fee: Money,
    /// Monthly property tax (IPTU)
    #[serde(default)]
    pub property_tax: Money,
    #[serde(default)]
    pub fixed_expenses: Money,
    /// When true the tenant pays condo, tax and fixed expenses directly
    #[serde(default)]
    pub tenant_pays_costs: bool,
    /// Extra monthly owner contributions counted towards payback
    #[serde(default)]
    pub monthly_contributions: Money,
}

// ---------------------------------------------------------------------------
// PropertyInput
// ---------------------------------------------------------------------------

impl PropertyInput {
    /// Record with no financing terms yet. The financed amount is derived from
    /// price and down payment.
    pub fn new(purchase_price: Money, down_payment: Money) -> Self {
        let input = PropertyInput {
            purchase_price,
            down_payment,
            financed_amount: Decimal::ZERO,
            interest_rate_annual: Decimal::ZERO,
            term_months: None,
            installment: None,
            notary_fee_rate: DEFAULT_NOTARY_FEE_RATE,
            renovation_cost: Decimal::ZERO,
            other_costs: Decimal::ZERO,
            property_type: None,
        };
        input.reconciled()
    }

    /// `purchase_price - down_payment`, only when both are known (> 0).
    pub fn expected_financed_amount(&self) -> Option<Money> {
        if self.purchase_price > Decimal::ZERO && self.down_payment > Decimal::ZERO {
            Some(self.purchase_price - self.down_payment)
        } else {
            None
        }
    }

    /// Copy with `financed_amount` recomputed from price and down payment.
    /// Left untouched when either is unknown.
    pub fn reconciled(&self) -> Self {
        let mut next = self.clone();
        if let Some(financed) = self.expected_financed_amount() {
            next.financed_amount = financed;
        }
        next
    }

    pub fn with_purchase_price(&self, purchase_price: Money) -> Self {
        PropertyInput {
            purchase_price,
            ..self.clone()
        }
        .reconciled()
    }

    pub fn with_down_payment(&self, down_payment: Money) -> Self {
        PropertyInput {
            down_payment,
            ..self.clone()
        }
        .reconciled()
    }

    /// Set rate and term together; the installment is derived from them.
    pub fn with_financing(&self, interest_rate_annual: Percent, term_months: u32) -> Self {
        PropertyInput {
            interest_rate_annual,
            ..self.clone()
        }
        .with_term_months(term_months)
    }

    /// Set the rate and re-derive the installment from the current term.
    pub fn with_interest_rate(&self, interest_rate_annual: Percent) -> Self {
        let next = PropertyInput {
            interest_rate_annual,
            ..self.clone()
        };
        match next.term_months {
            Some(term) => next.with_term_months(term),
            None => next,
        }
    }

    /// Set the term; the installment follows when the annuity formula applies,
    /// otherwise it keeps its previous value.
    pub fn with_term_months(&self, term_months: u32) -> Self {
        let mut next = self.clone();
        next.term_months = Some(term_months);
        if let Some(amort) =
            compute_amortization(next.financed_amount, next.interest_rate_annual, term_months)
        {
            next.installment = Some(amort.installment);
        }
        next
    }

    /// Set the installment; the term follows when it can be solved for,
    /// otherwise it keeps its previous value.
    pub fn with_installment(&self, installment: Money) -> Self {
        let mut next = self.clone();
        next.installment = Some(installment);
        if let Some(term) =
            solve_term_months(next.financed_amount, next.interest_rate_annual, installment)
        {
            next.term_months = Some(term);
        }
        next
    }

    /// Installment used for cash flow: the stated one, else derived from
    /// financed amount, rate and term, else zero (no debt service).
    pub fn effective_installment(&self) -> Money {
        if let Some(installment) = self.installment {
            return installment;
        }
        self.term_months
            .and_then(|term| {
                compute_amortization(self.financed_amount, self.interest_rate_annual, term)
            })
            .map(|amort| amort.installment)
            .unwrap_or(Decimal::ZERO)
    }

    /// Notary / registry fee in currency. Saturates instead of overflowing.
    pub fn notary_fee(&self) -> Money {
        self.purchase_price.saturating_mul(self.notary_fee_rate) / dec!(100)
    }

    pub fn is_financed(&self) -> bool {
        self.financed_amount > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// RevenueInput
// ---------------------------------------------------------------------------

impl RevenueInput {
    /// Rent only, with the default vacancy and no other costs.
    pub fn new(gross_monthly_rent: Money) -> Self {
        RevenueInput {
            gross_monthly_rent,
            vacancy_rate_percent: DEFAULT_VACANCY_RATE,
            condo_fee: Decimal::ZERO,
            property_tax: Decimal::ZERO,
            fixed_expenses: Decimal::ZERO,
            tenant_pays_costs: false,
            monthly_contributions: Decimal::ZERO,
        }
    }

    /// Condo fee + property tax + fixed expenses, regardless of who pays them.
    pub fn recurring_costs(&self) -> Money {
        self.condo_fee
            .saturating_add(self.property_tax)
            .saturating_add(self.fixed_expenses)
    }
}
