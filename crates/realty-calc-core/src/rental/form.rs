use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::{
    money_to_cents, parse_count, parse_flag, parse_money, parse_percent, parse_percent_or,
    AmountUnit,
};
use crate::rental::property::{
    PropertyInput, PropertyType, RevenueInput, DEFAULT_NOTARY_FEE_RATE, DEFAULT_VACANCY_RATE,
};
use crate::types::Money;

/// Property form exactly as captured: money fields are digit strings in
/// `amount_unit` (cents unless stated), rates are percent strings. Every field
/// may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyForm {
    pub amount_unit: AmountUnit,
    pub purchase_price: String,
    pub down_payment: String,
    pub financed_amount: String,
    pub interest_rate: String,
    pub term_months: String,
    pub installment: String,
    pub notary_fee_rate: String,
    pub renovation_cost: String,
    pub other_costs: String,
    pub property_type: String,
}

/// Revenue form exactly as captured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueForm {
    pub amount_unit: AmountUnit,
    pub gross_monthly_rent: String,
    pub vacancy_rate: String,
    pub condo_fee: String,
    pub property_tax: String,
    pub fixed_expenses: String,
    pub tenant_pays_costs: String,
    pub monthly_contributions: String,
}

impl PropertyForm {
    /// Convert to a computation record. Never fails; unreadable fields become
    /// zero or their default.
    ///
    /// A financed amount is taken from the form only when price or down payment
    /// is missing; otherwise it is recomputed. When both installment and term
    /// are filled in, the installment wins and the term is re-derived from it.
    pub fn normalize(&self) -> PropertyInput {
        let money = |raw: &str| parse_money(raw, self.amount_unit);
        let mut input = PropertyInput::new(money(&self.purchase_price), money(&self.down_payment));
        if input.expected_financed_amount().is_none() {
            input.financed_amount = money(&self.financed_amount);
        }
        input.interest_rate_annual = parse_percent(&self.interest_rate);
        input.notary_fee_rate = parse_percent_or(&self.notary_fee_rate, DEFAULT_NOTARY_FEE_RATE);
        input.renovation_cost = money(&self.renovation_cost);
        input.other_costs = money(&self.other_costs);
        input.property_type = parse_property_type(&self.property_type);

        if let Some(term) = parse_count(&self.term_months) {
            input = input.with_term_months(term);
        }
        let installment = money(&self.installment);
        if !installment.is_zero() {
            input = input.with_installment(installment);
        }
        input
    }

    /// Form fields for a record, money in cents, derived fields filled in.
    /// Normalizing the result gives the record back up to cent rounding.
    pub fn from_input(input: &PropertyInput) -> Self {
        PropertyForm {
            amount_unit: AmountUnit::Cents,
            purchase_price: cents_text(input.purchase_price),
            down_payment: cents_text(input.down_payment),
            financed_amount: cents_text(input.financed_amount),
            interest_rate: percent_text(input.interest_rate_annual),
            term_months: input.term_months.map(|t| t.to_string()).unwrap_or_default(),
            installment: input.installment.map(cents_text).unwrap_or_default(),
            notary_fee_rate: percent_text(input.notary_fee_rate),
            renovation_cost: cents_text(input.renovation_cost),
            other_costs: cents_text(input.other_costs),
            property_type: input
                .property_type
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
        }
    }
}

impl RevenueForm {
    pub fn normalize(&self) -> RevenueInput {
        let money = |raw: &str| parse_money(raw, self.amount_unit);
        RevenueInput {
            gross_monthly_rent: money(&self.gross_monthly_rent),
            vacancy_rate_percent: parse_percent_or(&self.vacancy_rate, DEFAULT_VACANCY_RATE),
            condo_fee: money(&self.condo_fee),
            property_tax: money(&self.property_tax),
            fixed_expenses: money(&self.fixed_expenses),
            tenant_pays_costs: parse_flag(&self.tenant_pays_costs),
            monthly_contributions: money(&self.monthly_contributions),
        }
    }

    pub fn from_input(input: &RevenueInput) -> Self {
        RevenueForm {
            amount_unit: AmountUnit::Cents,
            gross_monthly_rent: cents_text(input.gross_monthly_rent),
            vacancy_rate: percent_text(input.vacancy_rate_percent),
            condo_fee: cents_text(input.condo_fee),
            property_tax: cents_text(input.property_tax),
            fixed_expenses: cents_text(input.fixed_expenses),
            tenant_pays_costs: if input.tenant_pays_costs { "sim" } else { "nao" }.to_string(),
            monthly_contributions: cents_text(input.monthly_contributions),
        }
    }
}

fn cents_text(amount: Money) -> String {
    money_to_cents(amount).to_string()
}

fn percent_text(rate: Decimal) -> String {
    rate.normalize().to_string()
}

/// Accepts the English names and the Portuguese select values.
fn parse_property_type(raw: &str) -> Option<PropertyType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "residential" | "residencial" => Some(PropertyType::Residential),
        "commercial" | "comercial" => Some(PropertyType::Commercial),
        "rural" => Some(PropertyType::Rural),
        _ => None,
    }
}
