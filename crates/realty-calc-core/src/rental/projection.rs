use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::rental::cash_flow::compute_cash_flow;
use crate::rental::property::{PropertyInput, RevenueInput};
use crate::types::{Money, Percent};

pub const DEFAULT_PROJECTION_YEARS: u32 = 10;
pub const DEFAULT_APPRECIATION_RATE: Percent = dec!(5);

/// One year of the wealth projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    /// purchase_price * (1 + appreciation)^year
    pub property_value: Money,
    /// property_value - purchase_price
    pub appreciation_gain: Money,
    /// net_monthly_income * 12 * year
    pub cumulative_rent: Money,
    /// net_monthly_cash_flow * 12 * year (after debt service)
    pub cumulative_cash_flow: Money,
    /// cumulative_rent + property_value
    pub total_wealth: Money,
    /// cumulative_rent + appreciation_gain
    pub total_profit: Money,
}

/// Which returns the projection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Rent only; the property is held at its purchase price
    #[serde(alias = "aluguel")]
    Rental,
    /// Appreciation only; no rent is collected
    #[serde(alias = "revenda")]
    Resale,
    /// Rent and appreciation
    #[default]
    #[serde(alias = "completa")]
    Full,
}

impl AnalysisMode {
    pub fn counts_rent(&self) -> bool {
        matches!(self, AnalysisMode::Rental | AnalysisMode::Full)
    }

    pub fn counts_appreciation(&self) -> bool {
        matches!(self, AnalysisMode::Resale | AnalysisMode::Full)
    }
}

/// Year 0..=`years` series of rent accumulation and compound appreciation.
///
/// Always returns `years + 1` points. Appreciation below -100% is treated as a
/// total loss of value; growth that leaves the decimal range saturates.
pub fn build_projection(
    property: &PropertyInput,
    revenue: &RevenueInput,
    years: u32,
    appreciation_rate: Percent,
) -> Vec<ProjectionPoint> {
    build_projection_for(property, revenue, years, appreciation_rate, AnalysisMode::Full)
}

/// `build_projection` restricted to the returns `mode` counts. Excluded series
/// stay at zero (rent) or at the purchase price (property value).
pub fn build_projection_for(
    property: &PropertyInput,
    revenue: &RevenueInput,
    years: u32,
    appreciation_rate: Percent,
    mode: AnalysisMode,
) -> Vec<ProjectionPoint> {
    let cash_flow = compute_cash_flow(property, revenue);
    let (annual_income, annual_cash_flow) = if mode.counts_rent() {
        (cash_flow.annual_net_income, cash_flow.annual_net_cash_flow)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let growth = if mode.counts_appreciation() {
        (Decimal::ONE + appreciation_rate / dec!(100)).max(Decimal::ZERO)
    } else {
        Decimal::ONE
    };
    let purchase_price = property.purchase_price;

    let mut points = Vec::with_capacity(years as usize + 1);
    let mut property_value = purchase_price;

    for year in 0..=years {
        if year > 0 {
            property_value = property_value.checked_mul(growth).unwrap_or(Decimal::MAX);
        }
        let elapsed = Decimal::from(year);
        let cumulative_rent = annual_income.saturating_mul(elapsed);
        let appreciation_gain = property_value.saturating_sub(purchase_price);

        points.push(ProjectionPoint {
            year,
            property_value,
            appreciation_gain,
            cumulative_rent,
            cumulative_cash_flow: annual_cash_flow.saturating_mul(elapsed),
            total_wealth: cumulative_rent.saturating_add(property_value),
            total_profit: cumulative_rent.saturating_add(appreciation_gain),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (PropertyInput, RevenueInput) {
        let property = PropertyInput::new(dec!(350000), dec!(350000));
        let revenue = RevenueInput {
            condo_fee: dec!(300),
            property_tax: dec!(100),
            ..RevenueInput::new(dec!(2500))
        };
        (property, revenue)
    }

    #[test]
    fn test_point_count_and_origin() {
        let (p, r) = sample();
        for years in [0u32, 1, 5, 10, 30] {
            let points = build_projection(&p, &r, years, DEFAULT_APPRECIATION_RATE);
            assert_eq!(points.len(), years as usize + 1);
            assert_eq!(points[0].year, 0);
            assert_eq!(points[0].property_value, dec!(350000));
            assert_eq!(points[0].cumulative_rent, Decimal::ZERO);
            assert_eq!(points[0].appreciation_gain, Decimal::ZERO);
            assert_eq!(points[0].total_wealth, dec!(350000));
        }
    }

    #[test]
    fn test_compound_appreciation() {
        let (p, r) = sample();
        let points = build_projection(&p, &r, 2, dec!(5));
        assert_eq!(points[1].property_value, dec!(367500));
        assert_eq!(points[2].property_value, dec!(385875));
        assert_eq!(points[2].appreciation_gain, dec!(35875));
    }

    #[test]
    fn test_rent_accumulates_linearly() {
        let (p, r) = sample();
        let points = build_projection(&p, &r, 10, dec!(5));
        // 1900 net per month
        assert_eq!(points[1].cumulative_rent, dec!(22800));
        assert_eq!(points[10].cumulative_rent, dec!(228000));
        assert_eq!(
            points[10].total_wealth,
            points[10].cumulative_rent + points[10].property_value
        );
        assert_eq!(
            points[10].total_profit,
            points[10].cumulative_rent + points[10].appreciation_gain
        );
    }

    #[test]
    fn test_cash_flow_series_includes_debt_service() {
        let (_, r) = sample();
        let financed = PropertyInput::new(dec!(350000), dec!(70000)).with_installment(dec!(1000));
        let points = build_projection(&financed, &r, 3, dec!(5));
        // 1900 - 1000 = 900 per month
        assert_eq!(points[3].cumulative_cash_flow, dec!(32400));
        assert_eq!(points[3].cumulative_rent, dec!(68400));
    }

    #[test]
    fn test_zero_and_negative_appreciation() {
        let (p, r) = sample();
        let flat = build_projection(&p, &r, 3, Decimal::ZERO);
        assert!(flat.iter().all(|pt| pt.property_value == dec!(350000)));

        let falling = build_projection(&p, &r, 1, dec!(-10));
        assert_eq!(falling[1].property_value, dec!(315000));

        let wiped = build_projection(&p, &r, 2, dec!(-150));
        assert_eq!(wiped[1].property_value, Decimal::ZERO);
        assert_eq!(wiped[2].property_value, Decimal::ZERO);
    }

    #[test]
    fn test_rental_mode_holds_value() {
        let (p, r) = sample();
        let points = build_projection_for(&p, &r, 5, dec!(5), AnalysisMode::Rental);
        assert!(points.iter().all(|pt| pt.property_value == dec!(350000)));
        assert!(points.iter().all(|pt| pt.appreciation_gain.is_zero()));
        assert_eq!(points[5].cumulative_rent, dec!(114000));
    }

    #[test]
    fn test_resale_mode_drops_rent() {
        let (p, r) = sample();
        let points = build_projection_for(&p, &r, 2, dec!(5), AnalysisMode::Resale);
        assert!(points.iter().all(|pt| pt.cumulative_rent.is_zero()));
        assert!(points.iter().all(|pt| pt.cumulative_cash_flow.is_zero()));
        assert_eq!(points[2].property_value, dec!(385875));
        assert_eq!(points[2].total_profit, dec!(35875));
    }

    #[test]
    fn test_full_mode_matches_default() {
        let (p, r) = sample();
        assert_eq!(
            build_projection_for(&p, &r, 10, dec!(5), AnalysisMode::Full),
            build_projection(&p, &r, 10, dec!(5))
        );
    }

    #[test]
    fn test_mode_accepts_form_values() {
        let mode: AnalysisMode = serde_json::from_str(r#""revenda""#).unwrap();
        assert_eq!(mode, AnalysisMode::Resale);
        let mode: AnalysisMode = serde_json::from_str(r#""rental""#).unwrap();
        assert_eq!(mode, AnalysisMode::Rental);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let property = PropertyInput::new(Decimal::MAX, dec!(1));
        let revenue = RevenueInput::new(Decimal::MAX);
        let points = build_projection(&property, &revenue, 50, dec!(5));
        assert_eq!(points.len(), 51);
        assert_eq!(points[50].property_value, Decimal::MAX);
        assert_eq!(points[50].total_wealth, Decimal::MAX);
        assert_eq!(points[50].appreciation_gain, Decimal::ZERO);
    }

    #[test]
    fn test_recomputed_from_scratch() {
        let (p, r) = sample();
        let first = build_projection(&p, &r, 10, dec!(5));
        let second = build_projection(&p, &r, 10, dec!(5));
        assert_eq!(first, second);
    }
}
