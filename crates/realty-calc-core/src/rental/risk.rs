use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::rental::property::{PropertyInput, PropertyType, RevenueInput};
use crate::types::{Money, Percent, Score};

/// Liquidity score used when the caller has no market data.
pub const DEFAULT_LIQUIDITY_SCORE: Score = dec!(50);

/// Location score for a property of unknown type.
const UNKNOWN_TYPE_SCORE: Score = dec!(50);

/// Overall score thresholds for the investment advice.
const EXCELLENT_THRESHOLD: Score = dec!(75);
const AVERAGE_THRESHOLD: Score = dec!(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentAdvice {
    Excellent,
    Average,
    Risky,
}

impl InvestmentAdvice {
    pub fn message(&self) -> &'static str {
        match self {
            InvestmentAdvice::Excellent => "Excellent investment: low risk and good return prospects.",
            InvestmentAdvice::Average => "Average investment: weigh the risks before proceeding.",
            InvestmentAdvice::Risky => "Risky investment: proceed with caution and re-evaluate.",
        }
    }
}

/// A single 0–100 factor; higher is safer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub description: String,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub factors: Vec<RiskFactor>,
    /// Mean of all factor scores
    pub overall_score: Score,
    pub advice: InvestmentAdvice,
    pub advice_message: String,
}

/// Score the property on liquidity, location, competition, vacancy and
/// devaluation, then average them into an advice tier.
///
/// `liquidity_score` is supplied by the caller (e.g. from local market data)
/// and clamped to 0–100; `None` uses `DEFAULT_LIQUIDITY_SCORE`.
pub fn assess_risk(
    property: &PropertyInput,
    revenue: &RevenueInput,
    liquidity_score: Option<Score>,
) -> RiskAssessment {
    let liquidity = liquidity_score
        .unwrap_or(DEFAULT_LIQUIDITY_SCORE)
        .clamp(Decimal::ZERO, dec!(100));
    let location = location_score(property.property_type);
    let competition = competition_score(property.purchase_price);
    let vacancy = vacancy_score(revenue.vacancy_rate_percent);
    let devaluation = (location + liquidity) / dec!(2);

    let factors = vec![
        factor("liquidity", "Ease of selling or letting the property", liquidity),
        factor("location", "Quality of the area and infrastructure", location),
        factor("competition", "Availability of similar properties", competition),
        factor("vacancy", "Likelihood of standing empty", vacancy),
        factor("devaluation", "Potential loss of value", devaluation),
    ];

    let overall_score =
        factors.iter().map(|f| f.score).sum::<Decimal>() / Decimal::from(factors.len() as u32);
    let advice = advise(overall_score);

    RiskAssessment {
        factors,
        overall_score,
        advice,
        advice_message: advice.message().to_string(),
    }
}

pub fn location_score(property_type: Option<PropertyType>) -> Score {
    match property_type {
        Some(PropertyType::Residential) => dec!(75),
        Some(PropertyType::Commercial) => dec!(65),
        Some(PropertyType::Rural) => dec!(45),
        None => UNKNOWN_TYPE_SCORE,
    }
}

/// Cheaper properties face a deeper pool of buyers and tenants.
pub fn competition_score(purchase_price: Money) -> Score {
    if purchase_price < dec!(200000) {
        dec!(85)
    } else if purchase_price < dec!(500000) {
        dec!(70)
    } else if purchase_price < dec!(1000000) {
        dec!(55)
    } else {
        dec!(40)
    }
}

pub fn vacancy_score(vacancy_rate_percent: Percent) -> Score {
    if vacancy_rate_percent <= dec!(5) {
        dec!(85)
    } else if vacancy_rate_percent <= dec!(10) {
        dec!(70)
    } else if vacancy_rate_percent <= dec!(15) {
        dec!(55)
    } else {
        dec!(35)
    }
}

pub fn advise(overall_score: Score) -> InvestmentAdvice {
    if overall_score >= EXCELLENT_THRESHOLD {
        InvestmentAdvice::Excellent
    } else if overall_score >= AVERAGE_THRESHOLD {
        InvestmentAdvice::Average
    } else {
        InvestmentAdvice::Risky
    }
}

fn factor(name: &str, description: &str, score: Score) -> RiskFactor {
    RiskFactor {
        name: name.to_string(),
        description: description.to_string(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residential(price: Money) -> PropertyInput {
        PropertyInput {
            property_type: Some(PropertyType::Residential),
            ..PropertyInput::new(price, price / dec!(5))
        }
    }

    fn score_of(assessment: &RiskAssessment, name: &str) -> Score {
        assessment
            .factors
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.score)
            .unwrap()
    }

    #[test]
    fn test_factor_scores() {
        let a = assess_risk(&residential(dec!(350000)), &RevenueInput::new(dec!(2500)), None);
        assert_eq!(a.factors.len(), 5);
        assert_eq!(score_of(&a, "liquidity"), dec!(50));
        assert_eq!(score_of(&a, "location"), dec!(75));
        assert_eq!(score_of(&a, "competition"), dec!(70));
        // default vacancy 8%
        assert_eq!(score_of(&a, "vacancy"), dec!(70));
        assert_eq!(score_of(&a, "devaluation"), dec!(62.5));
        // (50 + 75 + 70 + 70 + 62.5) / 5
        assert_eq!(a.overall_score, dec!(65.5));
        assert_eq!(a.advice, InvestmentAdvice::Average);
    }

    #[test]
    fn test_excellent_with_liquid_market() {
        let revenue = RevenueInput {
            vacancy_rate_percent: dec!(5),
            ..RevenueInput::new(dec!(1200))
        };
        let a = assess_risk(&residential(dec!(150000)), &revenue, Some(dec!(85)));
        // (85 + 75 + 85 + 85 + 80) / 5 = 82
        assert_eq!(a.overall_score, dec!(82));
        assert_eq!(a.advice, InvestmentAdvice::Excellent);
    }

    #[test]
    fn test_risky_rural_expensive_high_vacancy() {
        let property = PropertyInput {
            property_type: Some(PropertyType::Rural),
            ..PropertyInput::new(dec!(2000000), dec!(500000))
        };
        let revenue = RevenueInput {
            vacancy_rate_percent: dec!(20),
            ..RevenueInput::new(dec!(5000))
        };
        let a = assess_risk(&property, &revenue, Some(dec!(30)));
        assert_eq!(a.advice, InvestmentAdvice::Risky);
    }

    #[test]
    fn test_liquidity_is_clamped() {
        let a = assess_risk(&residential(dec!(350000)), &RevenueInput::new(dec!(2500)), Some(dec!(140)));
        assert_eq!(score_of(&a, "liquidity"), dec!(100));
        let a = assess_risk(&residential(dec!(350000)), &RevenueInput::new(dec!(2500)), Some(dec!(-3)));
        assert_eq!(score_of(&a, "liquidity"), Decimal::ZERO);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(competition_score(dec!(199999.99)), dec!(85));
        assert_eq!(competition_score(dec!(200000)), dec!(70));
        assert_eq!(competition_score(dec!(1000000)), dec!(40));
        assert_eq!(vacancy_score(dec!(10)), dec!(70));
        assert_eq!(vacancy_score(dec!(10.01)), dec!(55));
        assert_eq!(vacancy_score(dec!(15.5)), dec!(35));
        assert_eq!(location_score(None), dec!(50));
        assert_eq!(advise(dec!(75)), InvestmentAdvice::Excellent);
        assert_eq!(advise(dec!(59.99)), InvestmentAdvice::Risky);
    }
}
