use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values in computation form. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Monetary values in transport form: integer minor units (cents).
pub type Cents = i64;

/// Rates as they are entered and reported, in percent units (8.0 = 8%).
pub type Percent = Decimal;

/// Rates expressed as decimals (0.00875 = 0.875% per period).
pub type Rate = Decimal;

/// Bounded 0–100 score where higher means safer.
pub type Score = Decimal;

/// Currency the amounts are denominated in. Display only; no conversion is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    Other(String),
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
