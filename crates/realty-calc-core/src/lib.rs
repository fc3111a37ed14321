pub mod amortization;
pub mod error;
pub mod normalize;
pub mod types;

#[cfg(feature = "rental")]
pub mod rental;

pub use error::RealtyError;
pub use types::*;

/// Standard result type for all realty-calc operations
pub type RealtyResult<T> = Result<T, RealtyError>;
