use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtyError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },
}

impl RealtyError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RealtyError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
