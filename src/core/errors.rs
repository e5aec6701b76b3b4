use thiserror::Error;

pub type CalculatorResult<T> = Result<T, CalculatorError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalculatorError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("cost series must be aligned by year (rent has {rent} years, buy has {buy})")]
    SeriesLengthMismatch { rent: usize, buy: usize },
}

impl CalculatorError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(*field),
            Self::SeriesLengthMismatch { .. } => None,
        }
    }
}
