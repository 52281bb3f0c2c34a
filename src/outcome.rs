use crate::error::ValidationError;

/// The declarative result of a validation pass, handed to the form layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every populated field is valid and enough of them are present to solve.
    Valid,
    /// A field, a field combination, or the calculation itself was rejected.
    Invalid(ValidationError),
    /// More fields must be filled in before the formula can be solved.
    InsufficientData { missing: usize },
}

impl ValidationOutcome {
    /// Wraps an error, routing `InsufficientData` to its own variant.
    pub fn from_error(error: ValidationError) -> Self {
        match error {
            ValidationError::InsufficientData { missing } => {
                ValidationOutcome::InsufficientData { missing }
            }
            other => ValidationOutcome::Invalid(other),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationOutcome::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// Converts back into a `Result`, so outcomes compose with `?`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(e) => Err(e),
            ValidationOutcome::InsufficientData { missing } => {
                Err(ValidationError::InsufficientData { missing })
            }
        }
    }
}

impl<T> From<&Result<T, ValidationError>> for ValidationOutcome {
    fn from(result: &Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => ValidationOutcome::Valid,
            Err(e) => ValidationOutcome::from_error(e.clone()),
        }
    }
}
