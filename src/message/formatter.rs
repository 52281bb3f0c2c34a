use crate::error::ValidationError;
use crate::outcome::ValidationOutcome;
use crate::schema::FormulaSchema;

/// Turns validation errors into user-facing messages, using the schema's field labels.
///
/// Every error kind maps to exactly one message template.
pub struct MessageFormatter<'a> {
    schema: &'a FormulaSchema,
}

impl<'a> MessageFormatter<'a> {
    pub fn new(schema: &'a FormulaSchema) -> Self {
        Self { schema }
    }

    pub fn format_error(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::Parse { field, raw } => {
                format!("{}: '{}' is not a valid number", self.label(field), raw)
            }
            ValidationError::Range {
                field,
                value,
                minimum,
                maximum,
            } => format!(
                "{} must be {} (you entered {})",
                self.label(field),
                Self::format_bounds(*minimum, *maximum),
                Self::format_value(*value)
            ),
            ValidationError::ZeroNotAllowed { field } => {
                format!("{} cannot be zero", self.label(field))
            }
            ValidationError::ConflictingInput { first, second } => format!(
                "{} and {} cannot both be entered; clear one of them",
                self.label(first),
                self.label(second)
            ),
            ValidationError::InsufficientData { missing } => format!(
                "Enter {} more value{} to calculate {}",
                missing,
                if *missing == 1 { "" } else { "s" },
                self.schema.target_label()
            ),
            ValidationError::UnitConversion { field, unit, reason } => format!(
                "{}: the unit '{}' cannot be used here ({})",
                self.label(field),
                unit,
                reason
            ),
            ValidationError::Calculation { reason, .. } => format!(
                "{} could not be calculated: {}. Check your inputs",
                self.schema.target_label(),
                reason
            ),
            ValidationError::PhysicallyImpossibleResult {
                quantity,
                value,
                reason,
            } => format!(
                "{} came out as {}, which is physically impossible: {}",
                self.label(quantity),
                Self::format_value(*value),
                reason
            ),
        }
    }

    /// `None` for a valid outcome.
    pub fn format_outcome(&self, outcome: &ValidationOutcome) -> Option<String> {
        match outcome {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(e) => Some(self.format_error(e)),
            ValidationOutcome::InsufficientData { missing } => {
                Some(self.format_error(&ValidationError::InsufficientData { missing: *missing }))
            }
        }
    }

    fn label<'b>(&'b self, name: &'b str) -> &'b str {
        self.schema.label_for(name)
    }

    fn format_bounds(minimum: f64, maximum: f64) -> String {
        match (minimum.is_finite(), maximum.is_finite()) {
            (true, true) => format!(
                "between {} and {}",
                Self::format_value(minimum),
                Self::format_value(maximum)
            ),
            (true, false) => format!("at least {}", Self::format_value(minimum)),
            (false, true) => format!("at most {}", Self::format_value(maximum)),
            (false, false) => "a finite number".to_string(),
        }
    }

    /// Format a value for display.
    pub fn format_value(value: f64) -> String {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else if value != 0.0 && (value.abs() < 1e-3 || value.abs() >= 1e6) {
            format!("{:.3e}", value)
        } else {
            format!("{}", value)
        }
    }
}
