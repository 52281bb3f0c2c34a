use crate::error::ValidationError;
use crate::schema::VariableSpec;

/// Classifies one raw text input against its variable spec.
///
/// The text is trimmed before parsing. Non-numeric text and non-finite numbers
/// (`NaN`, `inf`) are parse errors. Bounds are inclusive and checked before the
/// zero rule.
pub fn validate_field(raw: &str, spec: &VariableSpec) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::Parse {
            field: spec.name().to_string(),
            raw: trimmed.to_string(),
        })?;

    if value < spec.minimum() || value > spec.maximum() {
        return Err(ValidationError::Range {
            field: spec.name().to_string(),
            value,
            minimum: spec.minimum(),
            maximum: spec.maximum(),
        });
    }

    if value == 0.0 && !spec.zero_allowed() {
        return Err(ValidationError::ZeroNotAllowed {
            field: spec.name().to_string(),
        });
    }

    Ok(value)
}
