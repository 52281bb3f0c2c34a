use super::definition::FormulaDefinition;
use crate::error::ConversionError;

/// A trait for custom configuration models that can be converted into a `FormulaDefinition`.
///
/// This is the extension point for loading formula rules from formats other than the
/// built-in JSON catalog. Implement it on your own structs and hand the result to
/// [`SchemaCompiler`](crate::compiler::SchemaCompiler).
///
/// # Example
///
/// ```rust
/// use kakunin::error::ConversionError;
/// use kakunin::schema::{FormulaDefinition, IntoSchema, ResultDefinition, VariableDefinition};
///
/// struct LegacyForm {
///     name: String,
///     fields: Vec<String>,
/// }
///
/// impl IntoSchema for LegacyForm {
///     fn into_definition(self) -> Result<FormulaDefinition, ConversionError> {
///         if self.fields.is_empty() {
///             return Err(ConversionError::ValidationError("form has no fields".into()));
///         }
///         Ok(FormulaDefinition {
///             id: self.name,
///             title: None,
///             min_required: self.fields.len(),
///             variables: self.fields.iter().map(|f| VariableDefinition::new(f)).collect(),
///             exclusion_groups: vec![],
///             result: Some(ResultDefinition { name: "out".into(), ..Default::default() }),
///         })
///     }
/// }
/// ```
pub trait IntoSchema {
    /// Consumes the object and converts it into a compilable formula definition.
    fn into_definition(self) -> Result<FormulaDefinition, ConversionError>;
}

impl IntoSchema for FormulaDefinition {
    fn into_definition(self) -> Result<FormulaDefinition, ConversionError> {
        Ok(self)
    }
}
