use crate::data::{InputSnapshot, InputValue};
use crate::error::ValidationError;
use crate::outcome::ValidationOutcome;
use crate::schema::FormulaSchema;
use std::collections::BTreeSet;
use tracing::{trace, warn};

mod exclusion;
mod field;
mod solvability;

pub use exclusion::{Resolution, resolve_exclusions};
pub use field::validate_field;
pub use solvability::check_solvability;

/// Status of a single form field after a validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStatus {
    Empty,
    Valid,
    Invalid(ValidationError),
    /// Disabled because an alternative in its exclusion group is populated.
    Suppressed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    pub value: InputValue,
    pub status: FieldStatus,
}

/// Everything the form layer needs to render one validation pass:
/// per-field status in schema order and the overall outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub formula_id: String,
    pub fields: Vec<FieldReport>,
    pub outcome: ValidationOutcome,
}

impl Assessment {
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|f| f.value.variable_name == name)
    }

    /// Whether the form should keep this field editable.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.field(name)
            .is_some_and(|f| f.status != FieldStatus::Suppressed)
    }
}

/// Runs the field, exclusion, and solvability checks of one schema against snapshots.
///
/// Stateless: every call depends only on the schema and the snapshot passed in.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a FormulaSchema,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a FormulaSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a FormulaSchema {
        self.schema
    }

    /// Names of populated fields the schema knows, in name order.
    ///
    /// Fields the schema does not declare are ignored.
    pub fn populated<'s>(&self, snapshot: &'s InputSnapshot) -> BTreeSet<&'s str> {
        snapshot
            .populated()
            .filter(|name| {
                let known = self.schema.variable(name).is_some();
                if !known {
                    warn!(
                        formula = %self.schema.id(),
                        field = %name,
                        "ignoring field not declared by the formula"
                    );
                }
                known
            })
            .collect()
    }

    /// Validates every populated field in schema order, stopping at the first failure.
    pub fn validate_fields(
        &self,
        snapshot: &InputSnapshot,
    ) -> Result<Vec<InputValue>, ValidationError> {
        let mut values = Vec::new();
        for spec in self.schema.variables() {
            if !snapshot.is_populated(spec.name()) {
                continue;
            }
            let mut value = snapshot.input_value(spec.name());
            let parsed = validate_field(&value.raw_text, spec)?;
            trace!(field = %spec.name(), raw = %value.raw_text, parsed, "field valid");
            value.parsed_value = Some(parsed);
            values.push(value);
        }
        Ok(values)
    }

    pub fn resolve(&self, snapshot: &InputSnapshot) -> Result<Resolution, ValidationError> {
        resolve_exclusions(self.schema, &self.populated(snapshot))
    }

    /// Field validation, then exclusion resolution and solvability. Does not convert
    /// units or evaluate anything.
    pub fn check(&self, snapshot: &InputSnapshot) -> Result<Resolution, ValidationError> {
        self.check_populated(snapshot, &self.populated(snapshot))
    }

    fn check_populated(
        &self,
        snapshot: &InputSnapshot,
        populated: &BTreeSet<&str>,
    ) -> Result<Resolution, ValidationError> {
        self.validate_fields(snapshot)?;
        let resolution = resolve_exclusions(self.schema, populated)?;
        check_solvability(self.schema, &resolution, populated).into_result()?;
        Ok(resolution)
    }

    pub fn outcome(&self, snapshot: &InputSnapshot) -> ValidationOutcome {
        ValidationOutcome::from(&self.check(snapshot))
    }

    /// Per-field report plus the overall outcome.
    ///
    /// Unlike [`check`](Self::check), every field is reported, not only the first
    /// failing one. Suppression is only reported when the exclusion groups resolve
    /// without conflict.
    pub fn assess(&self, snapshot: &InputSnapshot) -> Assessment {
        let populated = self.populated(snapshot);
        let resolution = resolve_exclusions(self.schema, &populated).ok();

        let fields = self
            .schema
            .variables()
            .iter()
            .map(|spec| {
                let mut value = snapshot.input_value(spec.name());
                let suppressed = resolution
                    .as_ref()
                    .is_some_and(|r| r.is_suppressed(spec.name()));

                let status = if suppressed {
                    FieldStatus::Suppressed
                } else if !snapshot.is_populated(spec.name()) {
                    FieldStatus::Empty
                } else {
                    match validate_field(&value.raw_text, spec) {
                        Ok(parsed) => {
                            value.parsed_value = Some(parsed);
                            FieldStatus::Valid
                        }
                        Err(e) => FieldStatus::Invalid(e),
                    }
                };
                FieldReport { value, status }
            })
            .collect();

        Assessment {
            formula_id: self.schema.id().to_string(),
            fields,
            outcome: ValidationOutcome::from(&self.check_populated(snapshot, &populated)),
        }
    }
}
