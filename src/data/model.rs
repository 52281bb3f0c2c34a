use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// The raw content of one form field: the text as typed and the selected unit.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldInput {
    pub raw: String,
    /// Empty means the field's canonical unit.
    #[serde(default)]
    pub unit: String,
}

/// An immutable snapshot of one formula's form fields.
///
/// Fields are kept in name order so that two snapshots with the same content
/// compare and hash identically regardless of insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputSnapshot {
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldInput>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn for_formula(mut self, formula_id: &str) -> Self {
        self.formula = Some(formula_id.to_string());
        self
    }

    /// Adds a field in its canonical unit.
    pub fn with(self, name: &str, raw: &str) -> Self {
        self.with_unit(name, raw, "")
    }

    pub fn with_unit(mut self, name: &str, raw: &str, unit: &str) -> Self {
        self.set(name, raw, unit);
        self
    }

    pub fn set(&mut self, name: &str, raw: &str, unit: &str) {
        self.fields.insert(
            name.to_string(),
            FieldInput {
                raw: raw.to_string(),
                unit: unit.to_string(),
            },
        );
    }

    pub fn field(&self, name: &str) -> Option<&FieldInput> {
        self.fields.get(name)
    }

    /// A field counts as populated when its text is not blank.
    pub fn is_populated(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .is_some_and(|f| !f.raw.trim().is_empty())
    }

    /// Names of the populated fields, in name order.
    pub fn populated(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| !f.raw.trim().is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// The input value for `name`, before validation.
    pub fn input_value(&self, name: &str) -> InputValue {
        let field = self.fields.get(name).cloned().unwrap_or_default();
        InputValue {
            variable_name: name.to_string(),
            raw_text: field.raw,
            parsed_value: None,
            unit: field.unit,
        }
    }
}

/// One field's value during a validation pass.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InputValue {
    pub variable_name: String,
    pub raw_text: String,
    /// Set once the raw text has been validated against its variable spec.
    pub parsed_value: Option<f64>,
    pub unit: String,
}
