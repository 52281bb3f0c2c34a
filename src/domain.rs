use crate::error::DomainError;
use crate::schema::VariableSpec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Named input values, already converted to their canonical units.
///
/// This is what a [`FormulaEvaluator`] receives. Only populated, eligible
/// variables are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NamedInputs {
    values: BTreeMap<String, f64>,
}

impl NamedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns the value or a [`DomainError::MissingInput`].
    pub fn require(&self, name: &str) -> Result<f64, DomainError> {
        self.get(name)
            .ok_or_else(|| DomainError::MissingInput(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Converts a raw value in a user-chosen unit into the variable's canonical unit.
///
/// Implementations must be pure and must report unknown or incompatible units as
/// a [`DomainError`] rather than guessing.
pub trait UnitConverter: Send + Sync {
    fn to_canonical(&self, spec: &VariableSpec, value: f64, unit: &str)
    -> Result<f64, DomainError>;
}

/// Evaluates a formula from canonical named inputs.
///
/// Mathematically undefined inputs must be reported as [`DomainError::DivisionByZero`]
/// or [`DomainError::Undefined`], never as a non-finite value smuggled out as a result.
pub trait FormulaEvaluator: Send + Sync {
    fn evaluate(&self, inputs: &NamedInputs) -> Result<f64, DomainError>;
}

impl<F> FormulaEvaluator for F
where
    F: Fn(&NamedInputs) -> Result<f64, DomainError> + Send + Sync,
{
    fn evaluate(&self, inputs: &NamedInputs) -> Result<f64, DomainError> {
        self(inputs)
    }
}

/// Solves a formula for every variable that was left empty.
///
/// Used by formulas without a fixed result quantity, where any sufficient subset of
/// the variables determines the rest.
pub trait FormulaSolver: Send + Sync {
    /// Returns every variable that could be determined, the given ones included.
    fn solve(&self, inputs: &NamedInputs) -> Result<NamedInputs, DomainError>;
}

impl<F> FormulaSolver for F
where
    F: Fn(&NamedInputs) -> Result<NamedInputs, DomainError> + Send + Sync,
{
    fn solve(&self, inputs: &NamedInputs) -> Result<NamedInputs, DomainError> {
        self(inputs)
    }
}

/// How a calculation turns canonical inputs into results.
#[derive(Clone, Copy)]
pub enum Method<'a> {
    /// Compute the schema's result quantity.
    Evaluate(&'a dyn FormulaEvaluator),
    /// Solve for the variables left empty.
    Solve(&'a dyn FormulaSolver),
}

impl Method<'_> {
    /// Whether this method fits a schema, which depends on it declaring a result.
    pub fn fits(&self, has_result: bool) -> bool {
        matches!(
            (self, has_result),
            (Method::Evaluate(_), true) | (Method::Solve(_), false)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Method::Evaluate(_) => "evaluator",
            Method::Solve(_) => "solver",
        }
    }
}

/// A converter that only accepts values already in the canonical unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalOnly;

impl UnitConverter for CanonicalOnly {
    fn to_canonical(
        &self,
        spec: &VariableSpec,
        value: f64,
        unit: &str,
    ) -> Result<f64, DomainError> {
        if unit.is_empty() || unit == spec.canonical_unit() {
            Ok(value)
        } else {
            Err(DomainError::IncompatibleUnit {
                unit: unit.to_string(),
                expected: spec.canonical_unit().to_string(),
            })
        }
    }
}
