use crate::catalog::Catalog;
use crate::data::InputSnapshot;
use crate::domain::{FormulaEvaluator, FormulaSolver, Method, NamedInputs, UnitConverter};
use crate::error::{DomainError, SchemaError, ValidationError};
use crate::outcome::ValidationOutcome;
use crate::physics::{FormulaRegistry, check_method};
use crate::schema::{FormulaSchema, ResultSpec, VariableSpec};
use crate::validator::{Resolution, Validator, check_solvability, resolve_exclusions};
use serde::Serialize;
use tracing::debug;

mod cache;

pub use cache::CachedCalculator;

/// A value with its unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// The result of a successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub formula_id: String,
    /// The evaluated result, or every variable a solver filled in, in schema order.
    /// Empty when a solver was handed every variable.
    pub results: Vec<Quantity>,
    /// The inputs the formula was evaluated with, in canonical units.
    pub inputs: NamedInputs,
}

impl Calculation {
    /// The first result.
    pub fn result(&self) -> Option<&Quantity> {
        self.results.first()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.results.iter().find(|q| q.name == name).map(|q| q.value)
    }
}

/// Sequences validation, unit conversion, evaluation or solving, and result validation
/// for one formula.
///
/// This is the only place where errors from the physics layer are translated into
/// [`ValidationError`]. Every failure is terminal for the attempt; nothing is retried.
#[derive(Clone, Copy)]
pub struct Calculator<'a> {
    schema: &'a FormulaSchema,
    converter: &'a dyn UnitConverter,
    method: Method<'a>,
}

impl<'a> Calculator<'a> {
    /// A calculator for a schema that declares a result.
    pub fn new(
        schema: &'a FormulaSchema,
        converter: &'a dyn UnitConverter,
        evaluator: &'a dyn FormulaEvaluator,
    ) -> Self {
        Self::with_method(schema, converter, Method::Evaluate(evaluator))
    }

    /// A calculator for a schema without a result, solving for the empty variables.
    pub fn solving(
        schema: &'a FormulaSchema,
        converter: &'a dyn UnitConverter,
        solver: &'a dyn FormulaSolver,
    ) -> Self {
        Self::with_method(schema, converter, Method::Solve(solver))
    }

    pub fn with_method(
        schema: &'a FormulaSchema,
        converter: &'a dyn UnitConverter,
        method: Method<'a>,
    ) -> Self {
        Self {
            schema,
            converter,
            method,
        }
    }

    /// Builds a calculator for `formula_id` using the catalog's schema and unit table.
    pub fn from_catalog(
        catalog: &'a Catalog,
        registry: &'a FormulaRegistry,
        formula_id: &str,
    ) -> Result<Self, SchemaError> {
        let schema = catalog.get(formula_id)?;
        let method = registry
            .method(formula_id)
            .ok_or_else(|| SchemaError::MissingEvaluator(formula_id.to_string()))?;
        check_method(formula_id, method, schema.result().is_some())?;
        Ok(Self::with_method(schema, catalog.units(), method))
    }

    pub fn schema(&self) -> &'a FormulaSchema {
        self.schema
    }

    pub fn validator(&self) -> Validator<'a> {
        Validator::new(self.schema)
    }

    /// Runs the full pipeline against one snapshot.
    pub fn calculate(&self, snapshot: &InputSnapshot) -> Result<Calculation, ValidationError> {
        let formula_id = self.schema.id();
        debug!(formula = %formula_id, fields = snapshot.fields.len(), "calculation requested");

        let result = self.run(snapshot);
        match &result {
            Ok(calc) => debug!(
                formula = %formula_id,
                results = calc.results.len(),
                "calculation succeeded"
            ),
            Err(e) => debug!(formula = %formula_id, kind = %e.kind(), error = %e, "calculation rejected"),
        }
        result
    }

    pub fn outcome(&self, snapshot: &InputSnapshot) -> ValidationOutcome {
        ValidationOutcome::from(&self.calculate(snapshot))
    }

    fn run(&self, snapshot: &InputSnapshot) -> Result<Calculation, ValidationError> {
        let validator = self.validator();

        // 1. Individual fields
        let values = validator.validate_fields(snapshot)?;

        // 2. Exclusion groups and solvability
        let populated = validator.populated(snapshot);
        let resolution = resolve_exclusions(self.schema, &populated)?;
        check_solvability(self.schema, &resolution, &populated).into_result()?;

        // 3. Unit conversion
        let mut inputs = NamedInputs::new();
        for value in &values {
            let Some(spec) = self.schema.variable(&value.variable_name) else {
                continue;
            };
            let Some(parsed) = value.parsed_value else {
                continue;
            };
            let canonical = self
                .converter
                .to_canonical(spec, parsed, &value.unit)
                .map_err(|e| ValidationError::UnitConversion {
                    field: spec.name().to_string(),
                    unit: value.unit.clone(),
                    reason: e.to_string(),
                })?;
            // Bounds hold in the canonical unit too, whatever unit was entered.
            if !spec.in_bounds(canonical) {
                return Err(ValidationError::Range {
                    field: spec.name().to_string(),
                    value: canonical,
                    minimum: spec.minimum(),
                    maximum: spec.maximum(),
                });
            }
            inputs.insert(spec.name(), canonical);
        }

        // 4. Evaluation, 5. Result domain
        let results = match self.method {
            Method::Evaluate(evaluator) => vec![self.evaluate(evaluator, &inputs)?],
            Method::Solve(solver) => self.solve(solver, &inputs, &resolution)?,
        };

        Ok(Calculation {
            formula_id: self.schema.id().to_string(),
            results,
            inputs,
        })
    }

    fn evaluate(
        &self,
        evaluator: &dyn FormulaEvaluator,
        inputs: &NamedInputs,
    ) -> Result<Quantity, ValidationError> {
        let result = self.schema.result().ok_or_else(|| ValidationError::Calculation {
            formula_id: self.schema.id().to_string(),
            reason: "the formula declares no result to evaluate".to_string(),
        })?;

        let raw = evaluator
            .evaluate(inputs)
            .map_err(|e| self.map_evaluation_error(e))?;
        check_result(result, raw)?;

        Ok(Quantity {
            name: result.name().to_string(),
            value: raw,
            unit: result.unit().to_string(),
        })
    }

    fn solve(
        &self,
        solver: &dyn FormulaSolver,
        inputs: &NamedInputs,
        resolution: &Resolution,
    ) -> Result<Vec<Quantity>, ValidationError> {
        let solved = solver
            .solve(inputs)
            .map_err(|e| self.map_evaluation_error(e))?;

        let mut results = Vec::new();
        for spec in self.schema.variables() {
            if inputs.contains(spec.name()) || resolution.is_suppressed(spec.name()) {
                continue;
            }
            let value = solved
                .get(spec.name())
                .ok_or_else(|| ValidationError::Calculation {
                    formula_id: self.schema.id().to_string(),
                    reason: format!("{} could not be determined", spec.label()),
                })?;
            check_solved(spec, value)?;
            results.push(Quantity {
                name: spec.name().to_string(),
                value,
                unit: spec.canonical_unit().to_string(),
            });
        }
        Ok(results)
    }

    fn map_evaluation_error(&self, error: DomainError) -> ValidationError {
        match error {
            DomainError::MissingInput(_) => ValidationError::InsufficientData { missing: 1 },
            other => ValidationError::Calculation {
                formula_id: self.schema.id().to_string(),
                reason: other.to_string(),
            },
        }
    }
}

fn check_solved(spec: &VariableSpec, value: f64) -> Result<(), ValidationError> {
    let impossible = |reason: String| ValidationError::PhysicallyImpossibleResult {
        quantity: spec.name().to_string(),
        value,
        reason,
    };

    if !value.is_finite() {
        return Err(impossible("the result is not a finite number".to_string()));
    }
    if !spec.in_bounds(value) {
        return Err(impossible(format!(
            "must lie within [{}, {}] {}",
            spec.minimum(),
            spec.maximum(),
            spec.canonical_unit()
        )));
    }
    Ok(())
}

fn check_result(spec: &ResultSpec, value: f64) -> Result<(), ValidationError> {
    let impossible = |reason: String| ValidationError::PhysicallyImpossibleResult {
        quantity: spec.name().to_string(),
        value,
        reason,
    };

    if !value.is_finite() {
        return Err(impossible("the result is not a finite number".to_string()));
    }
    if let Some(minimum) = spec.minimum() {
        if value < minimum {
            return Err(impossible(format!(
                "must be at least {} {}",
                minimum,
                spec.unit()
            )));
        }
    }
    if let Some(maximum) = spec.maximum() {
        if value > maximum {
            return Err(impossible(format!(
                "must be at most {} {}",
                maximum,
                spec.unit()
            )));
        }
    }
    Ok(())
}
