//! Reference formula evaluators and solvers.
//!
//! These are the pure physics functions the calculator invokes through the
//! [`FormulaEvaluator`] and [`FormulaSolver`] interfaces. Applications may register
//! their own alongside or instead of these.

use crate::catalog::Catalog;
use crate::domain::{FormulaEvaluator, FormulaSolver, Method};
use crate::error::{DomainError, SchemaError};
use ahash::AHashMap;

pub mod electromagnetism;
pub mod kinematics;

/// Permeability of free space (N/A²).
pub const MU_0: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Below this magnitude a sine is snapped to zero, so that sin 180° divides by zero
/// instead of by a rounding residue.
const SIN_SNAP: f64 = 1e-12;

/// Returns `value` unless it is exactly zero.
pub(crate) fn nonzero(value: f64, context: &str) -> Result<f64, DomainError> {
    if value == 0.0 {
        Err(DomainError::DivisionByZero(context.to_string()))
    } else {
        Ok(value)
    }
}

/// Sine of an angle given in degrees, snapped to exactly zero at multiples of 180°.
pub(crate) fn sin_degrees(theta: f64) -> f64 {
    let s = theta.to_radians().sin();
    if s.abs() < SIN_SNAP { 0.0 } else { s }
}

enum Registered {
    Evaluator(Box<dyn FormulaEvaluator>),
    Solver(Box<dyn FormulaSolver>),
}

/// Maps formula ids to their evaluators or solvers.
pub struct FormulaRegistry {
    formulas: AHashMap<String, Registered>,
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        let mut formulas = AHashMap::new();
        register_default_formulas(&mut formulas);
        Self { formulas }
    }
}

impl FormulaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            formulas: AHashMap::new(),
        }
    }

    /// A registry holding every built-in formula.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn with_evaluator<E>(mut self, formula_id: &str, evaluator: E) -> Self
    where
        E: FormulaEvaluator + 'static,
    {
        self.formulas.insert(
            formula_id.to_string(),
            Registered::Evaluator(Box::new(evaluator)),
        );
        self
    }

    pub fn with_solver<S>(mut self, formula_id: &str, solver: S) -> Self
    where
        S: FormulaSolver + 'static,
    {
        self.formulas
            .insert(formula_id.to_string(), Registered::Solver(Box::new(solver)));
        self
    }

    pub fn method(&self, formula_id: &str) -> Option<Method<'_>> {
        self.formulas.get(formula_id).map(|r| match r {
            Registered::Evaluator(e) => Method::Evaluate(e.as_ref()),
            Registered::Solver(s) => Method::Solve(s.as_ref()),
        })
    }

    pub fn contains(&self, formula_id: &str) -> bool {
        self.formulas.contains_key(formula_id)
    }

    /// Fails on the first catalog formula (in catalog order) that has nothing
    /// registered, or the wrong kind for its schema.
    pub fn check_catalog(&self, catalog: &Catalog) -> Result<(), SchemaError> {
        for schema in catalog.schemas() {
            let method = self
                .method(schema.id())
                .ok_or_else(|| SchemaError::MissingEvaluator(schema.id().to_string()))?;
            check_method(schema.id(), method, schema.result().is_some())?;
        }
        Ok(())
    }
}

pub(crate) fn check_method(
    formula_id: &str,
    method: Method<'_>,
    has_result: bool,
) -> Result<(), SchemaError> {
    if method.fits(has_result) {
        return Ok(());
    }
    Err(SchemaError::MismatchedEvaluator {
        formula_id: formula_id.to_string(),
        expected: if has_result { "evaluator" } else { "solver" }.to_string(),
        found: method.kind().to_string(),
    })
}

macro_rules! define_formulas {
    ( $( ($id:expr, $kind:ident, $func:path) ),* $(,)? ) => {
        /// Ids of the built-in formulas, in registration order.
        pub const BUILTIN_FORMULAS: &[&str] = &[ $( $id ),* ];

        fn register_default_formulas(registry: &mut AHashMap<String, Registered>) {
            $( registry.insert($id.to_string(), Registered::$kind(Box::new($func))); )*
        }
    };
}

define_formulas! {
    ("force_on_wire", Evaluator, electromagnetism::force_on_wire),
    ("current_from_force", Evaluator, electromagnetism::current_from_force),
    ("lorentz_force", Evaluator, electromagnetism::lorentz_force),
    ("magnetic_field", Evaluator, electromagnetism::magnetic_field),
    ("parallel_wires", Evaluator, electromagnetism::parallel_wires),
    ("transformer", Evaluator, electromagnetism::transformer_secondary_voltage),
    ("elapsed_time", Evaluator, kinematics::elapsed_time),
    ("displacement", Evaluator, kinematics::displacement),
    ("suvat", Solver, kinematics::suvat),
}
