//! Tests for the calculation pipeline and its cache.
mod common;
use common::*;
use kakunin::prelude::*;
use std::result::Result;
use kakunin::physics::electromagnetism;

fn force_calculator_parts() -> (FormulaSchema, UnitTable) {
    let units = test_units();
    let schema = SchemaCompiler::builder(force_on_wire_definition())
        .with_unit_table(&units)
        .build()
        .compile()
        .expect("Failed to compile force schema");
    (schema, units)
}

#[test]
fn test_calculates_force_on_wire() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);

    let calc = calculator
        .calculate(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]))
        .expect("Calculation failed");

    assert_eq!(calc.formula_id, "force_on_wire");
    assert_eq!(calc.results[0].name, "F");
    assert_eq!(calc.results[0].unit, "N");
    assert!(approx_eq(calc.results[0].value, 1.0), "got {}", calc.results[0].value);
    assert_eq!(calc.inputs.len(), 3);
    assert!(!calc.inputs.contains("theta"));
}

#[test]
fn test_converts_units_before_evaluating() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);

    let snapshot = InputSnapshot::new()
        .with_unit("I", "500", "mA")
        .with_unit("L", "200", "cm")
        .with_unit("B", "5", "mT")
        .with("theta", "30");
    let calc = calculator.calculate(&snapshot).expect("Calculation failed");

    assert!(approx_eq(calc.inputs.get("I").unwrap(), 0.5));
    assert!(approx_eq(calc.inputs.get("L").unwrap(), 2.0));
    assert!(approx_eq(calc.inputs.get("B").unwrap(), 0.005));
    assert!(approx_eq(calc.results[0].value, 0.0025), "got {}", calc.results[0].value);
}

#[test]
fn test_incompatible_unit_is_conversion_error() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);

    let snapshot = snapshot(&[("I", "5"), ("B", "0.1")]).with_unit("L", "2", "furlong");
    match calculator.calculate(&snapshot) {
        Err(ValidationError::UnitConversion { field, unit, .. }) => {
            assert_eq!(field, "L");
            assert_eq!(unit, "furlong");
        }
        other => panic!("Expected UnitConversionError, got {:?}", other),
    }
}

#[test]
fn test_unit_missing_from_table_is_conversion_error() {
    let (schema, _) = force_calculator_parts();
    // "cm" is accepted by L but absent from this table.
    let sparse = UnitTable::new().with_unit("m", 1.0);
    let calculator = Calculator::new(&schema, &sparse, &electromagnetism::force_on_wire);

    let snapshot = snapshot(&[("I", "5"), ("B", "0.1")]).with_unit("L", "200", "cm");
    let err = calculator.calculate(&snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnitConversion);
    assert!(err.to_string().contains("Unknown unit 'cm'"));
}

#[test]
fn test_division_by_zero_is_calculation_error() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "current_from_force").unwrap();

    let snapshot = snapshot(&[("F", "1"), ("L", "2"), ("B", "0.1"), ("theta", "0")]);
    match calculator.calculate(&snapshot) {
        Err(ValidationError::Calculation { formula_id, reason }) => {
            assert_eq!(formula_id, "current_from_force");
            assert!(reason.starts_with("Division by zero"));
        }
        other => panic!("Expected CalculationError, got {:?}", other),
    }
}

#[test]
fn test_evaluator_failure_never_escapes() {
    let schema = compile(force_on_wire_definition());
    let undefined = |_: &NamedInputs| -> Result<f64, DomainError> {
        Err(DomainError::Undefined("square root of a negative number".to_string()))
    };
    let calculator = Calculator::new(&schema, &CanonicalOnly, &undefined);

    let outcome = calculator.outcome(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]));
    assert_eq!(outcome.error().map(|e| e.kind()), Some(ErrorKind::Calculation));
}

#[test]
fn test_missing_evaluator_input_is_insufficient_data() {
    let schema = compile(force_on_wire_definition());
    let needs_theta = |inputs: &NamedInputs| inputs.require("theta");
    let calculator = Calculator::new(&schema, &CanonicalOnly, &needs_theta);

    assert_eq!(
        calculator.calculate(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")])),
        Err(ValidationError::InsufficientData { missing: 1 })
    );
}

#[test]
fn test_negative_time_is_physically_impossible() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "elapsed_time").unwrap();

    let err = calculator
        .calculate(&snapshot(&[("u", "0"), ("v", "10"), ("a", "-2")]))
        .unwrap_err();
    match err {
        ValidationError::PhysicallyImpossibleResult { quantity, value, .. } => {
            assert_eq!(quantity, "t");
            assert!(approx_eq(value, -5.0));
        }
        other => panic!("Expected PhysicallyImpossibleResultError, got {:?}", other),
    }

    let calc = calculator
        .calculate(&snapshot(&[("u", "0"), ("v", "10"), ("a", "2")]))
        .unwrap();
    assert!(approx_eq(calc.results[0].value, 5.0));
}

#[test]
fn test_non_finite_result_is_physically_impossible() {
    let schema = compile(force_on_wire_definition());
    let overflow = |inputs: &NamedInputs| -> Result<f64, DomainError> {
        Ok(inputs.require("I")? * f64::MAX * 10.0)
    };
    let calculator = Calculator::new(&schema, &CanonicalOnly, &overflow);

    let err = calculator
        .calculate(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PhysicallyImpossibleResult);
}

#[test]
fn test_validation_failures_stop_before_evaluation() {
    let schema = compile(force_on_wire_definition());
    let never_called = |_: &NamedInputs| -> Result<f64, DomainError> {
        panic!("evaluator must not run for invalid input")
    };
    let calculator = Calculator::new(&schema, &CanonicalOnly, &never_called);

    assert_eq!(
        calculator.calculate(&snapshot(&[("I", "0"), ("L", "2"), ("B", "0.1")])),
        Err(ValidationError::ZeroNotAllowed {
            field: "I".to_string()
        })
    );
    assert_eq!(
        calculator.calculate(&snapshot(&[("I", "5")])),
        Err(ValidationError::InsufficientData { missing: 2 })
    );
}

#[test]
fn test_suppressed_branch_is_not_evaluated() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "magnetic_field").unwrap();

    let wire = calculator
        .calculate(&snapshot(&[("I_wire", "10"), ("r_wire", "0.02")]))
        .unwrap();
    // μ₀·10 / (2π·0.02) = 1e-4 T
    assert!(approx_eq(wire.results[0].value, 1e-4), "got {}", wire.results[0].value);
    assert!(!wire.inputs.contains("N"));

    let solenoid = calculator
        .calculate(&snapshot(&[("I_wire", "2"), ("N", "500"), ("L", "0.25")]))
        .unwrap();
    let expected = kakunin::physics::MU_0 * 500.0 * 2.0 / 0.25;
    assert!(approx_eq(solenoid.results[0].value, expected));
}

#[test]
fn test_calculation_is_idempotent() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);
    let snapshot = snapshot(&[("I", "3.7"), ("L", "1.1"), ("B", "0.42"), ("theta", "63")]);

    let first = calculator.calculate(&snapshot).unwrap();
    let second = calculator.calculate(&snapshot).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.results[0].value.to_bits(), second.results[0].value.to_bits());
}

#[test]
fn test_cache_hits_on_identical_snapshot() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);
    let mut cached = CachedCalculator::new(calculator);
    let snapshot = snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]);

    let first = cached.calculate(&snapshot);
    let second = cached.calculate(&snapshot);
    assert_eq!(first, second);
    assert_eq!(cached.hits(), 1);
    assert_eq!(cached.misses(), 1);
    assert_eq!(cached.len(), 1);
    assert_eq!(first, cached.calculator().calculate(&snapshot));
}

#[test]
fn test_cache_misses_on_changed_value_or_unit() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);
    let mut cached = CachedCalculator::new(calculator);

    let base = snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]);
    let changed_value = base.clone().with("L", "3");
    let changed_unit = base.clone().with_unit("L", "2", "cm");

    let a = cached.calculate(&base).unwrap();
    let b = cached.calculate(&changed_value).unwrap();
    let c = cached.calculate(&changed_unit).unwrap();

    assert_eq!(cached.misses(), 3);
    assert_eq!(cached.hits(), 0);
    assert!(approx_eq(b.results[0].value, 1.5));
    assert!(approx_eq(c.results[0].value, 0.01));
    assert_ne!(a, b);
}

#[test]
fn test_cache_replays_errors_and_clears_when_full() {
    let (schema, units) = force_calculator_parts();
    let calculator = Calculator::new(&schema, &units, &electromagnetism::force_on_wire);
    let mut cached = CachedCalculator::with_capacity(calculator, 1);

    let bad = snapshot(&[("I", "abc")]);
    assert_eq!(cached.calculate(&bad), cached.calculate(&bad));
    assert_eq!(cached.hits(), 1);

    cached
        .calculate(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]))
        .unwrap();
    assert_eq!(cached.len(), 1);

    cached.clear();
    assert!(cached.is_empty());
}

#[test]
fn test_bounds_are_checked_after_conversion() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "force_on_wire").unwrap();
    let base = snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]);

    // 4 rad passes the raw [0, 180] check but is about 229°.
    match calculator.calculate(&base.clone().with_unit("theta", "4", "rad")) {
        Err(ValidationError::Range {
            field,
            value,
            minimum,
            maximum,
        }) => {
            assert_eq!(field, "theta");
            assert!(approx_eq(value, 4.0_f64.to_degrees()), "got {}", value);
            assert_eq!((minimum, maximum), (0.0, 180.0));
        }
        other => panic!("Expected RangeError, got {:?}", other),
    }

    let calc = calculator
        .calculate(&base.with_unit("theta", "1.57", "rad"))
        .unwrap();
    assert!(approx_eq(calc.inputs.get("theta").unwrap(), 1.57_f64.to_degrees()));
}

#[test]
fn test_tiny_divisor_is_not_division_by_zero() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "current_from_force").unwrap();

    let calc = calculator
        .calculate(&snapshot(&[
            ("F", "1e-15"),
            ("L", "1e-6"),
            ("B", "1e-7"),
            ("theta", "90"),
        ]))
        .unwrap();
    assert!(approx_eq(calc.value("I").unwrap(), 0.01), "got {:?}", calc.value("I"));

    let err = calculator
        .calculate(&snapshot(&[("F", "1"), ("L", "1"), ("B", "1"), ("theta", "180")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Calculation);
}

#[test]
fn test_suvat_solves_every_empty_variable() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "suvat").unwrap();

    let snapshot = InputSnapshot::new()
        .with("u", "0")
        .with("a", "2")
        .with_unit("t", "3000", "ms");
    let calc = calculator.calculate(&snapshot).unwrap();

    let names: Vec<&str> = calc.results.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["v", "s"]);
    assert!(approx_eq(calc.value("v").unwrap(), 6.0));
    assert!(approx_eq(calc.value("s").unwrap(), 9.0));
    assert_eq!(calc.result().unwrap().unit, "m/s");
    assert_eq!(calc.results[1].unit, "m");
}

#[test]
fn test_suvat_with_every_value_given_has_no_results() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "suvat").unwrap();

    let calc = calculator
        .calculate(&snapshot(&[("u", "1"), ("v", "7"), ("a", "2"), ("s", "12"), ("t", "3")]))
        .unwrap();
    assert!(calc.results.is_empty());
    assert!(calc.result().is_none());
    assert_eq!(calc.inputs.len(), 5);
}

#[test]
fn test_suvat_solved_values_respect_bounds() {
    let catalog = Catalog::builtin().unwrap();
    let registry = FormulaRegistry::with_defaults();
    let calculator = Calculator::from_catalog(&catalog, &registry, "suvat").unwrap();

    match calculator.calculate(&snapshot(&[("u", "0"), ("v", "10"), ("a", "-2")])) {
        Err(ValidationError::PhysicallyImpossibleResult { quantity, value, .. }) => {
            assert_eq!(quantity, "t");
            assert!(approx_eq(value, -5.0));
        }
        other => panic!("Expected PhysicallyImpossibleResultError, got {:?}", other),
    }

    // v² = 1 − 40 has no real u.
    let err = calculator
        .calculate(&snapshot(&[("v", "1"), ("a", "2"), ("s", "10")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Calculation);
    let message = MessageFormatter::new(calculator.schema()).format_error(&err);
    assert!(message.starts_with("Motion with constant acceleration"), "{}", message);
}

#[test]
fn test_solver_that_leaves_a_gap_is_calculation_error() {
    let mut definition = force_on_wire_definition();
    definition.result = None;
    let schema = compile(definition);

    let echo = |inputs: &NamedInputs| -> Result<NamedInputs, DomainError> { Ok(inputs.clone()) };
    let calculator = Calculator::solving(&schema, &CanonicalOnly, &echo);

    let err = calculator
        .calculate(&snapshot(&[("I", "5"), ("L", "2"), ("B", "0.1")]))
        .unwrap_err();
    match err {
        ValidationError::Calculation { reason, .. } => {
            assert!(reason.contains("Angle (θ)"), "{}", reason);
        }
        other => panic!("Expected CalculationError, got {:?}", other),
    }
}
