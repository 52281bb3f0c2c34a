//! Common test utilities for building formula definitions and snapshots.
use kakunin::prelude::*;

/// `F = I·L·B·sin θ`: needs I, L and B; theta is optional.
#[allow(dead_code)]
pub fn force_on_wire_definition() -> FormulaDefinition {
    FormulaDefinition {
        id: "force_on_wire".to_string(),
        title: Some("Force on a wire".to_string()),
        min_required: 3,
        variables: vec![
            VariableDefinition {
                name: "I".to_string(),
                label: Some("Current (I)".to_string()),
                minimum: Some(-1000.0),
                maximum: Some(1000.0),
                zero_allowed: false,
                required: true,
                units: vec!["A".to_string(), "mA".to_string()],
            },
            VariableDefinition {
                name: "L".to_string(),
                label: Some("Length (L)".to_string()),
                minimum: Some(0.0),
                maximum: Some(1000.0),
                zero_allowed: false,
                required: true,
                units: vec!["m".to_string(), "cm".to_string()],
            },
            VariableDefinition {
                name: "B".to_string(),
                label: Some("Magnetic field (B)".to_string()),
                minimum: Some(-10.0),
                maximum: Some(10.0),
                zero_allowed: false,
                required: true,
                units: vec!["T".to_string(), "mT".to_string()],
            },
            VariableDefinition {
                name: "theta".to_string(),
                label: Some("Angle (θ)".to_string()),
                minimum: Some(0.0),
                maximum: Some(180.0),
                zero_allowed: true,
                required: false,
                units: vec!["°".to_string()],
            },
        ],
        exclusion_groups: vec![],
        result: Some(ResultDefinition {
            name: "F".to_string(),
            label: Some("Force (F)".to_string()),
            unit: "N".to_string(),
            minimum: None,
            maximum: None,
        }),
    }
}

/// Straight wire (`I_wire`, `r_wire`) or solenoid (`I_wire`, `N`, `L`).
/// `I_wire` is required; `r_wire` and the `{N, L}` pair are alternatives.
#[allow(dead_code)]
pub fn magnetic_field_definition() -> FormulaDefinition {
    let mut n = VariableDefinition::new("N");
    n.minimum = Some(1.0);
    n.zero_allowed = false;
    let mut r_wire = VariableDefinition::new("r_wire");
    r_wire.minimum = Some(0.0);
    r_wire.zero_allowed = false;
    r_wire.units = vec!["m".to_string(), "cm".to_string()];

    FormulaDefinition {
        id: "magnetic_field".to_string(),
        title: None,
        min_required: 2,
        variables: vec![
            VariableDefinition {
                required: true,
                ..VariableDefinition::new("I_wire")
            },
            r_wire,
            n,
            VariableDefinition::new("L"),
        ],
        exclusion_groups: vec![ExclusionGroupDefinition {
            branches: vec![
                vec!["r_wire".to_string()],
                vec!["N".to_string(), "L".to_string()],
            ],
        }],
        result: Some(ResultDefinition {
            name: "B".to_string(),
            label: None,
            unit: "T".to_string(),
            minimum: None,
            maximum: None,
        }),
    }
}

#[allow(dead_code)]
pub fn test_units() -> UnitTable {
    UnitTable::new()
        .with_unit("A", 1.0)
        .with_unit("mA", 0.001)
        .with_unit("m", 1.0)
        .with_unit("cm", 0.01)
        .with_unit("T", 1.0)
        .with_unit("mT", 0.001)
        .with_unit("°", 1.0)
}

#[allow(dead_code)]
pub fn compile(definition: FormulaDefinition) -> FormulaSchema {
    SchemaCompiler::builder(definition)
        .build()
        .compile()
        .expect("Failed to compile test schema")
}

/// Builds a snapshot of canonical-unit fields.
#[allow(dead_code)]
pub fn snapshot(fields: &[(&str, &str)]) -> InputSnapshot {
    fields
        .iter()
        .fold(InputSnapshot::new(), |s, (name, raw)| s.with(name, raw))
}

#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}
