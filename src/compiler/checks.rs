use crate::error::SchemaError;
use crate::schema::{ExclusionGroup, ExclusionGroupDefinition, VariableDefinition, VariableSpec};
use crate::units::UnitTable;
use ahash::{AHashMap, AHashSet};

/// Builds the variable specs and the name -> position index.
pub(super) fn build_variables(
    formula_id: &str,
    definitions: &[VariableDefinition],
) -> Result<(Vec<VariableSpec>, AHashMap<String, usize>), SchemaError> {
    if definitions.is_empty() {
        return Err(SchemaError::EmptyFormula {
            formula_id: formula_id.to_string(),
        });
    }

    let mut index = AHashMap::new();
    let mut variables = Vec::with_capacity(definitions.len());

    for (position, def) in definitions.iter().enumerate() {
        if index.insert(def.name.clone(), position).is_some() {
            return Err(SchemaError::DuplicateVariable {
                formula_id: formula_id.to_string(),
                name: def.name.clone(),
            });
        }

        let minimum = def.minimum.unwrap_or(f64::NEG_INFINITY);
        let maximum = def.maximum.unwrap_or(f64::INFINITY);
        if minimum.is_nan() || maximum.is_nan() || minimum > maximum {
            return Err(SchemaError::InvalidBounds {
                formula_id: formula_id.to_string(),
                name: def.name.clone(),
                minimum,
                maximum,
            });
        }

        variables.push(VariableSpec {
            name: def.name.clone(),
            label: def.label.clone().unwrap_or_else(|| def.name.clone()),
            minimum,
            maximum,
            zero_allowed: def.zero_allowed,
            required: def.required,
            units: def.units.clone(),
        });
    }

    Ok((variables, index))
}

pub(super) fn check_units(
    formula_id: &str,
    variables: &[VariableSpec],
    units: &UnitTable,
) -> Result<(), SchemaError> {
    for spec in variables {
        if let Some(unit) = spec.units().iter().find(|u| !units.contains(u)) {
            return Err(SchemaError::UnknownUnit {
                formula_id: formula_id.to_string(),
                name: spec.name().to_string(),
                unit: unit.clone(),
            });
        }
    }
    Ok(())
}

/// Groups need at least two non-empty branches, may only name declared optional
/// variables, and no variable may appear twice across all groups and branches.
pub(super) fn check_exclusion_groups(
    formula_id: &str,
    groups: &[ExclusionGroupDefinition],
    variables: &[VariableSpec],
    index: &AHashMap<String, usize>,
) -> Result<(), SchemaError> {
    let mut seen: AHashSet<&str> = AHashSet::new();

    for (group_index, group) in groups.iter().enumerate() {
        if group.branches.len() < 2 {
            return Err(SchemaError::InvalidExclusionGroup {
                formula_id: formula_id.to_string(),
                group_index,
                message: format!(
                    "a group needs at least 2 alternative branches, found {}",
                    group.branches.len()
                ),
            });
        }

        for branch in &group.branches {
            if branch.is_empty() {
                return Err(SchemaError::InvalidExclusionGroup {
                    formula_id: formula_id.to_string(),
                    group_index,
                    message: "branches cannot be empty".to_string(),
                });
            }
            for name in branch {
                let Some(&position) = index.get(name) else {
                    return Err(SchemaError::UnknownVariable {
                        formula_id: formula_id.to_string(),
                        group_index,
                        name: name.clone(),
                    });
                };
                // Required variables are never suppressed.
                if variables[position].required() {
                    return Err(SchemaError::InvalidExclusionGroup {
                        formula_id: formula_id.to_string(),
                        group_index,
                        message: format!("required variable '{}' cannot be an alternative", name),
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(SchemaError::OverlappingExclusionGroups {
                        formula_id: formula_id.to_string(),
                        name: name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// The largest number of variables that can be populated at once without a conflict.
pub(super) fn reachable_count(variables: &[VariableSpec], groups: &[ExclusionGroup]) -> usize {
    let grouped = groups.iter().map(|g| g.members().count()).sum::<usize>();
    let widest = groups
        .iter()
        .map(|g| g.branches().iter().map(Vec::len).max().unwrap_or(0))
        .sum::<usize>();
    variables.len() - grouped + widest
}
