use crate::error::SchemaError;
use crate::schema::{ExclusionGroup, FormulaDefinition, FormulaSchema, ResultSpec};
use crate::units::UnitTable;
use tracing::debug;

mod checks;

use checks::*;

/// Compiles a [`FormulaDefinition`] into an immutable, validated [`FormulaSchema`].
///
/// All consistency rules are enforced here, at configuration load time, so that the
/// validation passes never have to re-check them.
pub struct SchemaCompiler {
    definition: FormulaDefinition,
    units: Option<UnitTable>,
}

pub struct SchemaCompilerBuilder {
    definition: FormulaDefinition,
    units: Option<UnitTable>,
}

impl SchemaCompilerBuilder {
    pub fn new(definition: FormulaDefinition) -> Self {
        Self {
            definition,
            units: None,
        }
    }

    /// Requires every unit a variable accepts to be present in `units`.
    pub fn with_unit_table(mut self, units: &UnitTable) -> Self {
        self.units = Some(units.clone());
        self
    }

    pub fn build(self) -> SchemaCompiler {
        SchemaCompiler {
            definition: self.definition,
            units: self.units,
        }
    }
}

impl SchemaCompiler {
    pub fn builder(definition: FormulaDefinition) -> SchemaCompilerBuilder {
        SchemaCompilerBuilder::new(definition)
    }

    pub fn compile(self) -> Result<FormulaSchema, SchemaError> {
        let def = self.definition;
        let formula_id = def.id.clone();

        let (variables, index) = build_variables(&formula_id, &def.variables)?;

        if let Some(units) = &self.units {
            check_units(&formula_id, &variables, units)?;
        }

        check_exclusion_groups(&formula_id, &def.exclusion_groups, &variables, &index)?;
        let exclusion_groups: Vec<ExclusionGroup> = def
            .exclusion_groups
            .into_iter()
            .map(|g| ExclusionGroup {
                branches: g.branches,
            })
            .collect();

        let reachable = reachable_count(&variables, &exclusion_groups);
        if def.min_required == 0 || def.min_required > reachable {
            return Err(SchemaError::InvalidRequiredCount {
                formula_id,
                required: def.min_required,
                available: reachable,
            });
        }

        let result = def
            .result
            .map(|r| build_result(&formula_id, r))
            .transpose()?;

        debug!(
            formula = %formula_id,
            variables = variables.len(),
            groups = exclusion_groups.len(),
            min_required = def.min_required,
            solves_for_missing = result.is_none(),
            "compiled formula schema"
        );

        Ok(FormulaSchema {
            title: def.title.unwrap_or_else(|| formula_id.clone()),
            id: formula_id,
            variables,
            exclusion_groups,
            min_required: def.min_required,
            result,
            index,
        })
    }
}

fn build_result(
    formula_id: &str,
    def: crate::schema::ResultDefinition,
) -> Result<ResultSpec, SchemaError> {
    if let (Some(minimum), Some(maximum)) = (def.minimum, def.maximum) {
        if minimum > maximum {
            return Err(SchemaError::InvalidBounds {
                formula_id: formula_id.to_string(),
                name: def.name,
                minimum,
                maximum,
            });
        }
    }
    Ok(ResultSpec {
        label: def.label.unwrap_or_else(|| def.name.clone()),
        name: def.name,
        unit: def.unit,
        minimum: def.minimum,
        maximum: def.maximum,
    })
}
