use crate::error::ValidationError;
use crate::schema::FormulaSchema;
use std::collections::BTreeSet;

/// Which variables take part in this solve attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Variables that may be counted, in schema order.
    pub eligible: Vec<String>,
    /// Variables disabled by a populated alternative, in schema order.
    pub suppressed: Vec<String>,
    /// The selected branch index of each exclusion group, `None` when no branch is populated.
    pub selected: Vec<Option<usize>>,
}

impl Resolution {
    pub fn is_eligible(&self, name: &str) -> bool {
        self.eligible.iter().any(|n| n == name)
    }

    pub fn is_suppressed(&self, name: &str) -> bool {
        self.suppressed.iter().any(|n| n == name)
    }
}

/// Resolves the schema's exclusion groups against the set of populated variables.
///
/// Within a group the first populated branch, in declared priority order, is selected
/// and every other branch is suppressed. Populated variables in two branches of the
/// same group are a conflict; the error names the first populated variable of each of
/// the first two populated branches.
pub fn resolve_exclusions(
    schema: &FormulaSchema,
    populated: &BTreeSet<&str>,
) -> Result<Resolution, ValidationError> {
    let mut disabled: BTreeSet<&str> = BTreeSet::new();
    let mut selected = Vec::with_capacity(schema.exclusion_groups().len());

    for group in schema.exclusion_groups() {
        let populated_branches: Vec<(usize, &str)> = group
            .branches()
            .iter()
            .enumerate()
            .filter_map(|(i, branch)| {
                branch
                    .iter()
                    .find(|name| populated.contains(name.as_str()))
                    .map(|name| (i, name.as_str()))
            })
            .collect();

        match populated_branches.as_slice() {
            [] => selected.push(None),
            [(chosen, _)] => {
                selected.push(Some(*chosen));
                group
                    .branches()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| i != chosen)
                    .flat_map(|(_, branch)| branch.iter())
                    .for_each(|name| {
                        disabled.insert(name.as_str());
                    });
            }
            [(_, first), (_, second), ..] => {
                return Err(ValidationError::ConflictingInput {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }

    let (suppressed, eligible): (Vec<String>, Vec<String>) = schema
        .variables()
        .iter()
        .map(|spec| spec.name().to_string())
        .partition(|name| disabled.contains(name.as_str()));

    Ok(Resolution {
        eligible,
        suppressed,
        selected,
    })
}
