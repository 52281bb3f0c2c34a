use super::exclusion::Resolution;
use crate::outcome::ValidationOutcome;
use crate::schema::FormulaSchema;
use std::collections::BTreeSet;

/// Decides whether enough variables are populated to compute the unknown.
///
/// Only eligible variables count. Once the schema's minimum is met, every required
/// variable must be populated and every selected multi-variable branch must be
/// complete; the unpopulated ones are reported as missing.
pub fn check_solvability(
    schema: &FormulaSchema,
    resolution: &Resolution,
    populated: &BTreeSet<&str>,
) -> ValidationOutcome {
    let count = resolution
        .eligible
        .iter()
        .filter(|name| populated.contains(name.as_str()))
        .count();

    let minimum = schema.min_required();
    if count < minimum {
        return ValidationOutcome::InsufficientData {
            missing: minimum - count,
        };
    }

    let unmet = schema
        .required()
        .filter(|spec| !populated.contains(spec.name()))
        .count();

    let incomplete: usize = schema
        .exclusion_groups()
        .iter()
        .zip(&resolution.selected)
        .filter_map(|(group, selected)| selected.map(|b| &group.branches()[b]))
        .map(|branch| {
            branch
                .iter()
                .filter(|name| !populated.contains(name.as_str()))
                .count()
        })
        .sum();

    let missing = unmet + incomplete;
    if missing > 0 {
        ValidationOutcome::InsufficientData { missing }
    } else {
        ValidationOutcome::Valid
    }
}
