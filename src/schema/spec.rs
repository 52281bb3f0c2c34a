use ahash::AHashMap;
use serde::Serialize;

/// An immutable, validated description of one input variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSpec {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) minimum: f64,
    pub(crate) maximum: f64,
    pub(crate) zero_allowed: bool,
    pub(crate) required: bool,
    pub(crate) units: Vec<String>,
}

impl VariableSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label, e.g. `"Current (I)"`. Falls back to the name.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn zero_allowed(&self) -> bool {
        self.zero_allowed
    }

    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether `value`, in the canonical unit, lies within the inclusive bounds.
    pub fn in_bounds(&self, value: f64) -> bool {
        value >= self.minimum && value <= self.maximum
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// The unit values are converted into before evaluation. Empty if the
    /// variable is dimensionless.
    pub fn canonical_unit(&self) -> &str {
        self.units.first().map(String::as_str).unwrap_or("")
    }

    pub fn accepts_unit(&self, unit: &str) -> bool {
        unit.is_empty() || self.units.is_empty() || self.units.iter().any(|u| u == unit)
    }
}

/// Alternative branches of variables. At most one branch may be populated per attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExclusionGroup {
    pub(crate) branches: Vec<Vec<String>>,
}

impl ExclusionGroup {
    /// Branches in priority order.
    pub fn branches(&self) -> &[Vec<String>] {
        &self.branches
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members().any(|m| m == name)
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().flatten().map(String::as_str)
    }
}

/// The solved quantity and the bounds a physically meaningful result must respect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSpec {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) unit: String,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
}

impl ResultSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }
}

/// A compiled formula schema.
///
/// Produced by [`SchemaCompiler`](crate::compiler::SchemaCompiler), which guarantees that
/// exclusion groups are disjoint and reference only declared variables, that required
/// variables sit outside every group, and that `min_required` is reachable. Read-only
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaSchema {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) variables: Vec<VariableSpec>,
    pub(crate) exclusion_groups: Vec<ExclusionGroup>,
    pub(crate) min_required: usize,
    pub(crate) result: Option<ResultSpec>,
    #[serde(skip)]
    pub(crate) index: AHashMap<String, usize>,
}

impl FormulaSchema {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn exclusion_groups(&self) -> &[ExclusionGroup] {
        &self.exclusion_groups
    }

    pub fn min_required(&self) -> usize {
        self.min_required
    }

    /// `None` when the formula is solved for its empty variables instead.
    pub fn result(&self) -> Option<&ResultSpec> {
        self.result.as_ref()
    }

    /// Variables that must be populated for the formula to be computed.
    pub fn required(&self) -> impl Iterator<Item = &VariableSpec> {
        self.variables.iter().filter(|v| v.required)
    }

    /// What a calculation produces: the result label, or the title for formulas
    /// solved for their empty variables.
    pub fn target_label(&self) -> &str {
        self.result.as_ref().map_or(&self.title, |r| &r.label)
    }

    /// The display label for a variable or the result quantity.
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        match (self.variable(name), &self.result) {
            (Some(spec), _) => spec.label(),
            (None, Some(result)) if name == result.name => result.label(),
            _ => name,
        }
    }
}
