use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a formula, ready for compilation.
/// This is the target structure for any custom configuration format.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FormulaDefinition {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub min_required: usize,
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub exclusion_groups: Vec<ExclusionGroupDefinition>,
    /// The quantity the formula computes. Without one, the formula is solved for
    /// every variable left empty.
    #[serde(default)]
    pub result: Option<ResultDefinition>,
}

/// Defines a single input variable of a formula.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default = "default_zero_allowed")]
    pub zero_allowed: bool,
    /// The formula cannot be computed without this variable, whatever else is entered.
    #[serde(default)]
    pub required: bool,
    /// Accepted units. The first entry is the canonical unit.
    #[serde(default)]
    pub units: Vec<String>,
}

fn default_zero_allowed() -> bool {
    true
}

impl VariableDefinition {
    /// An optional variable with no bounds and no declared units. Zero is allowed.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            minimum: None,
            maximum: None,
            zero_allowed: true,
            required: false,
            units: Vec::new(),
        }
    }
}

/// A set of alternative branches. Each branch is an ordered list of variable names;
/// branches are listed in priority order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExclusionGroupDefinition {
    pub branches: Vec<Vec<String>>,
}

/// Defines the solved quantity and its physically admissible domain.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResultDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}
