use crate::domain::UnitConverter;
use crate::error::DomainError;
use crate::schema::VariableSpec;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One entry of a unit table: `base = raw * factor`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnitDefinition {
    pub symbol: String,
    pub factor: f64,
}

/// Multiplicative unit conversion table.
///
/// Every symbol maps to the factor that converts a value in that unit into the
/// base unit of its dimension. Converting into a variable's canonical unit divides
/// by the canonical unit's own factor, so canonical units need not be base units.
/// Which symbols a variable accepts is decided by its [`VariableSpec`], not by the table.
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    factors: AHashMap<String, f64>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: &[UnitDefinition]) -> Self {
        let mut table = Self::new();
        for def in definitions {
            table.insert(&def.symbol, def.factor);
        }
        table
    }

    pub fn with_unit(mut self, symbol: &str, factor: f64) -> Self {
        self.insert(symbol, factor);
        self
    }

    pub fn insert(&mut self, symbol: &str, factor: f64) {
        self.factors.insert(symbol.to_string(), factor);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.factors.contains_key(symbol)
    }

    pub fn factor(&self, symbol: &str) -> Option<f64> {
        self.factors.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl UnitConverter for UnitTable {
    fn to_canonical(
        &self,
        spec: &VariableSpec,
        value: f64,
        unit: &str,
    ) -> Result<f64, DomainError> {
        // An empty unit means the field's default, which is the canonical one.
        if unit.is_empty() || unit == spec.canonical_unit() {
            return Ok(value);
        }
        if !spec.accepts_unit(unit) {
            return Err(DomainError::IncompatibleUnit {
                unit: unit.to_string(),
                expected: spec.canonical_unit().to_string(),
            });
        }
        let factor = self
            .factor(unit)
            .ok_or_else(|| DomainError::UnknownUnit(unit.to_string()))?;
        let canonical_factor = self.factor(spec.canonical_unit()).unwrap_or(1.0);
        Ok(value * factor / canonical_factor)
    }
}
