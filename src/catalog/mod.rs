//! Process-wide formula configuration.
//!
//! A [`Catalog`] is loaded once (from JSON, or the embedded built-in set), compiled and
//! checked up front, and read-only afterwards.

use crate::compiler::SchemaCompiler;
use crate::error::SchemaError;
use crate::schema::{FormulaDefinition, FormulaSchema};
use crate::units::{UnitDefinition, UnitTable};
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

const BUILTIN_CATALOG: &str = include_str!("builtin.json");

/// The on-disk catalog format.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    pub formulas: Vec<FormulaDefinition>,
}

/// A set of compiled formula schemas sharing one unit table.
#[derive(Debug, Clone)]
pub struct Catalog {
    schemas: Vec<FormulaSchema>,
    index: AHashMap<String, usize>,
    units: UnitTable,
}

impl Catalog {
    /// Compiles every formula against the catalog's unit table.
    ///
    /// If the catalog declares no units at all, unit names are not checked.
    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, SchemaError> {
        if let Some(id) = definition
            .formulas
            .iter()
            .map(|f| f.id.as_str())
            .duplicates()
            .next()
        {
            return Err(SchemaError::DuplicateFormula(id.to_string()));
        }

        let units = UnitTable::from_definitions(&definition.units);
        let mut schemas = Vec::with_capacity(definition.formulas.len());
        let mut index = AHashMap::new();

        for formula in definition.formulas {
            let id = formula.id.clone();
            let mut builder = SchemaCompiler::builder(formula);
            if !units.is_empty() {
                builder = builder.with_unit_table(&units);
            }
            let schema = builder.build().compile()?;

            index.insert(id, schemas.len());
            schemas.push(schema);
        }

        info!(
            formulas = schemas.len(),
            units = units.len(),
            "formula catalog loaded"
        );

        Ok(Self {
            schemas,
            index,
            units,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let definition: CatalogDefinition = serde_json::from_str(json)
            .map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
        Self::from_definition(definition)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// The formulas shipped with the crate, matching [`FormulaRegistry::with_defaults`](crate::physics::FormulaRegistry::with_defaults).
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn get(&self, formula_id: &str) -> Result<&FormulaSchema, SchemaError> {
        self.index
            .get(formula_id)
            .map(|&i| &self.schemas[i])
            .ok_or_else(|| SchemaError::UnknownFormula(formula_id.to_string()))
    }

    /// Formula ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(FormulaSchema::id)
    }

    pub fn schemas(&self) -> &[FormulaSchema] {
        &self.schemas
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
