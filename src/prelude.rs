//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kakunin crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kakunin::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = Catalog::from_file("path/to/formulas.json")?;
//! let schema = catalog.get("magnetic_field")?;
//!
//! let snapshot = InputSnapshot::from_file("path/to/snapshot.json")?;
//! let assessment = Validator::new(schema).assess(&snapshot);
//!
//! println!("Outcome: {:?}", assessment.outcome);
//! # Ok(())
//! # }
//! ```

// Configuration and compilation
pub use crate::catalog::{Catalog, CatalogDefinition};
pub use crate::compiler::SchemaCompiler;
pub use crate::schema::{
    ExclusionGroup, ExclusionGroupDefinition, FormulaDefinition, FormulaSchema, IntoSchema,
    ResultDefinition, ResultSpec, VariableDefinition, VariableSpec,
};

// Validation and calculation
pub use crate::calculator::{CachedCalculator, Calculation, Calculator, Quantity};
pub use crate::data::{FieldInput, InputSnapshot, InputValue};
pub use crate::outcome::ValidationOutcome;
pub use crate::validator::{Assessment, FieldReport, FieldStatus, Resolution, Validator};

// Physics layer interfaces
pub use crate::domain::{
    CanonicalOnly, FormulaEvaluator, FormulaSolver, Method, NamedInputs, UnitConverter,
};
pub use crate::physics::FormulaRegistry;
pub use crate::units::{UnitDefinition, UnitTable};

// Error types
pub use crate::error::{ConversionError, DomainError, ErrorKind, SchemaError, ValidationError};

// Messages
pub use crate::message::MessageFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
