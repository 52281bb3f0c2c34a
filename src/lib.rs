//! # Kakunin - Formula Input Validation and Solvability Engine
//!
//! **Kakunin** decides, for a physics formula and a snapshot of raw form fields, whether
//! the entered values are admissible and whether enough of them are present to solve for
//! the unknown. When asked to calculate, it sequences validation, unit conversion,
//! formula evaluation, and result validation, and reports every failure through one
//! closed error taxonomy instead of panics or generic messages.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Formulas**: Write a JSON catalog, or implement `IntoSchema` for
//!     your own configuration structs to produce `FormulaDefinition`s.
//! 2.  **Compile**: `Catalog::from_json` (or `SchemaCompiler::builder`) turns definitions into
//!     immutable `FormulaSchema`s. Inconsistent rules, such as overlapping exclusion groups
//!     or an unreachable minimum input count, are rejected here, once.
//! 3.  **Validate**: A `Validator` assesses snapshots as the user types, reporting per-field
//!     status and whether the formula is solvable yet.
//! 4.  **Calculate**: A `Calculator` runs the full pipeline against the unit converter and
//!     formula evaluator or solver you provide, or the built-in ones.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kakunin::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let catalog = Catalog::builtin()?;
//!     let registry = FormulaRegistry::with_defaults();
//!     let calculator = Calculator::from_catalog(&catalog, &registry, "force_on_wire")?;
//!
//!     let snapshot = InputSnapshot::new()
//!         .with("I", "5")
//!         .with_unit("L", "200", "cm")
//!         .with("B", "0.1");
//!
//!     match calculator.calculate(&snapshot) {
//!         Ok(calc) => {
//!             for q in &calc.results {
//!                 println!("{} = {} {}", q.name, q.value, q.unit);
//!             }
//!         }
//!         Err(e) => {
//!             let messages = MessageFormatter::new(calculator.schema());
//!             println!("{}", messages.format_error(&e));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod calculator;
pub mod catalog;
pub mod compiler;
pub mod data;
pub mod domain;
pub mod error;
pub mod message;
pub mod outcome;
pub mod physics;
pub mod prelude;
pub mod schema;
pub mod units;
pub mod validator;
