use std::fmt;
use thiserror::Error;

/// Errors that can occur while loading and compiling formula schemas.
///
/// These are raised once, at configuration time, and never during a
/// validation pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Failed to parse catalog JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to read catalog file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Formula '{formula_id}' declares no variables")]
    EmptyFormula { formula_id: String },

    #[error("Formula '{formula_id}' declares variable '{name}' more than once")]
    DuplicateVariable { formula_id: String, name: String },

    #[error("Formula '{0}' is defined more than once in the catalog")]
    DuplicateFormula(String),

    #[error("Formula '{0}' was not found in the catalog")]
    UnknownFormula(String),

    #[error("Exclusion group {group_index} of formula '{formula_id}' references unknown variable '{name}'")]
    UnknownVariable {
        formula_id: String,
        group_index: usize,
        name: String,
    },

    #[error("Variable '{name}' of formula '{formula_id}' appears in more than one exclusion group or branch")]
    OverlappingExclusionGroups { formula_id: String, name: String },

    #[error("Exclusion group {group_index} of formula '{formula_id}' is invalid: {message}")]
    InvalidExclusionGroup {
        formula_id: String,
        group_index: usize,
        message: String,
    },

    #[error("Variable '{name}' of formula '{formula_id}' has invalid bounds [{minimum}, {maximum}]")]
    InvalidBounds {
        formula_id: String,
        name: String,
        minimum: f64,
        maximum: f64,
    },

    #[error("Formula '{formula_id}' requires {required} inputs, but only {available} variables are declared")]
    InvalidRequiredCount {
        formula_id: String,
        required: usize,
        available: usize,
    },

    #[error("Variable '{name}' of formula '{formula_id}' accepts unit '{unit}', which is not in the unit table")]
    UnknownUnit {
        formula_id: String,
        name: String,
        unit: String,
    },

    #[error("Formula '{0}' has no registered evaluator")]
    MissingEvaluator(String),

    #[error("Formula '{formula_id}' needs a {expected}, but a {found} is registered")]
    MismatchedEvaluator {
        formula_id: String,
        expected: String,
        found: String,
    },
}

/// The kind of a [`ValidationError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Range,
    ZeroNotAllowed,
    ConflictingInput,
    InsufficientData,
    UnitConversion,
    Calculation,
    PhysicallyImpossibleResult,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::Range => "RangeError",
            ErrorKind::ZeroNotAllowed => "ZeroNotAllowedError",
            ErrorKind::ConflictingInput => "ConflictingInputError",
            ErrorKind::InsufficientData => "InsufficientDataError",
            ErrorKind::UnitConversion => "UnitConversionError",
            ErrorKind::Calculation => "CalculationError",
            ErrorKind::PhysicallyImpossibleResult => "PhysicallyImpossibleResultError",
        };
        f.write_str(name)
    }
}

/// Errors reported by a validation or calculation pass.
///
/// This is the closed taxonomy handed back to the form layer. Every variant
/// carries the data needed to build a field-specific message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}': '{raw}' is not a valid number")]
    Parse { field: String, raw: String },

    #[error("Field '{field}': value {value} is outside the allowed range [{minimum}, {maximum}]")]
    Range {
        field: String,
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    #[error("Field '{field}' cannot be zero")]
    ZeroNotAllowed { field: String },

    #[error("Fields '{first}' and '{second}' are mutually exclusive and cannot both be provided")]
    ConflictingInput { first: String, second: String },

    #[error("{missing} more input value(s) required to solve")]
    InsufficientData { missing: usize },

    #[error("Field '{field}': cannot convert from unit '{unit}': {reason}")]
    UnitConversion {
        field: String,
        unit: String,
        reason: String,
    },

    #[error("Calculation of '{formula_id}' failed: {reason}")]
    Calculation { formula_id: String, reason: String },

    #[error("Result '{quantity}' = {value} is physically impossible: {reason}")]
    PhysicallyImpossibleResult {
        quantity: String,
        value: f64,
        reason: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Parse { .. } => ErrorKind::Parse,
            ValidationError::Range { .. } => ErrorKind::Range,
            ValidationError::ZeroNotAllowed { .. } => ErrorKind::ZeroNotAllowed,
            ValidationError::ConflictingInput { .. } => ErrorKind::ConflictingInput,
            ValidationError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ValidationError::UnitConversion { .. } => ErrorKind::UnitConversion,
            ValidationError::Calculation { .. } => ErrorKind::Calculation,
            ValidationError::PhysicallyImpossibleResult { .. } => {
                ErrorKind::PhysicallyImpossibleResult
            }
        }
    }

    /// The input field this error is attached to, if it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Parse { field, .. }
            | ValidationError::Range { field, .. }
            | ValidationError::ZeroNotAllowed { field }
            | ValidationError::UnitConversion { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors raised by the physics layer: unit converters and formula evaluators.
///
/// The calculator remaps these into [`ValidationError`]; they never reach the
/// form layer directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Mathematically undefined: {0}")]
    Undefined(String),

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Unit '{unit}' is not compatible with '{expected}'")]
    IncompatibleUnit { unit: String, expected: String },

    #[error("Input '{0}' is required by the formula but was not provided")]
    MissingInput(String),
}

/// Errors that can occur when converting a custom user format into a `FormulaDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
