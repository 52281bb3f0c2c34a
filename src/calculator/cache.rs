use super::{Calculation, Calculator};
use crate::data::InputSnapshot;
use crate::error::ValidationError;
use ahash::AHashMap;
use tracing::trace;

/// A [`Calculator`] that memoizes results per snapshot.
///
/// Entries are keyed on the complete snapshot (every field's raw text and unit), so a
/// changed input always misses. Failed attempts are cached too; the pipeline is pure,
/// so replaying an error is identical to recomputing it.
pub struct CachedCalculator<'a> {
    calculator: Calculator<'a>,
    entries: AHashMap<InputSnapshot, Result<Calculation, ValidationError>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<'a> CachedCalculator<'a> {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(calculator: Calculator<'a>) -> Self {
        Self::with_capacity(calculator, Self::DEFAULT_CAPACITY)
    }

    /// When the cache is full it is cleared before the next insert.
    pub fn with_capacity(calculator: Calculator<'a>, capacity: usize) -> Self {
        Self {
            calculator,
            entries: AHashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn calculate(&mut self, snapshot: &InputSnapshot) -> Result<Calculation, ValidationError> {
        if let Some(cached) = self.entries.get(snapshot) {
            self.hits += 1;
            trace!(formula = %self.calculator.schema().id(), "calculation cache hit");
            return cached.clone();
        }

        self.misses += 1;
        let result = self.calculator.calculate(snapshot);
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(snapshot.clone(), result.clone());
        result
    }

    pub fn calculator(&self) -> &Calculator<'a> {
        &self.calculator
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
