use crate::errors::{Error, Result};
use std::time::{Duration, Instant};

/// Sequence of one chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainSequence {
    pub chain: String,
    pub sequence: String,
}

/// A structure identifier together with the sequences of its chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSequenceEntry {
    pub id: String,
    pub chains: Vec<ChainSequence>,
}

impl ChainSequenceEntry {
    /// Entry with a single unnamed chain.
    pub fn single(id: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            chains: vec![ChainSequence {
                chain: String::new(),
                sequence: sequence.to_string(),
            }],
        }
    }
}

/// Structure identifiers assigned to train, validation and test sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    pub train: Vec<String>,
    pub val: Vec<String>,
    pub test: Vec<String>,
    /// Identifiers surfaced as homologs of an evaluation family but not admitted to it.
    /// Always empty for cluster splits.
    pub excluded: Vec<String>,
}

/// Caps on how long a split loop may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitBudget {
    pub max_iterations: Option<usize>,
    pub max_duration: Option<Duration>,
}

/// Settings shared by the cluster and identity splitters.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSettings {
    /// Fraction of the data used for validation
    pub val_split: f64,
    /// Fraction of the data used for testing
    pub test_split: f64,
    /// Controls variety of val/test sets: no family may exceed `split_size / min_fam_in_split`
    pub min_fam_in_split: usize,
    /// Seed for shuffling and sampling; `None` draws from system entropy
    pub random_seed: Option<u64>,
    pub budget: SplitBudget,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            val_split: 0.1,
            test_split: 0.1,
            min_fam_in_split: 5,
            random_seed: None,
            budget: SplitBudget::default(),
        }
    }
}

impl SplitSettings {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |f: f64| (0.0..=1.0).contains(&f);
        if !in_unit(self.val_split) || !in_unit(self.test_split) {
            return Err(Error::InvalidSplit(format!(
                "fractions must lie in [0, 1], got val {} and test {}",
                self.val_split, self.test_split
            )));
        }
        if self.val_split + self.test_split > 1.0 {
            return Err(Error::InvalidSplit(format!(
                "val and test fractions sum to {}",
                self.val_split + self.test_split
            )));
        }
        if self.min_fam_in_split == 0 {
            return Err(Error::InvalidSplit(
                "min_fam_in_split must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Target `(val_size, test_size)` for `n` retained entries.
    pub fn target_sizes(&self, n: usize) -> (usize, usize) {
        let size = |f: f64| (f * n as f64).round() as usize;
        (size(self.val_split), size(self.test_split))
    }
}

/// Counts iterations of one split loop against its budget.
pub(crate) struct BudgetTracker {
    budget: SplitBudget,
    split: &'static str,
    started: Instant,
    iterations: usize,
}

impl BudgetTracker {
    pub(crate) fn new(budget: SplitBudget, split: &'static str) -> Self {
        Self {
            budget,
            split,
            started: Instant::now(),
            iterations: 0,
        }
    }

    /// Record one iteration, failing once either cap is exceeded.
    pub(crate) fn tick(&mut self) -> Result<()> {
        self.iterations += 1;
        let over_iterations = self
            .budget
            .max_iterations
            .is_some_and(|max| self.iterations > max);
        let over_time = self
            .budget
            .max_duration
            .is_some_and(|max| self.started.elapsed() > max);
        if over_iterations || over_time {
            return Err(Error::BudgetExhausted {
                split: self.split,
                iterations: self.iterations - 1,
            });
        }
        Ok(())
    }
}
