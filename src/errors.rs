//! Error type shared by the labelling and splitting pipelines.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building interface labels or dataset splits.
#[derive(Debug)]
pub enum Error {
    /// Bound tables were given but their count differs from the input tables
    BoundCountMismatch {
        /// Number of input tables
        inputs: usize,
        /// Number of bound tables
        bounds: usize,
    },
    /// A table that must describe one structure names several (or none)
    AmbiguousStructure(Vec<String>),
    /// The same identifier appears twice in an identity split
    DuplicateIdentifier(String),
    /// Distance or sequence identity cutoff outside the accepted range
    InvalidCutoff(f64),
    /// Split fractions or family settings that cannot describe a split
    InvalidSplit(String),
    /// Fewer than two subunits to define an interface
    TooFewSubunits(usize),
    /// Dense residue matrix would be impractically large
    MatrixTooLarge {
        /// Residues in the first subunit
        rows: usize,
        /// Residues in the second subunit
        cols: usize,
        /// Configured cell limit
        limit: usize,
    },
    /// Negative sampling would emit more rows than allowed
    TooManyNegatives {
        /// Rows that would have been emitted
        count: usize,
        /// Configured row limit
        limit: usize,
    },
    /// Underlying I/O failure
    Io(std::io::Error),
    /// Structure file could not be parsed
    Parse(String),
    /// Cluster lookup service failed
    ClusterLookup(String),
    /// Similarity search service failed
    SimilaritySearch(String),
    /// A similarity query was cancelled
    Cancelled,
    /// DataFrame construction or serialization failed
    DataFrame(polars::error::PolarsError),
    /// The candidate pool ran out before the split reached its target size
    SplitUnsatisfiable {
        /// Split being built
        split: &'static str,
        /// Target size
        target: usize,
        /// Size reached when the pool was exhausted
        reached: usize,
    },
    /// Iteration or wall-time budget used up
    BudgetExhausted {
        /// Split being built
        split: &'static str,
        /// Iterations performed
        iterations: usize,
    },
}

impl Error {
    /// Collaborator failures a caller may retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::ClusterLookup(_) | Error::SimilaritySearch(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BoundCountMismatch { inputs, bounds } => write!(
                f,
                "Got {bounds} bound structures for {inputs} input structures; provide the same number and in the same order"
            ),
            Error::AmbiguousStructure(names) => {
                write!(f, "Expected exactly one structure name per table, found {names:?}")
            }
            Error::DuplicateIdentifier(id) => write!(f, "Duplicate identifier {id}"),
            Error::InvalidCutoff(c) => write!(f, "Invalid cutoff {c}"),
            Error::InvalidSplit(msg) => write!(f, "Invalid split settings: {msg}"),
            Error::TooFewSubunits(n) => {
                write!(f, "Need at least two subunits to define an interface, found {n}")
            }
            Error::MatrixTooLarge { rows, cols, limit } => write!(
                f,
                "Residue matrix of {rows} x {cols} exceeds the limit of {limit} cells"
            ),
            Error::TooManyNegatives { count, limit } => write!(
                f,
                "Negative sampling would emit at least {count} rows, more than the limit of {limit}"
            ),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Parse(msg) => write!(f, "Failed to parse structure: {msg}"),
            Error::ClusterLookup(msg) => write!(f, "Cluster lookup failed: {msg}"),
            Error::SimilaritySearch(msg) => write!(f, "Similarity search failed: {msg}"),
            Error::Cancelled => write!(f, "Similarity search cancelled"),
            Error::DataFrame(e) => write!(f, "DataFrame error: {e}"),
            Error::SplitUnsatisfiable {
                split,
                target,
                reached,
            } => write!(
                f,
                "Could not fill the {split} split: reached {reached} of {target} before running out of admissible families"
            ),
            Error::BudgetExhausted { split, iterations } => write!(
                f,
                "Budget exhausted after {iterations} iterations while building the {split} split"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::DataFrame(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(err: polars::error::PolarsError) -> Self {
        Error::DataFrame(err)
    }
}
