//! # ppidata
//!
//! Dataset preparation for protein-protein interaction learning.
//!
//! The [`labels`] pipeline turns bound and unbound structures into residue-pair interface labels:
//! residues of two subunits within a distance cutoff are positives, every other cross-subunit
//! residue pair is a negative. The [`splits`] module partitions a dataset into train, validation
//! and test sets so that no sequence family straddles the boundary between training and
//! evaluation data.
//!
//! Label tables are returned as Polars DataFrames, which can be written to CSV, Parquet or JSON
//! with [`write_df_to_file`].

pub mod chains;
pub mod errors;
pub mod labels;
pub mod residues;
pub mod splits;
pub mod structure;
pub mod utils;

// Re-export key public types
pub use chains::{get_chain_sequences, ChainExt};
pub use errors::{Error, Result};
pub use labels::{
    get_labels, get_positive_labels, labels_to_df, AtomRecord, ContactPair, CutoffType,
    LabelSettings, ResidueKey, Subunit,
};
pub use residues::ResidueExt;
pub use splits::{
    cluster_split, cluster_split_seeded, identity_split, identity_split_seeded, rng_from_seed,
    ChainSequence, ChainSequenceEntry, ClusterAssignment, ClusterLookup, SequenceIndex,
    SimilaritySearch, SplitBudget, SplitResult, SplitSettings,
};
pub use structure::{load_atoms, load_model, pdb_to_atoms};
pub use utils::{pdb_code, run_with_threads, write_df_to_file, write_split, DataFrameFileType};
