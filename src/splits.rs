//! Homology-aware train/validation/test splits.
//!
//! Both splitters assemble the validation and test sets family by family, so that no train entry
//! shares a sequence family with an evaluation entry. [`cluster`] reads families from published
//! sequence clusterings, [`identity`] discovers them with a similarity search.

pub mod align;
pub mod cluster;
pub mod identity;
pub mod structs;

pub use align::{align, sequence_identity, Alignment};
pub use cluster::{
    cluster_split, cluster_split_seeded, ClusterAssignment, ClusterLookup, CLUSTER_CUTOFFS,
};
pub use identity::{
    identity_split, identity_split_seeded, CancelToken, SequenceIndex, SimilaritySearch,
};
pub use structs::{ChainSequence, ChainSequenceEntry, SplitBudget, SplitResult, SplitSettings};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random source for a split: reproducible when `seed` is set, from system entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
