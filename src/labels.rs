//! Residue-level interface labels derived from 3D structures.
//!
//! Positive labels are residue pairs across two subunits that come within a distance cutoff of
//! each other in the bound structures. Negatives are every other residue pair across the same
//! subunits in the unbound structures.
pub mod negatives;
pub mod neighbors;
pub mod structs;
pub mod subunits;
pub mod unbound;

// Re-exports
pub use negatives::{get_all_negatives, get_negatives};
pub use neighbors::{find_pair_neighbors, get_all_neighbors};
pub use structs::*;
pub use subunits::get_subunits;
pub use unbound::{filter_unbound, UnboundReport};

use crate::errors::Result;
use polars::prelude::*;
use tracing::{debug, info};

/// Settings for [`get_labels`].
#[derive(Clone, Debug)]
pub struct LabelSettings {
    /// Maximum distance (Å, exclusive) for two residues to be neighbors
    pub cutoff: f64,
    /// Atoms used to measure residue distances
    pub cutoff_type: CutoffType,
    /// Also emit negative labels
    pub negatives: bool,
    /// Largest dense residue matrix the negative sampler may allocate
    pub max_matrix_cells: usize,
    /// Most negative rows emitted over all subunit pairs; each row holds four owned strings
    pub max_negatives: usize,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            cutoff: 8.0,
            cutoff_type: CutoffType::Ca,
            negatives: false,
            max_matrix_cells: 50_000_000,
            max_negatives: 5_000_000,
        }
    }
}

/// Positive contacts between the subunits, restricted to residues present in the unbound inputs.
///
/// # Arguments
///
/// * `inputs` - Atom tables of the input (unbound) structures
/// * `bounds` - Optional bound atom tables in one-to-one correspondence with `inputs`
/// * `cutoff` - Distance cutoff in Å
/// * `cutoff_type` - Whether to measure CA-CA or heavy-atom distances
pub fn get_positive_labels(
    inputs: &[Vec<AtomRecord>],
    bounds: &[Vec<AtomRecord>],
    cutoff: f64,
    cutoff_type: CutoffType,
) -> Result<(Vec<ContactPair>, Vec<Subunit>)> {
    let (unbound_subunits, bound_subunits) = get_subunits(inputs, bounds)?;

    // Extract neighboring pairs of residues spanning different subunits
    let neighbors = get_all_neighbors(&bound_subunits, cutoff, cutoff_type)?;
    debug!("Found {} neighboring residue pairs", neighbors.len());

    let (positives, _) = filter_unbound(neighbors, &unbound_subunits);
    Ok((positives, unbound_subunits))
}

/// Full label table: positives first, then negatives if requested.
///
/// # Example
///
/// ```no_run
/// use ppidata::{load_atoms, get_labels, labels_to_df, LabelSettings};
///
/// let atoms = load_atoms("path/to/complex.pdb").unwrap();
/// let labels = get_labels(&[atoms], &[], &LabelSettings::default()).unwrap();
/// let df = labels_to_df(&labels).unwrap();
/// println!("Found {} labelled residue pairs", df.height());
/// ```
pub fn get_labels(
    inputs: &[Vec<AtomRecord>],
    bounds: &[Vec<AtomRecord>],
    settings: &LabelSettings,
) -> Result<Vec<ContactPair>> {
    let (mut labels, unbound_subunits) =
        get_positive_labels(inputs, bounds, settings.cutoff, settings.cutoff_type)?;
    info!("Kept {} positive residue pairs", labels.len());

    if settings.negatives {
        let negatives = get_all_negatives(
            &labels,
            &unbound_subunits,
            settings.max_matrix_cells,
            settings.max_negatives,
        )?;
        info!("Generated {} negative residue pairs", negatives.len());
        labels.extend(negatives);
    }
    Ok(labels)
}

/// Convert label rows into a Polars `DataFrame`.
///
/// Columns: `structure0, model0, chain0, residue0, structure1, model1, chain1, residue1, label`.
pub fn labels_to_df(res: &[ContactPair]) -> Result<DataFrame> {
    let model = |m: usize| u32::try_from(m).unwrap_or(u32::MAX);
    Ok(df!(
        "structure0" => res.iter().map(|x| x.res0.structure.clone()).collect::<Vec<String>>(),
        "model0" => res.iter().map(|x| model(x.res0.model)).collect::<Vec<u32>>(),
        "chain0" => res.iter().map(|x| x.res0.chain.clone()).collect::<Vec<String>>(),
        "residue0" => res.iter().map(|x| x.res0.residue_label()).collect::<Vec<String>>(),
        "structure1" => res.iter().map(|x| x.res1.structure.clone()).collect::<Vec<String>>(),
        "model1" => res.iter().map(|x| model(x.res1.model)).collect::<Vec<u32>>(),
        "chain1" => res.iter().map(|x| x.res1.chain.clone()).collect::<Vec<String>>(),
        "residue1" => res.iter().map(|x| x.res1.residue_label()).collect::<Vec<String>>(),
        "label" => res.iter().map(|x| x.label as u32).collect::<Vec<u32>>(),
    )?)
}
