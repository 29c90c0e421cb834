use super::neighbors::subunit_pairs;
use super::structs::{ContactPair, ResidueKey, Subunit};
use crate::errors::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Maps residues to indices in order of first appearance
fn residue_index(subunit: &Subunit) -> (Vec<ResidueKey>, HashMap<ResidueKey, usize>) {
    let idx2res = subunit.residues();
    let res2idx = idx2res
        .iter()
        .enumerate()
        .map(|(i, r)| (r.clone(), i))
        .collect();
    (idx2res, res2idx)
}

/// Every residue pair across `sub0` x `sub1` that is not a positive contact.
///
/// Positives that do not fall on this subunit pair are ignored. Fails with
/// [`Error::MatrixTooLarge`] instead of allocating more than `max_cells` matrix cells, and with
/// [`Error::TooManyNegatives`] instead of emitting more than `max_rows` negatives.
pub fn get_negatives(
    neighbors: &[ContactPair],
    sub0: &Subunit,
    sub1: &Subunit,
    max_cells: usize,
    max_rows: usize,
) -> Result<Vec<ContactPair>> {
    let (idx2res0, res2idx0) = residue_index(sub0);
    let (idx2res1, res2idx1) = residue_index(sub1);
    let (rows, cols) = (idx2res0.len(), idx2res1.len());
    if rows.saturating_mul(cols) > max_cells {
        return Err(Error::MatrixTooLarge {
            rows,
            cols,
            limit: max_cells,
        });
    }

    let mut all_pairs = vec![false; rows * cols];
    for n in neighbors {
        if let (Some(&i), Some(&j)) = (res2idx0.get(&n.res0), res2idx1.get(&n.res1)) {
            all_pairs[i * cols + j] = true;
        }
    }

    let count = all_pairs.iter().filter(|contact| !**contact).count();
    if count > max_rows {
        return Err(Error::TooManyNegatives {
            count,
            limit: max_rows,
        });
    }

    Ok(all_pairs
        .iter()
        .enumerate()
        .filter(|(_, contact)| !**contact)
        .map(|(k, _)| {
            ContactPair::negative(idx2res0[k / cols].clone(), idx2res1[k % cols].clone())
        })
        .collect())
}

/// Negatives accumulated over every pair of unbound subunits, at most `max_rows` in total.
pub fn get_all_negatives(
    neighbors: &[ContactPair],
    unbound_subunits: &[Subunit],
    max_cells: usize,
    max_rows: usize,
) -> Result<Vec<ContactPair>> {
    let mut negatives = Vec::new();
    for (i, j) in subunit_pairs(unbound_subunits.len()) {
        let curr = get_negatives(
            neighbors,
            &unbound_subunits[i],
            &unbound_subunits[j],
            max_cells,
            max_rows - negatives.len(),
        )
        .map_err(|e| match e {
            Error::TooManyNegatives { count, .. } => Error::TooManyNegatives {
                count: count + negatives.len(),
                limit: max_rows,
            },
            other => other,
        })?;
        debug!("Found {} negatives between subunits {i} and {j}", curr.len());
        negatives.extend(curr);
    }
    Ok(negatives)
}
