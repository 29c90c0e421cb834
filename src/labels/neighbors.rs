use super::structs::{AtomRecord, ContactPair, CutoffType, Subunit};
use crate::errors::{Error, Result};
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use std::collections::HashSet;
use tracing::debug;

type IndexedPoint = GeomWithData<[f64; 3], usize>;

/// Find residue pairs across two subunits with any qualifying atom pair closer than `cutoff`.
///
/// Atoms are filtered by `cutoff_type` first. Each residue pair is reported once, ordered by the
/// first atom pair that triggered it.
pub fn find_pair_neighbors(
    sub0: &Subunit,
    sub1: &Subunit,
    cutoff: f64,
    cutoff_type: CutoffType,
) -> Vec<ContactPair> {
    let atoms0: Vec<&AtomRecord> = sub0.atoms.iter().filter(|a| cutoff_type.accepts(a)).collect();
    let atoms1: Vec<&AtomRecord> = sub1.atoms.iter().filter(|a| cutoff_type.accepts(a)).collect();
    if atoms0.is_empty() || atoms1.is_empty() {
        return vec![];
    }

    let tree: RTree<IndexedPoint> = RTree::bulk_load(
        atoms1
            .iter()
            .enumerate()
            .map(|(idx, a)| IndexedPoint::new(a.pos(), idx))
            .collect(),
    );
    let max_radius_squared = cutoff * cutoff;

    // The tree query is inclusive; the strict cutoff is checked on the real distance.
    let mut atom_pairs: Vec<(usize, usize)> = atoms0
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            tree.locate_within_distance(a.pos(), max_radius_squared)
                .filter(|p| a.distance(atoms1[p.data]) < cutoff)
                .map(|p| (i, p.data))
                .collect::<Vec<_>>()
        })
        .collect();
    atom_pairs.sort_unstable();

    let mut seen = HashSet::new();
    atom_pairs
        .into_iter()
        .map(|(i, j)| (atoms0[i].residue_key(), atoms1[j].residue_key()))
        .filter(|pair| seen.insert(pair.clone()))
        .map(|(res0, res1)| ContactPair::positive(res0, res1))
        .collect()
}

/// Find positive contacts between every pair of distinct subunits.
///
/// Pairs `(i, j)` with `i < j` are searched in parallel and concatenated in pair order.
pub fn get_all_neighbors(
    bound_subunits: &[Subunit],
    cutoff: f64,
    cutoff_type: CutoffType,
) -> Result<Vec<ContactPair>> {
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(Error::InvalidCutoff(cutoff));
    }
    if bound_subunits.len() < 2 {
        return Err(Error::TooFewSubunits(bound_subunits.len()));
    }

    let pairs = subunit_pairs(bound_subunits.len());
    let neighbors: Vec<Vec<ContactPair>> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let curr =
                find_pair_neighbors(&bound_subunits[i], &bound_subunits[j], cutoff, cutoff_type);
            debug!("Found {} contacts between subunits {i} and {j}", curr.len());
            curr
        })
        .collect();

    Ok(neighbors.into_iter().flatten().collect())
}

/// All `(i, j)` index pairs with `i < j`.
pub(crate) fn subunit_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::structs::tests::atom;

    fn single_ca(structure: &str, chain: &str, pos: [f64; 3]) -> Subunit {
        Subunit::new(vec![atom(structure, chain, 1, "CA", "C", pos)])
    }

    #[test]
    fn single_ca_pair_within_cutoff() {
        let a = single_ca("s", "A", [0.0, 0.0, 0.0]);
        let b = single_ca("s", "B", [5.0, 0.0, 0.0]);

        let contacts = get_all_neighbors(&[a.clone(), b.clone()], 8.0, CutoffType::Ca).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].label, 1);
        assert_eq!(contacts[0].res0.chain, "A");
        assert_eq!(contacts[0].res1.chain, "B");

        let contacts = get_all_neighbors(&[a, b], 4.0, CutoffType::Ca).unwrap();
        assert!(contacts.is_empty());
    }

    #[test]
    fn cutoff_is_strict() {
        let a = single_ca("s", "A", [0.0, 0.0, 0.0]);
        let b = single_ca("s", "B", [5.0, 0.0, 0.0]);
        assert!(find_pair_neighbors(&a, &b, 5.0, CutoffType::Ca).is_empty());
        assert_eq!(find_pair_neighbors(&a, &b, 5.000001, CutoffType::Ca).len(), 1);
    }

    #[test]
    fn heavy_mode_collapses_duplicate_residue_pairs() {
        let a = Subunit::new(vec![
            atom("s", "A", 1, "CA", "C", [0.0, 0.0, 0.0]),
            atom("s", "A", 1, "CB", "C", [1.0, 0.0, 0.0]),
            atom("s", "A", 1, "HA", "H", [2.5, 0.0, 0.0]),
        ]);
        let b = Subunit::new(vec![
            atom("s", "B", 7, "CA", "C", [3.0, 0.0, 0.0]),
            atom("s", "B", 7, "CB", "C", [3.5, 0.0, 0.0]),
            atom("s", "B", 8, "CA", "C", [20.0, 0.0, 0.0]),
        ]);
        let contacts = find_pair_neighbors(&a, &b, 4.0, CutoffType::Heavy);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].res1.residue, 7);

        // Only the hydrogen would be within 0.6 Å of B:7 CA
        assert!(find_pair_neighbors(&a, &b, 0.6, CutoffType::Heavy).is_empty());
    }

    #[test]
    fn empty_filtered_side_yields_no_contacts() {
        let a = Subunit::new(vec![atom("s", "A", 1, "CB", "C", [0.0; 3])]);
        let b = single_ca("s", "B", [1.0, 0.0, 0.0]);
        assert!(find_pair_neighbors(&a, &b, 8.0, CutoffType::Ca).is_empty());
    }

    #[test]
    fn contacts_grow_with_cutoff() {
        let a = Subunit::new(
            (0..10)
                .map(|i| atom("s", "A", i, "CA", "C", [i as f64 * 3.8, 0.0, 0.0]))
                .collect(),
        );
        let b = Subunit::new(
            (0..10)
                .map(|i| atom("s", "B", i, "CA", "C", [i as f64 * 3.8, 6.0, 1.5 * i as f64]))
                .collect(),
        );
        let mut previous: HashSet<ContactPair> = HashSet::new();
        for cutoff in [4.0, 6.5, 8.0, 10.0, 14.0] {
            let current: HashSet<ContactPair> = get_all_neighbors(
                &[a.clone(), b.clone()],
                cutoff,
                CutoffType::Ca,
            )
            .unwrap()
            .into_iter()
            .collect();
            assert!(previous.is_subset(&current), "cutoff {cutoff}");
            previous = current;
        }
        assert!(!previous.is_empty());
    }

    #[test]
    fn all_pairs_are_searched() {
        let subs = vec![
            single_ca("s", "A", [0.0, 0.0, 0.0]),
            single_ca("s", "B", [3.0, 0.0, 0.0]),
            single_ca("s", "C", [6.0, 0.0, 0.0]),
        ];
        let contacts = get_all_neighbors(&subs, 4.0, CutoffType::Ca).unwrap();
        let chains: Vec<(&str, &str)> = contacts
            .iter()
            .map(|c| (c.res0.chain.as_str(), c.res1.chain.as_str()))
            .collect();
        assert_eq!(chains, vec![("A", "B"), ("B", "C")]);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let a = single_ca("s", "A", [0.0; 3]);
        assert!(matches!(
            get_all_neighbors(&[a.clone()], 8.0, CutoffType::Ca),
            Err(Error::TooFewSubunits(1))
        ));
        assert!(matches!(
            get_all_neighbors(&[a.clone(), a], -1.0, CutoffType::Ca),
            Err(Error::InvalidCutoff(_))
        ));
    }
}
