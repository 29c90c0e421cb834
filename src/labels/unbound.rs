use super::structs::{ContactPair, ResidueKey, Subunit};
use std::collections::HashSet;
use tracing::info;

/// Counts reported by [`filter_unbound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnboundReport {
    pub dropped: usize,
    pub total: usize,
}

/// Drop contacts whose residues are missing from the unbound structures.
///
/// Residues resolved only in the bound structure cannot be labelled in the model input, so any
/// pair touching one is removed. Never fails; the result may be empty.
pub fn filter_unbound(
    neighbors: Vec<ContactPair>,
    unbound_subunits: &[Subunit],
) -> (Vec<ContactPair>, UnboundReport) {
    let universe: HashSet<ResidueKey> = unbound_subunits
        .iter()
        .flat_map(|s| s.atoms.iter().map(|a| a.residue_key()))
        .collect();

    let total = neighbors.len();
    let kept: Vec<ContactPair> = neighbors
        .into_iter()
        .filter(|n| universe.contains(&n.res0) && universe.contains(&n.res1))
        .collect();
    let report = UnboundReport {
        dropped: total - kept.len(),
        total,
    };
    info!(
        "Removing {} / {} due to no matching residue in unbound",
        report.dropped, report.total
    );

    (kept, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::structs::tests::atom;

    #[test]
    fn drops_pairs_missing_from_unbound() {
        let unbound = vec![
            Subunit::new(vec![atom("a", "A", 1, "CA", "C", [0.0; 3])]),
            Subunit::new(vec![atom("b", "A", 1, "CA", "C", [0.0; 3])]),
        ];
        let key = |s: &str, r: isize| ResidueKey::new(s, 1, "A", r, "");
        let neighbors = vec![
            ContactPair::positive(key("a", 1), key("b", 1)),
            ContactPair::positive(key("a", 2), key("b", 1)),
            ContactPair::positive(key("a", 1), key("b", 3)),
        ];

        let (kept, report) = filter_unbound(neighbors, &unbound);
        assert_eq!(kept, vec![ContactPair::positive(key("a", 1), key("b", 1))]);
        assert_eq!(report, UnboundReport { dropped: 2, total: 3 });
    }

    #[test]
    fn output_may_be_empty() {
        let unbound = vec![Subunit::new(vec![atom("a", "A", 1, "CA", "C", [0.0; 3])])];
        let neighbors = vec![ContactPair::positive(
            ResidueKey::new("x", 1, "A", 1, ""),
            ResidueKey::new("a", 1, "A", 1, ""),
        )];
        let (kept, report) = filter_unbound(neighbors, &unbound);
        assert!(kept.is_empty());
        assert_eq!(report.dropped, 1);
    }
}
