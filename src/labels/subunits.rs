use super::structs::{AtomRecord, Subunit};
use crate::errors::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Split atom tables into the subunits that define interfaces.
///
/// Returns `(unbound_subunits, bound_subunits)`.
///
/// With bound tables, each one is paired with the input at the same position and renamed to the
/// input's structure name; model, chain and residue numbering are assumed to match exactly.
/// Without bound tables, every (structure, model, chain) group of the inputs is its own subunit and
/// serves as both the bound and the unbound side.
pub fn get_subunits(
    inputs: &[Vec<AtomRecord>],
    bounds: &[Vec<AtomRecord>],
) -> Result<(Vec<Subunit>, Vec<Subunit>)> {
    if bounds.is_empty() {
        let subunits = group_by_chain(inputs);
        debug!("Grouped inputs into {} chain subunits", subunits.len());
        return Ok((subunits.clone(), subunits));
    }

    if bounds.len() != inputs.len() {
        return Err(Error::BoundCountMismatch {
            inputs: inputs.len(),
            bounds: bounds.len(),
        });
    }

    let mut bound_subunits = Vec::with_capacity(bounds.len());
    for (bound, input) in bounds.iter().zip(inputs) {
        let b_name = single_structure(bound)?;
        let i_name = single_structure(input)?;
        debug!("Using bound structure {b_name} for {i_name}");

        let renamed = bound
            .iter()
            .map(|a| AtomRecord {
                structure: i_name.clone(),
                ..a.clone()
            })
            .collect();
        bound_subunits.push(Subunit::new(renamed));
    }

    let unbound_subunits = inputs.iter().cloned().map(Subunit::new).collect();
    Ok((unbound_subunits, bound_subunits))
}

fn single_structure(table: &[AtomRecord]) -> Result<String> {
    let mut names: Vec<String> = Vec::new();
    for a in table {
        if !names.contains(&a.structure) {
            names.push(a.structure.clone());
        }
    }
    match names.len() {
        1 => Ok(names.remove(0)),
        _ => Err(Error::AmbiguousStructure(names)),
    }
}

/// Group all atoms by (structure, model, chain), ordered by those keys.
fn group_by_chain(inputs: &[Vec<AtomRecord>]) -> Vec<Subunit> {
    let mut groups: HashMap<(String, usize, String), Vec<AtomRecord>> = HashMap::new();
    for a in inputs.iter().flatten() {
        groups
            .entry((a.structure.clone(), a.model, a.chain.clone()))
            .or_default()
            .push(a.clone());
    }

    let mut keys: Vec<_> = groups.keys().cloned().collect();
    keys.sort();
    keys.into_iter()
        .filter_map(|k| groups.remove(&k))
        .map(Subunit::new)
        .collect()
}
