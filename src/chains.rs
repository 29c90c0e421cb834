use crate::residues::ResidueExt;
use crate::splits::{ChainSequence, ChainSequenceEntry};
use pdbtbx::*;

pub trait ChainExt {
    fn pdb_seq(&self) -> Vec<&str>;
}

impl ChainExt for Chain {
    fn pdb_seq(&self) -> Vec<&str> {
        // Load the amino acid sequence for each chain
        self.residues().filter_map(|res| res.one_letter()).collect()
    }
}

/// Sequences of all protein chains of the first model, keyed by structure `id`.
pub fn get_chain_sequences(pdb: &PDB, id: &str) -> ChainSequenceEntry {
    let chains = pdb
        .models()
        .next()
        .map(|model| {
            model
                .chains()
                .map(|chain| ChainSequence {
                    chain: chain.id().to_string(),
                    sequence: chain.pdb_seq().join(""),
                })
                .filter(|c| !c.sequence.is_empty())
                .collect()
        })
        .unwrap_or_default();

    ChainSequenceEntry {
        id: id.to_string(),
        chains,
    }
}
