//! Reading structure files into atom tables.
//!
//! This is the boundary between [`pdbtbx`] and the fixed-field [`AtomRecord`] rows the rest of
//! the crate works on.

use crate::errors::{Error, Result};
use crate::labels::AtomRecord;
use crate::residues::ResidueExt;
use pdbtbx::*;
use std::path::Path;
use tracing::{error, warn};

/// Open a PDB or mmCIF file with [`pdbtbx`] and remove non-protein residues.
///
/// Non-fatal parser messages are logged; fatal ones become [`Error::Parse`].
pub fn load_model(input_file: &str) -> Result<PDB> {
    let (mut pdb, pdb_warnings) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(input_file)
        .map_err(|errors| {
            Error::Parse(format!(
                "{input_file}: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            ))
        })?;

    for e in &pdb_warnings {
        match e.level() {
            pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
            pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
            _ => warn!("{e}"),
        }
    }

    // Remove waters, ligands and other non-protein residues
    pdb.remove_residues_by(|res| res.one_letter().is_none());

    Ok(pdb)
}

/// Flatten a structure into atom rows named `structure`.
pub fn pdb_to_atoms(pdb: &PDB, structure: &str) -> Vec<AtomRecord> {
    pdb.atoms_with_hierarchy()
        .map(|x| {
            let (residue, insertion) = x.residue().id();
            let (px, py, pz) = x.atom().pos();
            AtomRecord {
                structure: structure.to_string(),
                model: x.model().serial_number(),
                chain: x.chain().id().to_string(),
                residue,
                insertion: insertion.unwrap_or("").to_string(),
                atom_name: x.atom().name().to_string(),
                element: x
                    .atom()
                    .element()
                    .map(|e| e.symbol().to_uppercase())
                    .unwrap_or_default(),
                x: px,
                y: py,
                z: pz,
            }
        })
        .collect()
}

/// Name used for a structure read from `path`: its file name.
pub fn structure_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Load a structure file as an atom table named after the file.
pub fn load_atoms<P: AsRef<Path>>(path: P) -> Result<Vec<AtomRecord>> {
    let path = path.as_ref();
    let input_file = path
        .to_str()
        .ok_or_else(|| Error::Parse(format!("non UTF-8 path {}", path.display())))?;
    let pdb = load_model(input_file)?;
    Ok(pdb_to_atoms(&pdb, &structure_name(path)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fixture(name: &str) -> String {
        let root = env!("CARGO_MANIFEST_DIR");
        format!("{}/test-data/{}", root, name)
    }

    #[test]
    fn test_load_atoms() {
        let atoms = load_atoms(fixture("dimer.pdb")).unwrap();

        // The water is removed
        assert!(atoms.iter().all(|a| a.residue != 201));
        assert_eq!(atoms.len(), 17);
        assert!(atoms.iter().all(|a| a.structure == "dimer.pdb"));

        let ca: Vec<&AtomRecord> = atoms.iter().filter(|a| a.atom_name == "CA").collect();
        assert_eq!(ca.len(), 4);
        assert_eq!(ca[0].chain, "A");
        assert!((ca[0].x - 1.0).abs() < 1e-6);
        assert!(atoms.iter().any(|a| a.element == "H"));
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        assert!(matches!(
            load_atoms(fixture("does-not-exist.pdb")),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn structure_name_is_file_name() {
        assert_eq!(structure_name(Path::new("/data/1abc_l_u.pdb")), "1abc_l_u.pdb");
    }
}
