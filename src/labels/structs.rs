use core::fmt;
use std::collections::HashSet;

/// How the distance between two residues is measured.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutoffType {
    /// Alpha-carbon to alpha-carbon distance
    #[default]
    Ca,
    /// Minimum distance over all non-hydrogen atoms
    Heavy,
}

impl CutoffType {
    /// Whether an atom takes part in distance calculations under this cutoff type.
    pub fn accepts(&self, atom: &AtomRecord) -> bool {
        match self {
            CutoffType::Ca => atom.atom_name == "CA",
            CutoffType::Heavy => atom.element != "H",
        }
    }
}

impl fmt::Display for CutoffType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CutoffType::Ca => write!(f, "ca"),
            CutoffType::Heavy => write!(f, "heavy"),
        }
    }
}

/// Unique identity of a residue across all atom rows
#[derive(Debug, Hash, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct ResidueKey {
    /// Structure name, usually the file name
    pub structure: String,
    /// Model serial number
    pub model: usize,
    /// Chain identifier
    pub chain: String,
    /// Residue sequence number
    pub residue: isize,
    /// Insertion code, empty if absent
    pub insertion: String,
}

impl ResidueKey {
    pub fn new(structure: &str, model: usize, chain: &str, residue: isize, insertion: &str) -> Self {
        Self {
            structure: structure.to_string(),
            model,
            chain: chain.to_string(),
            residue,
            insertion: insertion.to_string(),
        }
    }

    /// Residue number followed by the insertion code, e.g. `52A`.
    pub fn residue_label(&self) -> String {
        format!("{}{}", self.residue, self.insertion)
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{structure} model {model}, Chain {chain}, Residue {resi}",
            structure = self.structure,
            model = self.model,
            chain = self.chain,
            resi = self.residue_label()
        )
    }
}

/// One atom row of a parsed structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub structure: String,
    pub model: usize,
    pub chain: String,
    pub residue: isize,
    pub insertion: String,
    pub atom_name: String,
    /// Upper-case element symbol
    pub element: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AtomRecord {
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey::new(
            &self.structure,
            self.model,
            &self.chain,
            self.residue,
            &self.insertion,
        )
    }

    pub fn pos(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean distance between two atoms
    pub fn distance(&self, other: &AtomRecord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Atoms making up one side of an interface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subunit {
    pub atoms: Vec<AtomRecord>,
}

impl Subunit {
    pub fn new(atoms: Vec<AtomRecord>) -> Self {
        Self { atoms }
    }

    /// Unique residue keys in order of first appearance.
    pub fn residues(&self) -> Vec<ResidueKey> {
        let mut seen = HashSet::new();
        self.atoms
            .iter()
            .map(|a| a.residue_key())
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    /// Unique structure names in order of first appearance.
    pub fn structures(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.atoms
            .iter()
            .filter(|a| seen.insert(a.structure.as_str()))
            .map(|a| a.structure.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// A residue pair across two subunits, labelled 1 for contact and 0 otherwise.
/// `res0` always belongs to the lower-indexed subunit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactPair {
    pub res0: ResidueKey,
    pub res1: ResidueKey,
    pub label: u8,
}

impl ContactPair {
    pub fn positive(res0: ResidueKey, res1: ResidueKey) -> Self {
        Self {
            res0,
            res1,
            label: 1,
        }
    }

    pub fn negative(res0: ResidueKey, res1: ResidueKey) -> Self {
        Self {
            res0,
            res1,
            label: 0,
        }
    }
}

impl fmt::Display for ContactPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{res0}] - [{res1}] label {label}",
            res0 = self.res0,
            res1 = self.res1,
            label = self.label
        )
    }
}
