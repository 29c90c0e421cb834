use pdbtbx::*;

pub trait ResidueExt {
    /// The residue one-letter code, or `None` if it's not a standard amino acid.
    fn one_letter(&self) -> Option<&str>;
}

impl ResidueExt for Residue {
    fn one_letter(&self) -> Option<&str> {
        let aa_code = match self.name().unwrap_or("").to_uppercase().as_str() {
            "ALA" => "A",
            "ARG" => "R",
            "ASN" => "N",
            "ASP" => "D",
            "CYS" => "C",
            "GLN" => "Q",
            "GLU" => "E",
            "GLY" => "G",
            "HIS" => "H",
            "ILE" => "I",
            "LEU" => "L",
            "LYS" => "K",
            "MET" => "M",
            "MSE" => "M", // selenomethionine
            "PHE" => "F",
            "PRO" => "P",
            "SER" => "S",
            "THR" => "T",
            "TRP" => "W",
            "TYR" => "Y",
            "VAL" => "V",
            _ => "X",
        };

        match aa_code {
            "X" => None,
            _ => Some(aa_code),
        }
    }
}
