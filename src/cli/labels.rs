use clap::Parser;
use ppidata::{
    get_labels, labels_to_df, load_atoms, run_with_threads, write_df_to_file, CutoffType,
    DataFrameFileType, LabelSettings,
};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Paths to the PDB or mmCIF files of the input (unbound) structures.
    /// A single file holding the whole complex is split into one subunit per chain
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output file; the extension is set from the output format
    #[arg(short, long)]
    output: PathBuf,

    /// Bound structure for each input, in the same order
    #[arg(short, long = "bound")]
    bound: Vec<PathBuf>,

    /// Distance cutoff (Å) below which two residues are interacting
    #[arg(short, long, default_value_t = 8.0)]
    cutoff: f64,

    /// Atoms used to compute residue distances
    #[arg(long = "cutoff-type", value_enum, default_value_t = CutoffType::Ca)]
    cutoff_type: CutoffType,

    /// Also write every non-interacting residue pair with label 0
    #[arg(long, default_value_t = false)]
    negatives: bool,

    /// Refuse to write more negative rows than this
    #[arg(long = "max-negatives", default_value_t = LabelSettings::default().max_negatives)]
    max_negatives: usize,

    /// Refuse to build a residue contact matrix with more cells than this for one subunit pair
    #[arg(long = "max-matrix-cells", default_value_t = LabelSettings::default().max_matrix_cells)]
    max_matrix_cells: usize,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Number of threads to use for parallel processing (0 for all cores)
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

pub(crate) fn run(args: &Args) -> ppidata::Result<()> {
    trace!("{args:?}");

    let settings = LabelSettings {
        cutoff: args.cutoff,
        cutoff_type: args.cutoff_type,
        negatives: args.negatives,
        max_negatives: args.max_negatives,
        max_matrix_cells: args.max_matrix_cells,
    };

    let mut df_labels = run_with_threads(args.num_threads, || -> ppidata::Result<_> {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        let inputs = args
            .input
            .par_iter()
            .map(load_atoms)
            .collect::<ppidata::Result<Vec<_>>>()?;
        let bounds = args
            .bound
            .par_iter()
            .map(load_atoms)
            .collect::<ppidata::Result<Vec<_>>>()?;

        let labels = get_labels(&inputs, &bounds, &settings)?;
        labels_to_df(&labels)
    })??;

    // Prepare output directory
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let output_file = args.output.with_extension(args.output_format.to_string());
    write_df_to_file(&mut df_labels, &output_file, args.output_format)?;
    info!(
        "Saved {} labelled residue pairs to {}",
        df_labels.height(),
        output_file.display()
    );
    Ok(())
}
