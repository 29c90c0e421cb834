use clap::Parser;
use ppidata::structure::structure_name;
use ppidata::{
    cluster_split, get_chain_sequences, identity_split, load_model, rng_from_seed,
    run_with_threads, write_split, ChainSequenceEntry, ClusterAssignment, Error, SplitBudget,
    SplitSettings,
};
use rayon::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, trace};

/// How sequence families are determined
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitMethod {
    /// Precomputed sequence clusters (requires --clusters)
    Cluster,
    /// Sequence identity computed on demand
    Identity,
}

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Paths to the PDB or mmCIF files making up the dataset
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory for train.txt, val.txt and test.txt
    #[arg(short, long)]
    output: PathBuf,

    /// Family assignment method
    #[arg(short, long, value_enum, default_value_t = SplitMethod::Cluster)]
    method: SplitMethod,

    /// Sequence cluster file with one cluster of entity ids per line
    #[arg(long)]
    clusters: Option<PathBuf>,

    /// Sequence identity cutoff defining a family
    #[arg(short, long, default_value_t = 0.3)]
    cutoff: f64,

    /// Fraction of the data used for validation
    #[arg(long = "val-split", default_value_t = 0.1)]
    val_split: f64,

    /// Fraction of the data used for testing
    #[arg(long = "test-split", default_value_t = 0.1)]
    test_split: f64,

    /// Minimum number of families in the validation and test sets
    #[arg(long = "min-fam-in-split", default_value_t = 5)]
    min_fam_in_split: usize,

    /// Random seed for reproducible splits
    #[arg(short, long)]
    seed: Option<u64>,

    /// Give up after this many family draws per split
    #[arg(long = "max-iterations")]
    max_iterations: Option<usize>,

    /// Give up after this many seconds per split
    #[arg(long = "max-seconds")]
    max_seconds: Option<f64>,

    /// Number of threads to use for parallel processing (0 for all cores)
    #[arg(short = 'j', long = "num-threads", default_value_t = 1)]
    num_threads: usize,
}

impl Args {
    fn settings(&self) -> SplitSettings {
        SplitSettings {
            val_split: self.val_split,
            test_split: self.test_split,
            min_fam_in_split: self.min_fam_in_split,
            random_seed: self.seed,
            budget: SplitBudget {
                max_iterations: self.max_iterations,
                max_duration: self
                    .max_seconds
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .map(Duration::from_secs_f64),
            },
        }
    }
}

/// Entry ids are file names; sequences are only read when they are needed.
fn load_entries(paths: &[PathBuf], with_sequences: bool) -> ppidata::Result<Vec<ChainSequenceEntry>> {
    if !with_sequences {
        return Ok(paths
            .iter()
            .map(|p| ChainSequenceEntry {
                id: structure_name(p),
                chains: vec![],
            })
            .collect());
    }
    paths
        .par_iter()
        .map(|p| {
            let input_file = p
                .to_str()
                .ok_or_else(|| Error::Parse(format!("non UTF-8 path {}", p.display())))?;
            let pdb = load_model(input_file)?;
            Ok(get_chain_sequences(&pdb, &structure_name(p)))
        })
        .collect()
}

fn read_cluster_file(path: &Path, cutoff: f64) -> ppidata::Result<ClusterAssignment> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::ClusterLookup(format!("{}: {e}", path.display())))?;
    let mut clusters = ClusterAssignment::new();
    clusters.read_clusters(cutoff, BufReader::new(file))?;
    Ok(clusters)
}

pub(crate) fn run(args: &Args) -> ppidata::Result<()> {
    trace!("{args:?}");
    let settings = args.settings();
    let mut rng = rng_from_seed(settings.random_seed);

    let split = run_with_threads(args.num_threads, || -> ppidata::Result<_> {
        debug!("Using {} thread(s)", rayon::current_num_threads());
        match args.method {
            SplitMethod::Cluster => {
                let cluster_file = args.clusters.as_deref().ok_or_else(|| {
                    Error::InvalidSplit("--clusters is required for cluster splits".to_string())
                })?;
                let clusters = read_cluster_file(cluster_file, args.cutoff)?;
                let entries = load_entries(&args.input, false)?;
                cluster_split(&entries, args.cutoff, &clusters, &settings, &mut rng)
            }
            SplitMethod::Identity => {
                let entries = load_entries(&args.input, true)?;
                identity_split(&entries, args.cutoff, &settings, None, &mut rng)
            }
        }
    })??;

    write_split(&args.output, &split)?;
    info!(
        "Wrote {} train, {} val and {} test ids to {}",
        split.train.len(),
        split.val.len(),
        split.test.len(),
        args.output.display()
    );
    Ok(())
}
