//! Splits driven by precomputed sequence-identity clusters.

use super::structs::{BudgetTracker, ChainSequenceEntry, SplitBudget, SplitResult, SplitSettings};
use crate::errors::{Error, Result};
use crate::utils::pdb_code;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use tracing::{debug, info};

/// Identity cutoffs for which sequence clusterings are published.
pub const CLUSTER_CUTOFFS: [f64; 7] = [0.3, 0.4, 0.5, 0.7, 0.9, 0.95, 1.0];

/// Source of precomputed family assignments.
pub trait ClusterLookup {
    /// Family id of each code known at `cutoff`. Unknown codes are left out.
    fn families(&self, cutoff: f64, codes: &[String]) -> Result<HashMap<String, usize>>;

    /// Codes belonging to `family` at `cutoff`.
    fn members(&self, cutoff: f64, family: usize) -> Result<Vec<String>>;
}

/// Code to family mapping for one cutoff
#[derive(Debug, Clone, Default)]
struct ClusterTable {
    code2family: HashMap<String, usize>,
    families: Vec<Vec<String>>,
}

impl ClusterTable {
    /// Clusters sharing a code are merged so every code has exactly one family.
    fn from_clusters(clusters: Vec<Vec<String>>) -> Self {
        let mut parent: Vec<usize> = (0..clusters.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        for (i, cluster) in clusters.iter().enumerate() {
            for code in cluster {
                let j = *first_seen.entry(code.as_str()).or_insert(i);
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }

        let mut table = ClusterTable::default();
        let mut root2family: HashMap<usize, usize> = HashMap::new();
        for (i, cluster) in clusters.iter().enumerate() {
            let root = find(&mut parent, i);
            let next = root2family.len();
            let family = *root2family.entry(root).or_insert(next);
            if family == table.families.len() {
                table.families.push(Vec::new());
            }
            for code in cluster {
                if !table.code2family.contains_key(code) {
                    table.code2family.insert(code.clone(), family);
                    table.families[family].push(code.clone());
                }
            }
        }
        table
    }
}

/// In-memory [`ClusterLookup`] keyed by identity cutoff.
#[derive(Debug, Clone, Default)]
pub struct ClusterAssignment {
    tables: HashMap<u32, ClusterTable>,
}

fn cutoff_key(cutoff: f64) -> Result<u32> {
    CLUSTER_CUTOFFS
        .iter()
        .find(|&&c| (c - cutoff).abs() < 1e-9)
        .map(|c| (c * 100.0).round() as u32)
        .ok_or(Error::InvalidCutoff(cutoff))
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the clusters for `cutoff`; each cluster is a list of structure codes.
    pub fn insert(&mut self, cutoff: f64, clusters: Vec<Vec<String>>) -> Result<()> {
        let key = cutoff_key(cutoff)?;
        let clusters = clusters
            .into_iter()
            .map(|c| c.iter().map(|code| code.to_lowercase()).collect())
            .collect();
        self.tables.insert(key, ClusterTable::from_clusters(clusters));
        Ok(())
    }

    /// Read a sequence-cluster file: one cluster per line, whitespace-separated entity ids such
    /// as `1ABC_1`. The first four characters of each id are the structure code.
    pub fn read_clusters<R: BufRead>(&mut self, cutoff: f64, reader: R) -> Result<()> {
        let mut clusters = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| Error::ClusterLookup(e.to_string()))?;
            let cluster: Vec<String> = line
                .split_whitespace()
                .map(|entity| entity.chars().take(4).collect())
                .collect();
            if !cluster.is_empty() {
                clusters.push(cluster);
            }
        }
        debug!("Read {} clusters at cutoff {cutoff}", clusters.len());
        self.insert(cutoff, clusters)
    }

    fn table(&self, cutoff: f64) -> Result<&ClusterTable> {
        let key = cutoff_key(cutoff)?;
        self.tables
            .get(&key)
            .ok_or_else(|| Error::ClusterLookup(format!("no clustering loaded for cutoff {cutoff}")))
    }
}

impl ClusterLookup for ClusterAssignment {
    fn families(&self, cutoff: f64, codes: &[String]) -> Result<HashMap<String, usize>> {
        let table = self.table(cutoff)?;
        Ok(codes
            .iter()
            .filter_map(|c| table.code2family.get(c).map(|&f| (c.clone(), f)))
            .collect())
    }

    fn members(&self, cutoff: f64, family: usize) -> Result<Vec<String>> {
        let table = self.table(cutoff)?;
        table
            .families
            .get(family)
            .cloned()
            .ok_or_else(|| Error::ClusterLookup(format!("unknown family {family}")))
    }
}

/// An entry index paired with its family id
type Member = (usize, usize);

/// Split a dataset using precomputed sequence-identity clusters.
///
/// Entries whose structure code is not in the clustering are dropped. The remaining entries are
/// shuffled with `rng`, then whole families are moved into the validation and test sets in turn,
/// skipping any family larger than `split_size / min_fam_in_split`. Splits may overshoot their
/// target size by the last admitted family.
///
/// # Example
///
/// ```no_run
/// use ppidata::{cluster_split, rng_from_seed, ChainSequenceEntry, ClusterAssignment, SplitSettings};
///
/// let mut clusters = ClusterAssignment::new();
/// let file = std::io::BufReader::new(std::fs::File::open("bc-30.out").unwrap());
/// clusters.read_clusters(0.3, file).unwrap();
///
/// let entries = vec![ChainSequenceEntry::single("1abc.pdb", "MKV")];
/// let mut rng = rng_from_seed(Some(42));
/// let split = cluster_split(&entries, 0.3, &clusters, &SplitSettings::default(), &mut rng).unwrap();
/// println!("{} train / {} val / {} test", split.train.len(), split.val.len(), split.test.len());
/// ```
pub fn cluster_split<R: Rng + ?Sized>(
    entries: &[ChainSequenceEntry],
    cutoff: f64,
    clusters: &dyn ClusterLookup,
    settings: &SplitSettings,
    rng: &mut R,
) -> Result<SplitResult> {
    settings.validate()?;

    let codes: Vec<String> = entries.iter().map(|e| pdb_code(&e.id)).collect();
    let unique_codes: Vec<String> = {
        let mut seen = HashSet::new();
        codes.iter().filter(|c| seen.insert(*c)).cloned().collect()
    };
    let code2family = clusters.families(cutoff, &unique_codes)?;

    // If code not present in clustering, we don't use it
    let mut pool: Vec<Member> = codes
        .iter()
        .enumerate()
        .filter_map(|(i, c)| code2family.get(c).map(|&f| (i, f)))
        .collect();
    let n = pool.len();
    info!(
        "Removing {} / {} entries due to not finding in clustering",
        entries.len() - n,
        entries.len()
    );

    pool.shuffle(rng);
    let (val_size, test_size) = settings.target_sizes(n);

    let ctx = ClusterContext {
        codes: &codes,
        clusters,
        cutoff,
        min_fam_in_split: settings.min_fam_in_split,
        budget: settings.budget,
    };
    info!("Generating validation set...");
    let (val, pool) = ctx.create_cluster_split(&pool, val_size, "val")?;
    info!("Generating test set...");
    let (test, train) = ctx.create_cluster_split(&pool, test_size, "test")?;

    let ids = |members: &[Member]| -> Vec<String> {
        members.iter().map(|&(i, _)| entries[i].id.clone()).collect()
    };
    let result = SplitResult {
        train: ids(&train),
        val: ids(&val),
        test: ids(&test),
        excluded: vec![],
    };
    info!("train size {}", result.train.len());
    info!("val size {}", result.val.len());
    info!("test size {}", result.test.len());
    Ok(result)
}

struct ClusterContext<'a> {
    /// Structure code of every entry
    codes: &'a [String],
    clusters: &'a dyn ClusterLookup,
    cutoff: f64,
    min_fam_in_split: usize,
    budget: SplitBudget,
}

impl ClusterContext<'_> {
    /// Pick whole families from `pool` until `split_size` is reached.
    ///
    /// Family members are resolved through [`ClusterLookup::members`]. Returns
    /// `(selected, remaining)`, both in pool order.
    fn create_cluster_split(
        &self,
        pool: &[Member],
        split_size: usize,
        split: &'static str,
    ) -> Result<(Vec<Member>, Vec<Member>)> {
        let mut code_counts: HashMap<&str, usize> = HashMap::new();
        for &(i, _) in pool {
            *code_counts.entry(self.codes[i].as_str()).or_default() += 1;
        }

        // Ensure that at least min_fam_in_split families end up in each split
        let max_fam_size = split_size as f64 / self.min_fam_in_split as f64;
        let mut tracker = BudgetTracker::new(self.budget, split);
        let mut admitted: HashSet<usize> = HashSet::new();
        let mut rejected: HashSet<usize> = HashSet::new();
        let mut size = 0;
        for &(_, family) in pool {
            if size >= split_size {
                break;
            }
            if admitted.contains(&family) || rejected.contains(&family) {
                continue;
            }
            tracker.tick()?;

            // Entries of the pool that belong to this family
            let members: HashSet<String> = self
                .clusters
                .members(self.cutoff, family)?
                .into_iter()
                .collect();
            let fam_size: usize = members
                .iter()
                .filter_map(|code| code_counts.get(code.as_str()))
                .sum();
            if fam_size as f64 > max_fam_size {
                rejected.insert(family);
                continue;
            }
            admitted.insert(family);
            size += fam_size;
        }

        if size < split_size {
            return Err(Error::SplitUnsatisfiable {
                split,
                target: split_size,
                reached: size,
            });
        }
        debug!("Admitted {} families into the {split} split", admitted.len());

        Ok(pool.iter().copied().partition(|(_, f)| admitted.contains(f)))
    }
}

/// [`cluster_split`] with a random source seeded from `settings.random_seed`.
pub fn cluster_split_seeded(
    entries: &[ChainSequenceEntry],
    cutoff: f64,
    clusters: &dyn ClusterLookup,
    settings: &SplitSettings,
) -> Result<SplitResult> {
    let mut rng = super::rng_from_seed(settings.random_seed);
    cluster_split(entries, cutoff, clusters, settings, &mut rng)
}
