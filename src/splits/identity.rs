//! Splits driven by on-demand sequence similarity search.

use super::align::sequence_identity;
use super::structs::{BudgetTracker, ChainSequenceEntry, SplitBudget, SplitResult, SplitSettings};
use crate::errors::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// k-mer length used to seed candidates in [`SequenceIndex`]
const KMER: usize = 3;
/// Width of the diagonal bands seed hits are binned into
const BAND: isize = 16;

/// Service answering "which entries are at least `cutoff` identical to this sequence".
pub trait SimilaritySearch: Sync {
    /// Ids of matching entries, best match first, at most `max_hits` of them.
    fn find_similar(&self, query: &str, cutoff: f64, max_hits: usize) -> Result<Vec<String>>;
}

/// Shared flag that aborts in-flight similarity queries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Seed hits a candidate needs on one diagonal band before it is aligned.
///
/// A pair at identity `cutoff` shares a 3-mer at roughly `cutoff^3` of its positions, all on the
/// same diagonal; half of that is required.
fn min_seed_hits(cutoff: f64, len: usize) -> usize {
    let windows = len.saturating_sub(KMER - 1) as f64;
    ((0.5 * cutoff.powi(3) * windows).floor() as usize).max(2)
}

/// In-memory [`SimilaritySearch`] over the chains of a dataset.
///
/// Candidates are seeded by shared 3-mers that pile up on one diagonal band, then locally aligned
/// with BLOSUM62 and affine gaps (see [`sequence_identity`]).
pub struct SequenceIndex {
    records: Vec<(String, Vec<u8>)>,
    /// k-mer to (record, position) occurrences
    kmers: HashMap<[u8; KMER], Vec<(usize, usize)>>,
    short: Vec<usize>,
    cancel: CancelToken,
}

impl SequenceIndex {
    pub fn from_entries(entries: &[ChainSequenceEntry]) -> Self {
        let records: Vec<(String, Vec<u8>)> = entries
            .iter()
            .flat_map(|e| {
                e.chains
                    .iter()
                    .map(|c| (e.id.clone(), c.sequence.to_uppercase().into_bytes()))
            })
            .collect();

        let mut kmers: HashMap<[u8; KMER], Vec<(usize, usize)>> = HashMap::new();
        let mut short = Vec::new();
        for (idx, (_, seq)) in records.iter().enumerate() {
            if seq.len() < KMER {
                short.push(idx);
                continue;
            }
            for (pos, w) in seq.windows(KMER).enumerate() {
                kmers.entry([w[0], w[1], w[2]]).or_default().push((idx, pos));
            }
        }
        debug!(
            "Indexed {} chain sequences with {} distinct {KMER}-mers",
            records.len(),
            kmers.len()
        );

        Self {
            records,
            kmers,
            short,
            cancel: CancelToken::new(),
        }
    }

    /// Use `token` to cancel queries from another thread.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Records worth aligning against `query` at `cutoff`, in index order.
    fn candidates(&self, query: &[u8], cutoff: f64) -> Vec<usize> {
        if query.len() < KMER {
            return (0..self.records.len()).collect();
        }

        let mut bands: HashMap<(usize, isize), usize> = HashMap::new();
        for (qpos, w) in query.windows(KMER).enumerate() {
            if let Some(occurrences) = self.kmers.get(&[w[0], w[1], w[2]]) {
                for &(idx, pos) in occurrences {
                    let diagonal = pos as isize - qpos as isize;
                    *bands.entry((idx, diagonal.div_euclid(BAND))).or_default() += 1;
                }
            }
        }

        let mut best: HashMap<usize, usize> = HashMap::new();
        for ((idx, _), n) in bands {
            let top = best.entry(idx).or_default();
            *top = (*top).max(n);
        }

        let mut hits: Vec<usize> = best
            .into_iter()
            .filter(|&(idx, n)| {
                let shorter = query.len().min(self.records[idx].1.len());
                n >= min_seed_hits(cutoff, shorter)
            })
            .map(|(idx, _)| idx)
            .chain(self.short.iter().copied())
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

impl SimilaritySearch for SequenceIndex {
    fn find_similar(&self, query: &str, cutoff: f64, max_hits: usize) -> Result<Vec<String>> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let query = query.to_uppercase().into_bytes();

        let candidates = self.candidates(&query, cutoff);
        debug!(
            "Aligning against {} of {} chains",
            candidates.len(),
            self.records.len()
        );
        let mut scored: Vec<(usize, f64)> = candidates
            .into_par_iter()
            .filter_map(|idx| {
                if self.cancel.is_cancelled() {
                    return None;
                }
                let identity = sequence_identity(&query, &self.records[idx].1);
                (identity >= cutoff).then_some((idx, identity))
            })
            .collect();
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut seen = HashSet::new();
        Ok(scored
            .into_iter()
            .map(|(idx, _)| &self.records[idx].0)
            .filter(|id| seen.insert(*id))
            .take(max_hits)
            .cloned()
            .collect())
    }
}

/// Entry indices after one split step
struct IdentityStep {
    selected: Vec<usize>,
    remaining: Vec<usize>,
    excluded: Vec<usize>,
}

/// Split a dataset by sequence identity computed on demand.
///
/// A random remaining entry seeds each family: every remaining entry at least `cutoff` identical
/// to one of its chains joins the family. At most `ceil(split_size / min_fam_in_split)` members of
/// a family are admitted; the rest are consumed and reported in [`SplitResult::excluded`].
///
/// When `search` is `None` a [`SequenceIndex`] over `entries` is built. That index cannot be
/// cancelled; to stop a long split from another thread, build the index with
/// [`SequenceIndex::with_cancel_token`] and pass it as `search`. The split then fails with
/// [`Error::Cancelled`].
pub fn identity_split<R: Rng + ?Sized>(
    entries: &[ChainSequenceEntry],
    cutoff: f64,
    settings: &SplitSettings,
    search: Option<&dyn SimilaritySearch>,
    rng: &mut R,
) -> Result<SplitResult> {
    settings.validate()?;
    if !(cutoff > 0.0 && cutoff <= 1.0) {
        return Err(Error::InvalidCutoff(cutoff));
    }

    let mut id2idx: HashMap<&str, usize> = HashMap::new();
    for (i, e) in entries.iter().enumerate() {
        if id2idx.insert(e.id.as_str(), i).is_some() {
            return Err(Error::DuplicateIdentifier(e.id.clone()));
        }
    }

    let index;
    let search: &dyn SimilaritySearch = match search {
        Some(s) => s,
        None => {
            index = SequenceIndex::from_entries(entries);
            &index
        }
    };

    let n = entries.len();
    let (val_size, test_size) = settings.target_sizes(n);
    let mut pool: Vec<usize> = (0..n).collect();
    pool.shuffle(rng);

    let ctx = IdentityContext {
        entries,
        id2idx: &id2idx,
        search,
        cutoff,
        min_fam_in_split: settings.min_fam_in_split,
        budget: settings.budget,
    };

    info!("Generating validation set...");
    let val = ctx.create_identity_split(&pool, val_size, "val", rng)?;
    info!("Generating test set...");
    let test = ctx.create_identity_split(&val.remaining, test_size, "test", rng)?;

    let ids = |members: &[usize]| -> Vec<String> {
        members.iter().map(|&i| entries[i].id.clone()).collect()
    };
    let mut excluded = ids(&val.excluded);
    excluded.extend(ids(&test.excluded));
    let result = SplitResult {
        train: ids(&test.remaining),
        val: ids(&val.selected),
        test: ids(&test.selected),
        excluded,
    };
    info!("train size {}", result.train.len());
    info!("val size {}", result.val.len());
    info!("test size {}", result.test.len());
    if !result.excluded.is_empty() {
        info!(
            "Excluded {} homologs of evaluation families",
            result.excluded.len()
        );
    }
    Ok(result)
}

/// [`identity_split`] with a random source seeded from `settings.random_seed`.
pub fn identity_split_seeded(
    entries: &[ChainSequenceEntry],
    cutoff: f64,
    settings: &SplitSettings,
    search: Option<&dyn SimilaritySearch>,
) -> Result<SplitResult> {
    let mut rng = super::rng_from_seed(settings.random_seed);
    identity_split(entries, cutoff, settings, search, &mut rng)
}

struct IdentityContext<'a> {
    entries: &'a [ChainSequenceEntry],
    id2idx: &'a HashMap<&'a str, usize>,
    search: &'a dyn SimilaritySearch,
    cutoff: f64,
    min_fam_in_split: usize,
    budget: SplitBudget,
}

impl IdentityContext<'_> {
    /// Entries in `pool` at least `cutoff` identical to `seed`, starting with `seed` itself.
    fn family(&self, seed: usize, in_pool: &HashSet<usize>) -> Result<Vec<usize>> {
        let mut found = vec![seed];
        let mut seen: HashSet<usize> = HashSet::from([seed]);
        for chain in &self.entries[seed].chains {
            let hits = self
                .search
                .find_similar(&chain.sequence, self.cutoff, self.entries.len())?;
            for id in hits {
                match self.id2idx.get(id.as_str()) {
                    Some(&i) => {
                        if in_pool.contains(&i) && seen.insert(i) {
                            found.push(i);
                        }
                    }
                    None => debug!("Ignoring unknown hit {id}"),
                }
            }
        }
        Ok(found)
    }

    fn create_identity_split<R: Rng + ?Sized>(
        &self,
        pool: &[usize],
        split_size: usize,
        split: &'static str,
        rng: &mut R,
    ) -> Result<IdentityStep> {
        // Ensure that at least min_fam_in_split families end up in each split
        let max_fam_size = (split_size as f64 / self.min_fam_in_split as f64).ceil() as usize;
        let mut tracker = BudgetTracker::new(self.budget, split);

        let mut to_use: Vec<usize> = pool.to_vec();
        let mut in_pool: HashSet<usize> = pool.iter().copied().collect();
        let mut selected: Vec<usize> = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        while selected.len() < split_size {
            if to_use.is_empty() {
                return Err(Error::SplitUnsatisfiable {
                    split,
                    target: split_size,
                    reached: selected.len(),
                });
            }
            tracker.tick()?;

            let seed = to_use[rng.gen_range(0..to_use.len())];
            let found = self.family(seed, &in_pool)?;
            debug!(
                "Family of {} has {} remaining members",
                self.entries[seed].id,
                found.len()
            );

            selected.extend(found.iter().take(max_fam_size));
            for i in found {
                in_pool.remove(&i);
                used.insert(i);
            }
            to_use.retain(|i| in_pool.contains(i));
        }

        let admitted: HashSet<usize> = selected.iter().copied().collect();
        let excluded = pool
            .iter()
            .copied()
            .filter(|i| used.contains(i) && !admitted.contains(i))
            .collect();
        Ok(IdentityStep {
            selected,
            remaining: to_use,
            excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splits::align::tests::random_sequence;
    use crate::splits::rng_from_seed;
    use crate::splits::SplitBudget;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    /// Entries whose first character names their family.
    struct PrefixSearch;

    impl SimilaritySearch for PrefixSearch {
        fn find_similar(&self, query: &str, _cutoff: f64, max_hits: usize) -> Result<Vec<String>> {
            // Sequences are "<family>:<member>"
            let family = query.split(':').next().unwrap_or("");
            Ok((0..10)
                .map(|m| format!("{family}{m}"))
                .take(max_hits)
                .collect())
        }
    }

    struct FailingSearch;

    impl SimilaritySearch for FailingSearch {
        fn find_similar(&self, _: &str, _: f64, _: usize) -> Result<Vec<String>> {
            Err(Error::SimilaritySearch("connection reset".to_string()))
        }
    }

    /// `n_families` families of `fam_size` entries with ids like `a0`, `a1`, `b0`
    fn entries(n_families: usize, fam_size: usize) -> Vec<ChainSequenceEntry> {
        (0..n_families)
            .flat_map(|f| {
                let family = (b'a' + f as u8) as char;
                (0..fam_size).map(move |m| {
                    ChainSequenceEntry::single(&format!("{family}{m}"), &format!("{family}:{m}"))
                })
            })
            .collect()
    }

    fn settings(val: f64, test: f64, min_fam: usize) -> SplitSettings {
        SplitSettings {
            val_split: val,
            test_split: test,
            min_fam_in_split: min_fam,
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut data = entries(2, 2);
        data.push(data[0].clone());
        let result = identity_split(
            &data,
            0.3,
            &settings(0.2, 0.2, 1),
            Some(&PrefixSearch),
            &mut rng_from_seed(Some(0)),
        );
        assert!(matches!(result, Err(Error::DuplicateIdentifier(id)) if id == "a0"));
    }

    #[test]
    fn families_stay_together() {
        let data = entries(10, 2);
        let split = identity_split(
            &data,
            0.3,
            &settings(0.2, 0.2, 2),
            Some(&PrefixSearch),
            &mut rng_from_seed(Some(5)),
        )
        .unwrap();

        assert_eq!(split.val.len(), 4);
        assert_eq!(split.test.len(), 4);
        assert_eq!(split.train.len(), 12);
        assert!(split.excluded.is_empty());

        let fam = |ids: &[String]| -> HashSet<char> {
            ids.iter().map(|id| id.chars().next().unwrap()).collect()
        };
        assert!(fam(&split.train).is_disjoint(&fam(&split.val)));
        assert!(fam(&split.train).is_disjoint(&fam(&split.test)));
        assert!(fam(&split.val).is_disjoint(&fam(&split.test)));
    }

    #[test]
    fn same_seed_same_split() {
        let data = entries(8, 3);
        let s = SplitSettings {
            random_seed: Some(99),
            ..settings(0.25, 0.25, 2)
        };
        let a = identity_split_seeded(&data, 0.3, &s, Some(&PrefixSearch)).unwrap();
        let b = identity_split_seeded(&data, 0.3, &s, Some(&PrefixSearch)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn family_contribution_is_capped() {
        // 3 families of 5; val target 3 with at most ceil(3 / 3) = 1 member per family
        let data = entries(3, 5);
        let split = identity_split(
            &data,
            0.3,
            &settings(0.2, 0.0, 3),
            Some(&PrefixSearch),
            &mut rng_from_seed(Some(2)),
        )
        .unwrap();
        assert_eq!(split.val.len(), 3);
        assert_eq!(split.excluded.len(), 12);
        assert!(split.train.is_empty());
    }

    #[test]
    fn exhausted_pool_is_an_error() {
        // One family of 10: first query consumes everything but admits only 2 of 4
        let data = entries(1, 10);
        let result = identity_split(
            &data,
            0.3,
            &settings(0.4, 0.0, 2),
            Some(&PrefixSearch),
            &mut rng_from_seed(Some(2)),
        );
        assert!(matches!(
            result,
            Err(Error::SplitUnsatisfiable {
                split: "val",
                target: 4,
                reached: 2
            })
        ));
    }

    #[test]
    fn search_failures_surface() {
        let data = entries(2, 2);
        let result = identity_split(
            &data,
            0.3,
            &settings(0.5, 0.0, 1),
            Some(&FailingSearch),
            &mut rng_from_seed(Some(2)),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, Error::SimilaritySearch(_)));
        assert!(err.is_transient());
    }

    fn real_entries() -> Vec<ChainSequenceEntry> {
        vec![
            ChainSequenceEntry::single("1aaa", "MQIFVKTLTGKTITLEVEPSDTIENVKAKIQDKEGIPPDQQRLIFAG"),
            ChainSequenceEntry::single("1aab", "MQIFVKTLTGKTITLEVEPSDTIENVKAKIQDKEGIPPDQQRLIWAG"),
            ChainSequenceEntry::single("2bbb", "GSHMLEDPVDAFQLHDLSGRVCLRNGTWLEAGSSKPLALW"),
            ChainSequenceEntry::single("2bbc", "GSHMLEDPVDAFQLHDLSGRVCLRNGTWLEAGSSKPLALY"),
            ChainSequenceEntry::single("3ccc", "PPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPPP"),
        ]
    }

    #[test]
    fn sequence_index_finds_homologs() {
        let data = real_entries();
        let index = SequenceIndex::from_entries(&data);
        let hits = index.find_similar(&data[0].chains[0].sequence, 0.9, 10).unwrap();
        assert_eq!(hits, vec!["1aaa", "1aab"]);

        let hits = index.find_similar(&data[0].chains[0].sequence, 0.9, 1).unwrap();
        assert_eq!(hits, vec!["1aaa"]);
    }

    #[test]
    fn cancelled_queries_fail() {
        let data = real_entries();
        let token = CancelToken::new();
        let index = SequenceIndex::from_entries(&data).with_cancel_token(token.clone());
        token.cancel();
        assert!(matches!(
            index.find_similar("MQIFVKTLTG", 0.5, 10),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn index_is_built_when_missing() {
        let data = real_entries();
        let split = identity_split(
            &data,
            0.9,
            &settings(0.2, 0.2, 1),
            None,
            &mut rng_from_seed(Some(4)),
        )
        .unwrap();

        let mut assigned: HashMap<&str, &str> = HashMap::new();
        for (name, ids) in [("train", &split.train), ("val", &split.val), ("test", &split.test)] {
            for id in ids {
                assigned.insert(id.as_str(), name);
            }
        }
        // Homologs never land in different splits
        for (a, b) in [("1aaa", "1aab"), ("2bbb", "2bbc")] {
            if let (Some(x), Some(y)) = (assigned.get(a), assigned.get(b)) {
                assert_eq!(x, y);
            }
        }
        let total = split.train.len() + split.val.len() + split.test.len() + split.excluded.len();
        assert_eq!(total, 5);
    }

    /// Dataset of unrelated random sequences with ids `r000`, `r001`, ...
    fn random_entries(n: usize, len: usize, seed: u64) -> Vec<ChainSequenceEntry> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| ChainSequenceEntry::single(&format!("r{i:03}"), &random_sequence(&mut rng, len)))
            .collect()
    }

    #[test]
    fn seeding_discards_unrelated_chains() {
        let mut data = random_entries(50, 300, 11);
        // A homolog of r000 with every fourth residue replaced
        let mut rng = StdRng::seed_from_u64(12);
        let noise = random_sequence(&mut rng, 300);
        let homolog: String = data[0].chains[0]
            .sequence
            .chars()
            .zip(noise.chars())
            .enumerate()
            .map(|(i, (a, b))| if i % 4 != 3 { a } else { b })
            .collect();
        data.push(ChainSequenceEntry::single("r050", &homolog));

        let index = SequenceIndex::from_entries(&data);
        let query = data[0].chains[0].sequence.as_bytes().to_vec();
        let candidates = index.candidates(&query, 0.3);
        assert!(candidates.contains(&0));
        assert!(candidates.contains(&50));
        assert!(candidates.len() <= 8, "{} candidates", candidates.len());

        let hits = index.find_similar(&data[0].chains[0].sequence, 0.3, 100).unwrap();
        assert_eq!(hits, vec!["r000", "r050"]);
    }

    /// Ten proteins, each as `p<i>a` (bare), `p<i>b` and `p<i>d` (two different His tags) and
    /// `p<i>c` (inner domain)
    fn construct_entries() -> Vec<ChainSequenceEntry> {
        let mut rng = StdRng::seed_from_u64(31);
        (0..10)
            .flat_map(|i| {
                let core = random_sequence(&mut rng, 150);
                [
                    ChainSequenceEntry::single(&format!("p{i}a"), &core),
                    ChainSequenceEntry::single(&format!("p{i}b"), &format!("MGSSHHHHHHSSGLVPRGSH{core}")),
                    ChainSequenceEntry::single(&format!("p{i}c"), &core[20..120]),
                    ChainSequenceEntry::single(&format!("p{i}d"), &format!("MAHHHHHHVDDDDK{core}")),
                ]
            })
            .collect()
    }

    #[test]
    fn tags_and_fragments_are_found() {
        let data = construct_entries();
        let index = SequenceIndex::from_entries(&data);
        for query in 0..4 {
            let hits = index
                .find_similar(&data[query].chains[0].sequence, 0.95, 100)
                .unwrap();
            assert_eq!(hits, vec!["p0a", "p0b", "p0c", "p0d"], "query {query}");
        }
    }

    #[test]
    fn constructs_never_leak_across_splits() {
        let data = construct_entries();
        let split = identity_split(
            &data,
            0.95,
            &settings(0.2, 0.2, 2),
            None,
            &mut rng_from_seed(Some(1)),
        )
        .unwrap();
        assert_eq!(split.val.len(), 8);
        assert_eq!(split.test.len(), 8);
        assert_eq!(split.train.len(), 24);
        assert!(split.excluded.is_empty());

        let protein = |ids: &[String]| -> HashSet<String> {
            ids.iter().map(|id| id[..id.len() - 1].to_string()).collect()
        };
        let (train, val, test) = (protein(&split.train), protein(&split.val), protein(&split.test));
        assert!(train.is_disjoint(&val));
        assert!(train.is_disjoint(&test));
        assert!(val.is_disjoint(&test));
    }

    #[test]
    fn unrelated_dataset_splits_cleanly() {
        let data = random_entries(60, 120, 21);
        let split = identity_split(
            &data,
            0.3,
            &SplitSettings::default(),
            None,
            &mut rng_from_seed(Some(8)),
        )
        .unwrap();
        assert_eq!(split.val.len(), 6);
        assert_eq!(split.test.len(), 6);
        assert_eq!(split.train.len(), 48);
        assert!(split.excluded.is_empty());
    }

    #[test]
    fn iteration_budget_stops_the_split() {
        let data = entries(10, 1);
        let s = SplitSettings {
            budget: SplitBudget {
                max_iterations: Some(2),
                max_duration: None,
            },
            ..settings(0.5, 0.0, 1)
        };
        let result = identity_split(&data, 0.3, &s, Some(&PrefixSearch), &mut rng_from_seed(Some(1)));
        assert!(matches!(
            result,
            Err(Error::BudgetExhausted {
                split: "val",
                iterations: 2
            })
        ));
    }

    /// [`PrefixSearch`] that takes a while to answer
    struct SlowSearch;

    impl SimilaritySearch for SlowSearch {
        fn find_similar(&self, query: &str, cutoff: f64, max_hits: usize) -> Result<Vec<String>> {
            std::thread::sleep(Duration::from_millis(5));
            PrefixSearch.find_similar(query, cutoff, max_hits)
        }
    }

    #[test]
    fn wall_time_budget_stops_the_split() {
        let data = entries(10, 1);
        let s = SplitSettings {
            budget: SplitBudget {
                max_iterations: None,
                max_duration: Some(Duration::from_millis(1)),
            },
            ..settings(0.5, 0.0, 1)
        };
        let result = identity_split(&data, 0.3, &s, Some(&SlowSearch), &mut rng_from_seed(Some(1)));
        assert!(matches!(
            result,
            Err(Error::BudgetExhausted { split: "val", .. })
        ));
    }

    #[test]
    fn caller_token_cancels_the_split() {
        let data = real_entries();
        let token = CancelToken::new();
        let index = SequenceIndex::from_entries(&data).with_cancel_token(token.clone());
        token.cancel();
        let result = identity_split(
            &data,
            0.9,
            &settings(0.2, 0.2, 1),
            Some(&index),
            &mut rng_from_seed(Some(4)),
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
