//! Local protein alignment used to measure sequence identity.
//!
//! Alignments are scored with BLOSUM62 and affine gaps (open 11, extend 1). Identity is the number
//! of identical columns over the alignment length, internal gap columns included, after trimming
//! poorly conserved ends such as differing expression tags.

/// Residue order of [`BLOSUM62`]
const AA_ORDER: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const BLOSUM62: [[i32; 20]; 20] = [
    //A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0], // A
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3], // R
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3], // N
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3], // D
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1], // C
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2], // Q
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2], // E
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3], // G
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3], // H
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3], // I
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1], // L
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2], // K
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1], // M
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1], // F
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2], // P
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2], // S
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0], // T
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3], // W
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1], // Y
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4], // V
];

const GAP_OPEN: i32 = 11;
const GAP_EXTEND: i32 = 1;
/// Score for pairs involving a residue outside the 20 standard amino acids
const UNKNOWN_SCORE: i32 = -1;
/// Fraction of the shorter sequence that must be aligned to residues for the identity to count
pub const MIN_COVERAGE: f64 = 0.5;
/// Columns that may be trimmed off each end of a local alignment when measuring identity
pub const MAX_END_TRIM: usize = 30;

const NEG_INF: i32 = i32::MIN / 4;

fn residue_index(aa: u8) -> Option<usize> {
    AA_ORDER.iter().position(|&c| c == aa.to_ascii_uppercase())
}

fn substitution(a: u8, b: u8) -> i32 {
    match (residue_index(a), residue_index(b)) {
        (Some(i), Some(j)) => BLOSUM62[i][j],
        _ => UNKNOWN_SCORE,
    }
}

/// One column of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Identical,
    Substituted,
    Gap,
}

/// Optimal local alignment of two sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub score: i32,
    pub columns: Vec<Column>,
}

impl Alignment {
    /// Identical columns
    pub fn identities(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| **c == Column::Identical)
            .count()
    }

    /// Columns pairing two residues
    pub fn aligned(&self) -> usize {
        self.columns.iter().filter(|c| **c != Column::Gap).count()
    }

    /// Columns, internal gaps included
    pub fn length(&self) -> usize {
        self.columns.len()
    }

    /// Identical columns over alignment length.
    pub fn identity(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.identities() as f64 / self.length() as f64
    }

    /// Highest identity over the alignment with up to [`MAX_END_TRIM`] columns dropped from each
    /// end, keeping at least `min_aligned` residue pairs. 0 when no such stretch exists.
    ///
    /// Mismatched expression tags and cloning remnants sit at the ends of a local alignment and
    /// are trimmed away here; substitutions further inside always count.
    pub fn trimmed_identity(&self, min_aligned: usize) -> f64 {
        let n = self.columns.len();
        // Prefix sums of aligned and identical columns
        let (mut aligned, mut identical) = (vec![0; n + 1], vec![0; n + 1]);
        for (k, c) in self.columns.iter().enumerate() {
            aligned[k + 1] = aligned[k] + (*c != Column::Gap) as usize;
            identical[k + 1] = identical[k] + (*c == Column::Identical) as usize;
        }
        if n == 0 || aligned[n] < min_aligned {
            return 0.0;
        }

        let mut best = 0.0_f64;
        for start in 0..=MAX_END_TRIM.min(n) {
            for end in (start + 1).max(n.saturating_sub(MAX_END_TRIM))..=n {
                if aligned[end] - aligned[start] >= min_aligned {
                    let identity = (identical[end] - identical[start]) as f64 / (end - start) as f64;
                    best = best.max(identity);
                }
            }
        }
        best
    }
}

/// DP state a cell was reached from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Match,
    /// Residue of `a` against a gap
    GapB,
    /// Residue of `b` against a gap
    GapA,
}

/// First candidate with the highest score
fn pick<const N: usize>(candidates: [(i32, State); N]) -> (i32, State) {
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0 > best.0 {
            best = *c;
        }
    }
    best
}

/// Optimal local alignment of `a` and `b` (Smith-Waterman with Gotoh affine gaps).
pub fn align(a: &[u8], b: &[u8]) -> Alignment {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    // Tracebacks for the match, gap-in-b and gap-in-a states
    let mut trace_m = vec![State::Start; (n + 1) * width];
    let mut trace_x = vec![State::Start; (n + 1) * width];
    let mut trace_y = vec![State::Start; (n + 1) * width];

    let mut prev_m = vec![NEG_INF; width];
    let mut prev_x = vec![NEG_INF; width];
    let mut prev_y = vec![NEG_INF; width];
    let mut cur_m = vec![NEG_INF; width];
    let mut cur_x = vec![NEG_INF; width];
    let mut cur_y = vec![NEG_INF; width];

    let mut best = (0, 0, 0);
    for i in 1..=n {
        cur_m[0] = NEG_INF;
        cur_x[0] = NEG_INF;
        cur_y[0] = NEG_INF;
        for j in 1..=m {
            let idx = i * width + j;

            let (score, from) = pick([
                (0, State::Start),
                (prev_m[j - 1], State::Match),
                (prev_x[j - 1], State::GapB),
                (prev_y[j - 1], State::GapA),
            ]);
            cur_m[j] = score + substitution(a[i - 1], b[j - 1]);
            trace_m[idx] = from;

            let (score, from) = pick([
                (prev_m[j] - GAP_OPEN, State::Match),
                (prev_x[j] - GAP_EXTEND, State::GapB),
                (prev_y[j] - GAP_OPEN, State::GapA),
            ]);
            cur_x[j] = score;
            trace_x[idx] = from;

            let (score, from) = pick([
                (cur_m[j - 1] - GAP_OPEN, State::Match),
                (cur_x[j - 1] - GAP_OPEN, State::GapB),
                (cur_y[j - 1] - GAP_EXTEND, State::GapA),
            ]);
            cur_y[j] = score;
            trace_y[idx] = from;

            if cur_m[j] > best.0 {
                best = (cur_m[j], i, j);
            }
        }
        std::mem::swap(&mut prev_m, &mut cur_m);
        std::mem::swap(&mut prev_x, &mut cur_x);
        std::mem::swap(&mut prev_y, &mut cur_y);
    }

    let (score, mut i, mut j) = best;
    let mut columns = Vec::new();
    if score > 0 {
        let mut state = State::Match;
        loop {
            let idx = i * width + j;
            match state {
                State::Start => break,
                State::Match => {
                    columns.push(if a[i - 1].eq_ignore_ascii_case(&b[j - 1]) {
                        Column::Identical
                    } else {
                        Column::Substituted
                    });
                    state = trace_m[idx];
                    i -= 1;
                    j -= 1;
                }
                State::GapB => {
                    columns.push(Column::Gap);
                    state = trace_x[idx];
                    i -= 1;
                }
                State::GapA => {
                    columns.push(Column::Gap);
                    state = trace_y[idx];
                    j -= 1;
                }
            }
        }
        columns.reverse();
    }
    Alignment { score, columns }
}

/// Sequence identity of `a` and `b` over their local alignment.
///
/// Pairs where fewer than [`MIN_COVERAGE`] of the shorter sequence's residues are aligned score 0.
/// See [`Alignment::trimmed_identity`] for how the alignment ends are handled.
pub fn sequence_identity(a: &[u8], b: &[u8]) -> f64 {
    let shorter = a.len().min(b.len());
    if shorter == 0 {
        return 0.0;
    }
    let min_aligned = (MIN_COVERAGE * shorter as f64).ceil() as usize;
    align(a, b).trimmed_identity(min_aligned)
}
