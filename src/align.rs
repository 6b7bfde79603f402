//! Seed-anchored local alignment.
//!
//! One [`SeededAligner`] is built per contig and reused across reads.
//! The alignment driver hands it an exact k-mer seed (contig position,
//! read position, length); the aligner scores the seed window and
//! extends both directions with banded dynamic programming under affine
//! gap penalties, tracing back into a CIGAR. Extensions may stop
//! anywhere; an alignment below the score floor is reported as a miss.
//!
//! Scores are fixed for the lifetime of a compressed stream: changing
//! them changes which reads align and therefore the residual layout.

use crate::twobit::TwoBit;

const MATCH: i32 = 2;
const MISMATCH: i32 = -1;
const GAP_OPEN: i32 = -2;
const GAP_EXTEND: i32 = -1;

/// Half-width of the DP band around the diagonal.
const BAND: usize = 16;

/// Minimum total score for an alignment to be reported.
const MIN_SCORE: i32 = 20;

const NEG_INF: i32 = i32::MIN / 2;

/// One run of CIGAR operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    /// Consumes one base of both contig and read (match or mismatch).
    Match,
    /// Consumes one read base (insertion relative to the contig).
    Ins,
    /// Consumes one contig base (deletion relative to the read).
    Del,
}

impl CigarOp {
    const fn symbol(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Ins => 'I',
            Self::Del => 'D',
        }
    }
}

/// A scored local alignment of a read against a contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub score: i32,
    /// Contig interval, half-open.
    pub ref_start: usize,
    pub ref_end: usize,
    /// Read interval, half-open.
    pub query_start: usize,
    pub query_end: usize,
    /// Run-length encoded operations, read 5' to 3'.
    pub cigar: Vec<(CigarOp, u32)>,
}

impl Alignment {
    /// The CIGAR in SAM-style text form.
    #[must_use]
    pub fn cigar_string(&self) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        for &(op, len) in &self.cigar {
            let _ = write!(s, "{len}{}", op.symbol());
        }
        s
    }
}

/// Result of extending in one direction: consumed lengths, score, and
/// operations ordered outward from the seed.
struct Extension {
    score: i32,
    target_len: usize,
    query_len: usize,
    ops: Vec<(CigarOp, u32)>,
}

fn push_op(ops: &mut Vec<(CigarOp, u32)>, op: CigarOp, len: u32) {
    if len == 0 {
        return;
    }
    match ops.last_mut() {
        Some((last, run)) if *last == op => *run += len,
        _ => ops.push((op, len)),
    }
}

/// Best banded prefix-pair alignment of `query` against `target`,
/// anchored at the origin and free to end anywhere.
fn extend(target: &[u8], query: &[u8]) -> Extension {
    let m = query.len();
    let n = target.len().min(m + BAND);

    if m == 0 || n == 0 {
        return Extension {
            score: 0,
            target_len: 0,
            query_len: 0,
            ops: Vec::new(),
        };
    }

    let width = n + 1;
    let mut dp = vec![NEG_INF; (m + 1) * width];
    let mut tb = vec![None::<CigarOp>; (m + 1) * width];
    let at = |i: usize, j: usize| i * width + j;

    dp[at(0, 0)] = 0;
    for j in 1..=n.min(BAND) {
        dp[at(0, j)] = GAP_OPEN + (j as i32 - 1) * GAP_EXTEND;
        tb[at(0, j)] = Some(CigarOp::Del);
    }
    for i in 1..=m.min(BAND) {
        dp[at(i, 0)] = GAP_OPEN + (i as i32 - 1) * GAP_EXTEND;
        tb[at(i, 0)] = Some(CigarOp::Ins);
    }

    for i in 1..=m {
        let j_lo = i.saturating_sub(BAND).max(1);
        let j_hi = (i + BAND).min(n);
        for j in j_lo..=j_hi {
            let mut best = NEG_INF;
            let mut best_op = None;

            let sub = if query[i - 1] == target[j - 1] {
                MATCH
            } else {
                MISMATCH
            };
            let diag = dp[at(i - 1, j - 1)];
            if diag > NEG_INF && diag + sub > best {
                best = diag + sub;
                best_op = Some(CigarOp::Match);
            }

            let up = dp[at(i - 1, j)];
            if up > NEG_INF {
                let pen = if tb[at(i - 1, j)] == Some(CigarOp::Ins) {
                    GAP_EXTEND
                } else {
                    GAP_OPEN
                };
                if up + pen > best {
                    best = up + pen;
                    best_op = Some(CigarOp::Ins);
                }
            }

            let left = dp[at(i, j - 1)];
            if left > NEG_INF {
                let pen = if tb[at(i, j - 1)] == Some(CigarOp::Del) {
                    GAP_EXTEND
                } else {
                    GAP_OPEN
                };
                if left + pen > best {
                    best = left + pen;
                    best_op = Some(CigarOp::Del);
                }
            }

            dp[at(i, j)] = best;
            tb[at(i, j)] = best_op;
        }
    }

    // Extensions are free to stop wherever the score peaks, including
    // the origin (an empty extension).
    let (mut bi, mut bj, mut best) = (0, 0, 0);
    for i in 0..=m {
        for j in 0..=n {
            if dp[at(i, j)] > best {
                best = dp[at(i, j)];
                bi = i;
                bj = j;
            }
        }
    }

    let (end_i, end_j) = (bi, bj);
    let mut rev = Vec::new();
    while bi > 0 || bj > 0 {
        match tb[at(bi, bj)] {
            Some(CigarOp::Match) => {
                rev.push(CigarOp::Match);
                bi -= 1;
                bj -= 1;
            }
            Some(CigarOp::Ins) => {
                rev.push(CigarOp::Ins);
                bi -= 1;
            }
            Some(CigarOp::Del) => {
                rev.push(CigarOp::Del);
                bj -= 1;
            }
            None => break,
        }
    }

    let mut ops = Vec::new();
    for op in rev.into_iter().rev() {
        push_op(&mut ops, op, 1);
    }

    Extension {
        score: best,
        target_len: end_j,
        query_len: end_i,
        ops,
    }
}

/// Reusable per-contig alignment state.
#[derive(Debug)]
pub struct SeededAligner {
    /// The contig unpacked to flat 2-bit codes, built once per contig.
    target: Vec<u8>,
}

impl SeededAligner {
    /// Builds aligner state over a contig.
    #[must_use]
    pub fn new(contig: &TwoBit) -> Self {
        Self {
            target: (0..contig.len()).map(|i| contig.get(i) as u8).collect(),
        }
    }

    /// Length of the underlying contig.
    #[must_use]
    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// Extends a seed match into a full local alignment.
    ///
    /// `ref_seed_pos`/`query_seed_pos` locate the seed in the contig and
    /// the read; `seed_len` bases starting there are scored as-is, then
    /// both flanks are extended. Returns `None` when the seed is out of
    /// bounds or the total score stays under the acceptance floor.
    #[must_use]
    pub fn seeded_align(
        &self,
        query: &TwoBit,
        ref_seed_pos: usize,
        query_seed_pos: usize,
        seed_len: usize,
    ) -> Option<Alignment> {
        if ref_seed_pos + seed_len > self.target.len() || query_seed_pos + seed_len > query.len() {
            return None;
        }

        let query_codes: Vec<u8> = (0..query.len()).map(|i| query.get(i) as u8).collect();

        let mut seed_score = 0;
        for o in 0..seed_len {
            seed_score += if self.target[ref_seed_pos + o] == query_codes[query_seed_pos + o] {
                MATCH
            } else {
                MISMATCH
            };
        }

        // Left flank, reversed so the DP anchors at the seed edge.
        let left_target: Vec<u8> = self.target[..ref_seed_pos].iter().rev().copied().collect();
        let left_query: Vec<u8> = query_codes[..query_seed_pos].iter().rev().copied().collect();
        let left = extend(&left_target, &left_query);

        let right = extend(
            &self.target[ref_seed_pos + seed_len..],
            &query_codes[query_seed_pos + seed_len..],
        );

        let score = left.score + seed_score + right.score;
        if score < MIN_SCORE {
            return None;
        }

        let mut cigar = Vec::new();
        for &(op, len) in left.ops.iter().rev() {
            push_op(&mut cigar, op, len);
        }
        push_op(&mut cigar, CigarOp::Match, seed_len as u32);
        for &(op, len) in &right.ops {
            push_op(&mut cigar, op, len);
        }

        Some(Alignment {
            score,
            ref_start: ref_seed_pos - left.target_len,
            ref_end: ref_seed_pos + seed_len + right.target_len,
            query_start: query_seed_pos - left.query_len,
            query_end: query_seed_pos + seed_len + right.query_len,
            cigar,
        })
    }
}
