//! Greedy read assembly and the alignment driver.
//!
//! The assembler collects reads into a deduplicating set, counts their
//! k-mers in a Bloom filter weighted by read multiplicity, and then
//! grows contigs greedily: unique reads become seeds in descending
//! abundance order, and each seed is extended base by base in both
//! directions toward whichever k-mer the filter supports most. Extension
//! consumes the filter, so sequence explained by one contig cannot seed
//! or extend another.
//!
//! Surviving contigs are written as FASTA, indexed under a smaller
//! alignment k-mer, and every unique read is walked over that index to
//! anchor seeded local alignments. The per-read results feed the
//! downstream residual coder; reads with no acceptable alignment are
//! carried through unaligned.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::align::{Alignment, SeededAligner};
use crate::bloom::Bloom;
use crate::error::SeqPackError;
use crate::kmer::{base_to_code, canonical, kmer_mask, Kmer, MAX_K};
use crate::kmerhash::KmerHash;
use crate::seqset::{SeqCount, SeqSet};
use crate::twobit::TwoBit;

/// Tunables for an assembly run.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// K-mer size for contig extension.
    pub assemble_k: usize,
    /// K-mer size for alignment seeds; at most `assemble_k`.
    pub align_k: usize,
    /// Minimum read multiplicity for a seed.
    pub count_cutoff: u32,
    /// Where the contig FASTA is written.
    pub contig_path: PathBuf,
    /// Bloom filter cells; a power of two.
    pub bloom_cells: usize,
    /// Hash functions per Bloom key.
    pub bloom_hashes: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            assemble_k: 25,
            align_k: 15,
            count_cutoff: 2,
            contig_path: PathBuf::from("contig.fa"),
            bloom_cells: 8 * 1024 * 1024,
            bloom_hashes: 8,
        }
    }
}

/// Summary of one assembly run.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyStats {
    /// Reads accepted by [`Assembler::add_seq`].
    pub reads: u64,
    /// Reads dropped for containing a non-nucleotide character.
    pub dropped_reads: u64,
    /// Distinct read sequences.
    pub unique_reads: usize,
    /// Contigs retained after the length gate.
    pub contigs: usize,
    /// Total bases across retained contigs.
    pub contig_bases: usize,
    /// Unique reads with an accepted alignment.
    pub aligned_reads: usize,
    /// Unique reads carried to the residual coder unaligned.
    pub unaligned_reads: usize,
}

/// A read's best alignment against the contig set.
#[derive(Debug, Clone)]
pub struct ReadAlignment {
    pub contig_idx: u32,
    pub alignment: Alignment,
}

/// Assembly-based dictionary builder for short reads.
#[derive(Debug)]
pub struct Assembler {
    config: AssemblerConfig,
    assemble_mask: Kmer,
    align_mask: Kmer,
    reads: SeqSet,
    bloom: Bloom,
    index: KmerHash,
    contigs: Vec<TwoBit>,
    /// Best alignment per unique read, in seed (abundance) order.
    alignments: Vec<Option<ReadAlignment>>,
    scratch: TwoBit,
    reads_added: u64,
    reads_dropped: u64,
}

impl Assembler {
    /// Creates an assembler; validates the k-mer configuration.
    pub fn new(config: AssemblerConfig) -> Result<Self, SeqPackError> {
        for k in [config.assemble_k, config.align_k] {
            if k == 0 || k > MAX_K {
                return Err(SeqPackError::InvalidKmerLength { k, max: MAX_K });
            }
        }
        if config.align_k > config.assemble_k {
            return Err(SeqPackError::AlignKmerTooLong {
                align_k: config.align_k,
                assemble_k: config.assemble_k,
            });
        }

        Ok(Self {
            assemble_mask: kmer_mask(config.assemble_k),
            align_mask: kmer_mask(config.align_k),
            reads: SeqSet::new(),
            bloom: Bloom::new(config.bloom_cells, config.bloom_hashes),
            index: KmerHash::new(),
            contigs: Vec::new(),
            alignments: Vec::new(),
            scratch: TwoBit::new(),
            reads_added: 0,
            reads_dropped: 0,
            config,
        })
    }

    /// Adds one read. A read containing any character outside `ACGT`
    /// (either case) is dropped wholesale, without error.
    pub fn add_seq(&mut self, seq: &[u8]) {
        if seq.iter().any(|&b| base_to_code(b).is_none()) {
            self.reads_dropped += 1;
            return;
        }
        self.scratch.assign_bases(seq);
        self.reads.inc(&self.scratch);
        self.reads_added += 1;
    }

    /// Runs the full pipeline: count k-mers, build and emit contigs,
    /// index them, align every unique read.
    ///
    /// Contig file write failures abort the run. After this returns, the
    /// contig set and index are immutable; the Bloom filter has been
    /// consumed and must not be consulted again.
    pub fn assemble(&mut self) -> Result<AssemblyStats, SeqPackError> {
        let assemble_k = self.config.assemble_k;

        let mut xs = self.reads.dump();
        xs.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.seq.cmp(b.seq)));
        info!(unique_reads = xs.len(), "deduplicated reads");

        // Count k-mers, weighted by how often each read was seen.
        for entry in &xs {
            let seq = entry.seq;
            let mut x: Kmer = 0;
            for j in 0..seq.len() {
                x = ((x << 2) | seq.get(j)) & self.assemble_mask;
                if j + 1 >= assemble_k {
                    self.bloom.add(canonical(x, assemble_k), entry.count);
                }
            }
        }

        let path = &self.config.contig_path;
        let file = File::create(path).map_err(|source| SeqPackError::ContigWrite {
            source,
            path: path.clone(),
        })?;
        let mut out = BufWriter::new(file);

        let mut contig = TwoBit::new();
        for (i, entry) in xs.iter().enumerate() {
            if entry.count < self.config.count_cutoff {
                break;
            }
            make_contig(
                &mut self.bloom,
                assemble_k,
                self.assemble_mask,
                entry.seq,
                &mut contig,
            );
            if contig.len() < 3 * assemble_k {
                continue;
            }

            write!(out, ">contig_{i:05}\n{contig}\n\n").map_err(|source| {
                SeqPackError::ContigWrite {
                    source,
                    path: path.clone(),
                }
            })?;
            self.contigs.push(contig.clone());
        }
        out.flush().map_err(|source| SeqPackError::ContigWrite {
            source,
            path: path.clone(),
        })?;
        info!(contigs = self.contigs.len(), "assembled contigs");

        index_contigs(
            &mut self.index,
            &self.contigs,
            self.config.align_k,
            self.align_mask,
        );
        self.alignments = align_to_contigs(
            &self.contigs,
            &self.index,
            self.config.align_k,
            self.align_mask,
            &xs,
        );

        let aligned = self.alignments.iter().flatten().count();
        Ok(AssemblyStats {
            reads: self.reads_added,
            dropped_reads: self.reads_dropped,
            unique_reads: xs.len(),
            contigs: self.contigs.len(),
            contig_bases: self.contigs.iter().map(TwoBit::len).sum(),
            aligned_reads: aligned,
            unaligned_reads: xs.len() - aligned,
        })
    }

    /// Contigs retained by the last [`assemble`](Self::assemble) call.
    #[must_use]
    pub fn contigs(&self) -> &[TwoBit] {
        &self.contigs
    }

    /// Best alignments from the last run, parallel to the unique reads
    /// in descending abundance order.
    #[must_use]
    pub fn alignments(&self) -> &[Option<ReadAlignment>] {
        &self.alignments
    }

    /// Number of distinct reads currently held.
    #[must_use]
    pub fn unique_reads(&self) -> usize {
        self.reads.len()
    }
}

/// Grows one contig around `seed`, consuming the Bloom filter.
///
/// The left arm is built right-to-left, reversed, and joined to the seed
/// before the right arm is grown. Extension takes the strictly
/// best-supported base; on a tie the lowest base code wins, which keeps
/// runs reproducible.
fn make_contig(bloom: &mut Bloom, k: usize, mask: Kmer, seed: &TwoBit, contig: &mut TwoBit) {
    contig.clear();
    if seed.len() < k {
        return;
    }

    // Spend the seed's own k-mers so it cannot re-seed or re-extend.
    let mut x = seed.get_kmer(0, k);
    for i in k..seed.len() {
        x = ((x << 2) | seed.get(i)) & mask;
        bloom.del(canonical(x, k));
    }

    let mut x = seed.get_kmer(0, k);
    loop {
        bloom.del(canonical(x, k));
        x = (x >> 2) & mask;

        let mut cnt_best = 0;
        let mut nt_best: Kmer = 0;
        for nt in 0..4u64 {
            let candidate = x | (nt << (2 * (k - 1)));
            let cnt = bloom.get(canonical(candidate, k));
            if cnt > cnt_best {
                cnt_best = cnt;
                nt_best = nt;
            }
        }

        if cnt_best == 0 {
            break;
        }
        x |= nt_best << (2 * (k - 1));
        contig.push_code(nt_best);
    }

    contig.reverse();
    contig.extend_from(seed);

    let mut x = seed.get_kmer(seed.len() - k, k);
    loop {
        bloom.del(canonical(x, k));
        x = (x << 2) & mask;

        let mut cnt_best = 0;
        let mut nt_best: Kmer = 0;
        for nt in 0..4u64 {
            let cnt = bloom.get(canonical(x | nt, k));
            if cnt > cnt_best {
                cnt_best = cnt;
                nt_best = nt;
            }
        }

        if cnt_best == 0 {
            break;
        }
        x |= nt_best;
        contig.push_code(nt_best);
    }
}

/// Slides the alignment k-mer over every contig and records each
/// position under its canonical form, sign-encoding the strand.
fn index_contigs(index: &mut KmerHash, contigs: &[TwoBit], align_k: usize, align_mask: Kmer) {
    debug!("indexing contigs");
    for (i, contig) in contigs.iter().enumerate() {
        let mut x: Kmer = 0;
        for pos in 0..contig.len() {
            x = ((x << 2) | contig.get(pos)) & align_mask;
            if pos + 1 >= align_k {
                let y = canonical(x, align_k);
                if x == y {
                    index.put(y, i as u32, (pos + 1 - align_k) as i32);
                } else {
                    index.put(y, i as u32, -((pos + 2 - align_k) as i32));
                }
            }
        }
    }
    debug!(keys = index.len(), "indexed contigs");
}

/// Walks every unique read over the k-mer index and anchors seeded
/// alignments, keeping the best-scoring hit per read.
fn align_to_contigs(
    contigs: &[TwoBit],
    index: &KmerHash,
    align_k: usize,
    align_mask: Kmer,
    xs: &[SeqCount<'_>],
) -> Vec<Option<ReadAlignment>> {
    let aligners: Vec<SeededAligner> = contigs.iter().map(SeededAligner::new).collect();

    let mut results = Vec::with_capacity(xs.len());
    for entry in xs {
        let seq = entry.seq;
        let mut best: Option<ReadAlignment> = None;

        let mut x: Kmer = 0;
        for j in 0..seq.len() {
            x = ((x << 2) | seq.get(j)) & align_mask;
            if j + 1 < align_k {
                continue;
            }
            let y = canonical(x, align_k);
            for hit in index.get(y) {
                // Only hits where both the read's and the contig's k-mer
                // are the non-canonical strand are anchored for now.
                // TODO: align the remaining strand pairings against
                // reverse-complement contig aligners.
                if hit.is_reverse() && x != y {
                    let found = aligners[hit.contig_idx as usize].seeded_align(
                        seq,
                        hit.position(),
                        j + 1 - align_k,
                        align_k,
                    );
                    if let Some(alignment) = found {
                        // Insertion order breaks score ties.
                        let better = best
                            .as_ref()
                            .map_or(true, |b| alignment.score > b.alignment.score);
                        if better {
                            best = Some(ReadAlignment {
                                contig_idx: hit.contig_idx,
                                alignment,
                            });
                        }
                    }
                }
            }
        }
        results.push(best);
    }
    results
}
