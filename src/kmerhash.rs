//! Exact k-mer index over assembled contigs.
//!
//! Maps a canonical k-mer to every position at which it occurs in the
//! contig set. The offset sign carries the strand: a non-negative value
//! is a forward-strand position, and a reverse-strand hit at position
//! `p` is stored as `-(p + 1)` so position zero stays unambiguous.
//! Positions are kept in insertion order per key; the alignment driver
//! depends on visiting them in that order.

use rustc_hash::FxHashMap;

use crate::kmer::Kmer;

/// One occurrence of a k-mer in a contig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerPos {
    /// Contig number, by insertion order.
    pub contig_idx: u32,
    /// Forward position, or `-(pos + 1)` for a reverse-strand hit.
    pub contig_pos: i32,
}

impl KmerPos {
    /// The forward-strand coordinate regardless of strand encoding.
    #[must_use]
    pub fn position(self) -> usize {
        if self.contig_pos < 0 {
            (-self.contig_pos - 1) as usize
        } else {
            self.contig_pos as usize
        }
    }

    /// True if the stored k-mer is the reverse complement of the
    /// contig's forward k-mer at this position.
    #[must_use]
    pub fn is_reverse(self) -> bool {
        self.contig_pos < 0
    }
}

/// Canonical k-mer -> occurrence list.
#[derive(Debug, Default)]
pub struct KmerHash {
    map: FxHashMap<Kmer, Vec<KmerPos>>,
}

impl KmerHash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an occurrence. Duplicates are kept; order is preserved.
    pub fn put(&mut self, key: Kmer, contig_idx: u32, contig_pos: i32) {
        self.map.entry(key).or_default().push(KmerPos {
            contig_idx,
            contig_pos,
        });
    }

    /// All occurrences of `key`, oldest first.
    #[must_use]
    pub fn get(&self, key: Kmer) -> &[KmerPos] {
        self.map.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
