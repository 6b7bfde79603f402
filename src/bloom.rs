//! Counting Bloom filter over canonical k-mers.
//!
//! Approximate k-mer abundance for the assembler. Each key maps to
//! `num_hashes` cells derived from the packed k-mer by xorshift mixing;
//! cells are saturating byte counters. Collisions can inflate a count,
//! never deflate it, which the greedy extension tolerates. `del` clears
//! every cell of a key outright so a consumed k-mer stops scoring.

use crate::kmer::Kmer;

/// A counting Bloom filter with saturating byte cells.
#[derive(Debug)]
pub struct Bloom {
    cells: Vec<u8>,
    num_hashes: usize,
    mask: u64,
    window_bits: u32,
}

#[inline]
fn mix(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x.wrapping_mul(0x2545_f491_4f6c_dd1d)
}

impl Bloom {
    /// Creates a filter of `cells` counters (a power of two) addressed by
    /// `num_hashes` derived positions per key.
    #[must_use]
    pub fn new(cells: usize, num_hashes: usize) -> Self {
        assert!(cells.is_power_of_two(), "cell count must be a power of two");
        assert!(num_hashes >= 1);
        Self {
            cells: vec![0; cells],
            num_hashes,
            mask: cells as u64 - 1,
            window_bits: cells.trailing_zeros(),
        }
    }

    /// Cell indexes for `key`: disjoint bit windows of successive
    /// xorshift mixes, so a key's cells are deterministic and spread.
    #[inline]
    fn cell_indexes(&self, key: Kmer) -> impl Iterator<Item = usize> {
        let mask = self.mask;
        let window_bits = self.window_bits;
        let num_hashes = self.num_hashes;

        let mut state = key ^ 0x9e37_79b9_7f4a_7c15;
        let mut acc = 0u64;
        let mut bits_left = 0u32;
        let mut produced = 0usize;
        std::iter::from_fn(move || {
            if produced == num_hashes {
                return None;
            }
            if bits_left < window_bits {
                state = mix(state);
                acc = state;
                bits_left = 64;
            }
            let idx = (acc & mask) as usize;
            acc >>= window_bits;
            bits_left -= window_bits;
            produced += 1;
            Some(idx)
        })
    }

    /// Adds `delta` to every cell of `key`, saturating at the cell width.
    pub fn add(&mut self, key: Kmer, delta: u32) {
        let delta = u8::try_from(delta.min(u32::from(u8::MAX))).unwrap_or(u8::MAX);
        for idx in self.cell_indexes(key) {
            self.cells[idx] = self.cells[idx].saturating_add(delta);
        }
    }

    /// Approximate count for `key`: the minimum over its cells.
    #[must_use]
    pub fn get(&self, key: Kmer) -> u32 {
        self.cell_indexes(key)
            .map(|idx| u32::from(self.cells[idx]))
            .min()
            .unwrap_or(0)
    }

    /// Hard-deletes `key` by zeroing all of its cells.
    ///
    /// Deleting a key that was never added may zero cells shared with
    /// other keys; the assembler only deletes keys it has seen.
    pub fn del(&mut self, key: Kmer) {
        for idx in self.cell_indexes(key) {
            self.cells[idx] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_counts_zero() {
        let b = Bloom::new(1 << 16, 4);
        assert_eq!(b.get(0x1234), 0);
    }

    #[test]
    fn add_then_get_reports_at_least_delta() {
        let mut b = Bloom::new(1 << 16, 4);
        b.add(42, 3);
        assert!(b.get(42) >= 3);
        b.add(42, 2);
        assert!(b.get(42) >= 5);
    }

    #[test]
    fn del_preserves_zero() {
        let mut b = Bloom::new(1 << 16, 4);
        b.add(7, 10);
        b.del(7);
        assert_eq!(b.get(7), 0);
        // deleting again stays at zero
        b.del(7);
        assert_eq!(b.get(7), 0);
    }

    #[test]
    fn cells_saturate_instead_of_wrapping() {
        let mut b = Bloom::new(1 << 12, 2);
        for _ in 0..300 {
            b.add(99, 1);
        }
        assert_eq!(b.get(99), 255);
        b.add(99, 1000);
        assert_eq!(b.get(99), 255);
    }

    #[test]
    fn keys_get_the_requested_number_of_cells() {
        let b = Bloom::new(1 << 23, 8);
        assert_eq!(b.cell_indexes(0xabcdef).count(), 8);
        // same key, same cells
        let a: Vec<usize> = b.cell_indexes(0xabcdef).collect();
        let c: Vec<usize> = b.cell_indexes(0xabcdef).collect();
        assert_eq!(a, c);
    }

    #[test]
    fn distinct_keys_mostly_independent() {
        let mut b = Bloom::new(1 << 20, 8);
        for key in 0..64u64 {
            b.add(key, 1);
        }
        for key in 0..64u64 {
            assert!(b.get(key) >= 1);
        }
        // an untouched key stays clean in a sparse filter
        assert_eq!(b.get(0xdead_beef), 0);
    }
}
