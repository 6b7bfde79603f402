//! Entropy-coding stack tests.
//!
//! Exercises the range coder through the adaptive distributions the way
//! the residual coder does: an encoder-side model and an independently
//! initialised decoder-side model fed the same symbol stream.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use seqpack::ac::{RangeDecoder, RangeEncoder};
use seqpack::cumdist::CumDist;
use seqpack::dist::{CondDist, Dist, DIST_TOTAL};

#[test]
fn cumdist_point_and_prefix_queries() {
    let mut c = CumDist::new(4);

    // fresh tree: every symbol has the pseudocount
    assert_eq!(c.prefix(0), 0);
    assert_eq!(c.prefix(1), 1);
    assert_eq!(c.prefix(2), 2);
    assert_eq!(c.total(), 4);

    c.add(2, 5);
    assert_eq!(c.freq(2), 6);
    assert_eq!(c.prefix(3), 8);
    assert_eq!(c.prefix(4), c.total());
    assert_eq!(c.total(), 9);
}

#[test]
fn cumdist_prefix_is_consistent_under_many_updates() {
    let mut c = CumDist::new(100);
    for i in 0..1000usize {
        c.add((i * 37) % 100, (i % 7 + 1) as u32);
    }
    let mut acc = 0;
    for s in 0..100 {
        assert_eq!(c.prefix(s), acc, "prefix at {s}");
        acc += c.freq(s);
    }
    assert_eq!(c.prefix(100), c.total());
    assert_eq!(acc, c.total());
}

#[test]
fn dist_round_trips_the_cyclic_alphabet() {
    // the cyclic pattern 0,1,2,3 repeated 10,000 times
    let symbols: Vec<usize> = (0..40_000).map(|i| i % 4).collect();

    let mut enc_model: Dist<4> = Dist::new(false);
    let mut enc = RangeEncoder::new();
    for &s in &symbols {
        enc_model.encode(&mut enc, s);
    }
    let bytes = enc.finish();

    let mut dec_model: Dist<4> = Dist::new(true);
    let mut dec = RangeDecoder::new(&bytes);
    let decoded: Vec<usize> = (0..symbols.len()).map(|_| dec_model.decode(&mut dec)).collect();

    assert_eq!(decoded, symbols);
}

#[test]
fn dist_round_trips_every_declared_alphabet_size() {
    fn check<const N: usize>() {
        let symbols: Vec<usize> = (0..5000).map(|i| (i * i + i / 7) % N).collect();

        let mut enc_model: Dist<N> = Dist::new(false);
        let mut enc = RangeEncoder::new();
        for &s in &symbols {
            enc_model.encode(&mut enc, s);
        }
        let bytes = enc.finish();

        let mut dec_model: Dist<N> = Dist::new(true);
        let mut dec = RangeDecoder::new(&bytes);
        for (i, &expect) in symbols.iter().enumerate() {
            assert_eq!(dec_model.decode(&mut dec), expect, "N={N} symbol {i}");
        }
    }

    check::<2>();
    check::<4>();
    check::<8>();
    check::<16>();
    check::<41>();
    check::<100>();
    check::<128>();
    check::<256>();
}

#[test]
fn dist_frequencies_keep_their_invariants() {
    let mut model: Dist<16> = Dist::new(false);
    let mut enc = RangeEncoder::new();
    for i in 0..100_000 {
        // heavy skew forces rescales and count halving
        model.encode(&mut enc, if i % 19 == 0 { i % 16 } else { 0 });
    }
    let total: u32 = (0..16).map(|s| model.freq(s)).sum();
    assert_eq!(total, DIST_TOTAL);
    for s in 0..16 {
        assert!(model.freq(s) >= 1);
    }
}

#[test]
fn cond_dist_round_trips_with_independent_reorders() {
    let contexts = 41;
    let stream: Vec<(usize, usize)> = (0..25_000)
        .map(|i| ((i * 13) % contexts, (i / 3) % 4))
        .collect();

    let mut enc_model: CondDist<4> = CondDist::new(contexts, false);
    let mut enc = RangeEncoder::new();
    for (i, &(y, x)) in stream.iter().enumerate() {
        enc_model.encode(&mut enc, y, x);
        if i == 9999 {
            enc_model.reorder();
        }
    }
    let bytes = enc.finish();

    // the decoder reorders at different points; the stream still decodes
    let mut dec_model: CondDist<4> = CondDist::new(contexts, true);
    let mut dec = RangeDecoder::new(&bytes);
    for (i, &(y, expect)) in stream.iter().enumerate() {
        assert_eq!(dec_model.decode(&mut dec, y), expect, "symbol {i}");
        if i == 4999 || i == 19_999 {
            dec_model.reorder();
        }
    }
}

#[test]
fn adaptive_coding_beats_flat_bytes_on_skewed_data() {
    let symbols: Vec<usize> = (0..50_000).map(|i| usize::from(i % 31 == 0)).collect();

    let mut model: Dist<256> = Dist::new(false);
    let mut enc = RangeEncoder::new();
    for &s in &symbols {
        model.encode(&mut enc, s);
    }
    let bytes = enc.finish();

    // two symbols at ~3% entropy should compress far below 1 byte each
    assert!(bytes.len() * 4 < symbols.len());
}
