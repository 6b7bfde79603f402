//! # seqpack
//!
//! An assembly-based compressor core for short-read DNA sequencing
//! data. Reads are deduplicated into a counted set, greedily assembled
//! into consensus contigs by abundance-ordered k-mer extension, and then
//! aligned back against the contigs they came from; the alignments and
//! adaptive arithmetic-coding models are the raw material for the
//! residual coding stage.
//!
//! The pieces compose bottom-up:
//!
//! - [`twobit`] packs sequences at two bits per base and is the currency
//!   every other structure trades in.
//! - [`kmer`] handles packed k-mer arithmetic and canonical forms.
//! - [`seqset`] deduplicates reads and counts multiplicities.
//! - [`bloom`] and [`kmerhash`] are the approximate and exact k-mer
//!   tables behind assembly and alignment seeding.
//! - [`assembler`] drives the pipeline; [`align`] anchors reads on
//!   contigs with banded seeded extension.
//! - [`ac`], [`dist`], and [`cumdist`] are the entropy-coding substrate:
//!   a range coder, adaptive fixed-alphabet distributions, and a
//!   cumulative frequency tree.
//!
//! ```no_run
//! use seqpack::{Assembler, AssemblerConfig};
//!
//! let mut assembler = Assembler::new(AssemblerConfig::default())?;
//! assembler.add_seq(b"GGATCGGCATCATTGC");
//! let stats = assembler.assemble()?;
//! println!("{} contigs", stats.contigs);
//! # Ok::<(), seqpack::SeqPackError>(())
//! ```

pub mod ac;
pub mod align;
pub mod assembler;
pub mod bloom;
pub mod cli;
pub mod cumdist;
pub mod dist;
pub mod error;
pub mod kmer;
pub mod kmerhash;
pub mod seqset;
pub mod twobit;

pub use assembler::{Assembler, AssemblerConfig, AssemblyStats, ReadAlignment};
pub use error::SeqPackError;
