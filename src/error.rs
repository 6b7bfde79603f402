//! Error types for seqpack.
//!
//! Invalid nucleotides are not errors: policy is to drop the read
//! silently. Alignment misses are not errors either; the read is simply
//! carried unaligned. What remains is configuration mistakes and I/O on
//! the contig emission path, which is fatal to a compression run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in seqpack operations.
#[derive(Debug, Error)]
pub enum SeqPackError {
    /// K-mer length is outside the representable range.
    #[error("invalid k-mer length {k}: must be between 1 and {max}")]
    InvalidKmerLength { k: usize, max: usize },

    /// Alignment seeds cannot be longer than assembly k-mers.
    #[error("alignment k-mer length {align_k} exceeds assembly k-mer length {assemble_k}")]
    AlignKmerTooLong { align_k: usize, assemble_k: usize },

    /// Failed to write the contig FASTA file.
    #[error("failed to write contig file '{path}': {source}")]
    ContigWrite {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to read an input sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SequenceRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to serialize the run summary.
    #[error("failed to serialize summary: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for SeqPackError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}
