//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::assembler::AssemblerConfig;

/// Assembly-based compressor core for short-read DNA sequencing data.
///
/// Reads are deduplicated, assembled into consensus contigs, and aligned
/// back against them; the contigs are written as FASTA and a run summary
/// can be emitted as JSON.
///
/// # Examples
///
/// ```bash
/// # Assemble reads with the default k-mer sizes
/// seqpack reads.fa
///
/// # Smaller k-mers for short reads, custom contig path
/// seqpack reads.fa -k 15 -a 9 --contigs out/contig.fa
///
/// # Machine-readable run summary
/// seqpack reads.fa --stats > summary.json
/// ```
#[derive(Parser, Debug)]
#[command(name = "seqpack")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Input FASTA file of reads
    pub path: PathBuf,

    /// Assembly k-mer length (1-32)
    #[arg(short = 'k', long, default_value = "25", value_parser = parse_k)]
    pub assemble_k: usize,

    /// Alignment seed length (1-32, at most the assembly k-mer length)
    #[arg(short = 'a', long, default_value = "15", value_parser = parse_k)]
    pub align_k: usize,

    /// Minimum read multiplicity for a contig seed
    #[arg(short = 'c', long, default_value = "2")]
    pub count_cutoff: u32,

    /// Contig FASTA output path
    #[arg(long, default_value = "contig.fa")]
    pub contigs: PathBuf,

    /// Print the run summary as JSON to stdout
    #[arg(long)]
    pub stats: bool,

    /// Suppress informational output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Assembler configuration implied by the flags.
    #[must_use]
    pub fn config(&self) -> AssemblerConfig {
        AssemblerConfig {
            assemble_k: self.assemble_k,
            align_k: self.align_k,
            count_cutoff: self.count_cutoff,
            contig_path: self.contigs.clone(),
            ..AssemblerConfig::default()
        }
    }
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    if k > 32 {
        return Err("k-mer length must be at most 32".to_string());
    }
    Ok(k)
}
