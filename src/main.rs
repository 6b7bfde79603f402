#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io;
use std::process;

use bio::io::fasta;
use clap::Parser;
use colored::Colorize;
use seqpack::{
    cli::Args,
    error::SeqPackError,
    Assembler,
};

/// Initialize the tracing subscriber with environment filter.
///
/// Set `RUST_LOG=seqpack=debug` to see debug output.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = Args::parse();

    if !args.path.exists() {
        eprintln!(
            "{}\n {}",
            "Problem with arguments:".blue().bold(),
            format!("File not found: {}", args.path.display()).blue().bold()
        );
        process::exit(1);
    }

    if !args.quiet {
        eprintln!(
            "{}: {}",
            "reads".bold(),
            args.path.display().to_string().underline().bold().blue()
        );
        eprintln!(
            "{}: {}",
            "assemble-k".bold(),
            args.assemble_k.to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "align-k".bold(),
            args.align_k.to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "count-cutoff".bold(),
            args.count_cutoff.to_string().blue().bold()
        );
        eprintln!(
            "{}: {}",
            "contigs".bold(),
            args.contigs.display().to_string().blue().bold()
        );
        eprintln!();
    }

    if let Err(e) = run(&args) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SeqPackError> {
    let mut assembler = Assembler::new(args.config())?;

    let reader =
        fasta::Reader::from_file(&args.path).map_err(|e| SeqPackError::SequenceRead {
            source: io::Error::other(e.to_string()),
            path: args.path.clone(),
        })?;
    for record in reader.records() {
        let record = record.map_err(|e| SeqPackError::SequenceRead {
            source: io::Error::other(e.to_string()),
            path: args.path.clone(),
        })?;
        assembler.add_seq(record.seq());
    }

    let stats = assembler.assemble()?;

    if !args.quiet {
        eprintln!(
            "{}: {} reads ({} dropped), {} unique",
            "ingested".bold(),
            stats.reads.to_string().blue().bold(),
            stats.dropped_reads,
            stats.unique_reads.to_string().blue().bold()
        );
        eprintln!(
            "{}: {} contigs, {} bases",
            "assembled".bold(),
            stats.contigs.to_string().green().bold(),
            stats.contig_bases
        );
        eprintln!(
            "{}: {} aligned, {} unaligned",
            "aligned".bold(),
            stats.aligned_reads.to_string().green().bold(),
            stats.unaligned_reads
        );
    }

    if args.stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}
