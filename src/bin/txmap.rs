use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::info;
use tracing_subscriber::util::SubscriberInitExt;

use txcoord::cli;
use txcoord::config::TranscriptConfig;
use txcoord::error::Error;
use txcoord::transcript::{CoordinateMapper, Transcript};

#[derive(Parser)]
#[command(
    name = "txmap",
    about = "Map positions between genomic, cDNA, CDS and peptide coordinates of a transcript"
)]
struct Cli {
    /// Path to the JSON transcript configuration
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Log filter, e.g. "info" or "txcoord=debug"
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show exons, introns, coding region and UTR ranges
    Summary,
    /// Convert positions from one coordinate system to another
    Map {
        #[arg(long, value_enum)]
        from: System,
        #[arg(long, value_enum)]
        to: System,
        #[arg(required = true, allow_negative_numbers = true)]
        positions: Vec<i64>,
    },
    /// Print a sequence view of the transcript
    Seq {
        #[arg(long, value_enum, default_value_t = SeqKind::Cdna)]
        kind: SeqKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum System {
    Genomic,
    Cdna,
    Cds,
    Peptide,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeqKind {
    Cdna,
    Cds,
    Utr5,
    Utr3,
    Protein,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();
    init_logging(&cli_args.log_level)?;

    cli::banner("Transcript Coordinates");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = TranscriptConfig::from_file(&cli_args.config)?;
    cli::kv("Config", &cli_args.config.display().to_string());
    cli::kv(
        "FASTA",
        &cli::or_none(config.fasta.as_ref().map(|p| p.display())),
    );

    let sequences = config.load_sequences()?;
    info!("loaded {} sequence regions", sequences.len());
    let transcript = config.build_transcript(Arc::new(sequences))?;
    cli::success(&format!(
        "{} ({} exons, {})",
        transcript.id(),
        transcript.exon_count(),
        if transcript.is_coding() {
            "coding"
        } else {
            "non-coding"
        }
    ));

    eprintln!();

    match cli_args.command {
        Command::Summary => summary(&transcript)?,
        Command::Map { from, to, positions } => map_positions(&transcript, from, to, &positions),
        Command::Seq { kind } => print_sequence(&transcript, kind, &config)?,
    }

    cli::print_summary(start);
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn summary(transcript: &Transcript) -> Result<()> {
    let mapper = transcript.mapper();

    // ── Transcript ───────────────────────────────────────
    cli::section("Transcript");
    cli::kv("ID", transcript.id());
    cli::kv(
        "Location",
        &format!(
            "{}:{} ({})",
            transcript.seq_region(),
            cli::or_none(transcript.genomic_range()),
            transcript.strand()
        ),
    );
    cli::kv("cDNA length", &mapper.cdna_length().to_string());
    eprintln!();

    // ── Exons ────────────────────────────────────────────
    cli::section("Exons");
    let mut cdna_start = 1;
    for exon in transcript.exons() {
        let cdna_end = cdna_start + exon.length() - 1;
        cli::kv(
            &format!("{} {}", exon.rank(), exon.id()),
            &format!("{}  c.{cdna_start}..{cdna_end}", exon.range()),
        );
        cdna_start = cdna_end + 1;
    }
    eprintln!();

    // ── Introns ──────────────────────────────────────────
    cli::section("Introns");
    for intron in transcript.introns() {
        let intron = intron?;
        cli::kv(
            &format!(
                "{} / {}",
                intron.previous_exon().id(),
                intron.next_exon().id()
            ),
            &format!("{}  ({} bp)", intron.range(), intron.length()),
        );
    }
    eprintln!();

    // ── Coding Region ────────────────────────────────────
    cli::section("Coding Region");
    if transcript.is_coding() {
        cli::kv(
            "cDNA",
            &format!(
                "{}..{}",
                mapper.coding_region_cdna_start()?,
                mapper.coding_region_cdna_end()?
            ),
        );
        cli::kv("Genomic", &transcript.coding_region_genomic_range()?.to_string());
        cli::kv("5' UTR", &cli::or_none(transcript.five_prime_utr_range()?));
        cli::kv("3' UTR", &cli::or_none(transcript.three_prime_utr_range()?));
    } else {
        cli::warning("transcript has no coding region");
    }

    Ok(())
}

fn map_positions(transcript: &Transcript, from: System, to: System, positions: &[i64]) {
    let mapper = transcript.mapper();
    let mut failures = 0;
    for &pos in positions {
        match convert(&mapper, from, to, pos) {
            Ok(mapped) => println!("{pos}\t{mapped}"),
            Err(e) => {
                failures += 1;
                println!("{pos}\tNA");
                cli::warning(&format!("{pos}: {e}"));
            }
        }
    }
    if failures == 0 {
        cli::success(&format!("mapped {} positions", positions.len()));
    } else {
        eprintln!(
            "  {} of {} positions could not be mapped",
            failures.to_string().red(),
            positions.len()
        );
    }
}

/// Converts through genomic space, which every other system maps to directly.
fn convert(mapper: &CoordinateMapper<'_>, from: System, to: System, pos: i64) -> Result<i64, Error> {
    let genomic = match from {
        System::Genomic => pos,
        System::Cdna => mapper.cdna_to_genomic(pos)?,
        System::Cds => mapper.cds_to_genomic(pos)?,
        System::Peptide => mapper.pep_to_genomic(pos)?,
    };
    match to {
        System::Genomic => Ok(genomic),
        System::Cdna => mapper.genomic_to_cdna(genomic),
        System::Cds => mapper.genomic_to_cds(genomic),
        System::Peptide => mapper.genomic_to_pep(genomic),
    }
}

fn print_sequence(transcript: &Transcript, kind: SeqKind, config: &TranscriptConfig) -> Result<()> {
    let seq = match kind {
        SeqKind::Cdna => Some(transcript.seq()?.to_string()),
        SeqKind::Cds => Some(transcript.cds_seq()?),
        SeqKind::Utr5 => transcript.five_prime_utr_seq()?,
        SeqKind::Utr3 => transcript.three_prime_utr_seq()?,
        SeqKind::Protein => Some(transcript.protein_seq(&config.codon_table()?)?),
    };
    match seq {
        Some(seq) => {
            println!(">{} {kind:?}", transcript.id());
            println!("{seq}");
            cli::success(&format!("{} residues", seq.len()));
        }
        None => cli::warning(&format!("{kind:?} is empty for {}", transcript.id())),
    }
    Ok(())
}
