//! txcoord: coordinate mapping between genomic, cDNA, CDS and peptide space for
//! transcripts modelled as exon chains.

pub mod error;

pub mod cli;
pub mod codon;
pub mod config;
pub mod fasta;
pub mod sequence;
pub mod strand;
pub mod transcript;
