use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::codon::CodonTable;
use crate::sequence::{RegionSequences, SequenceProvider};
use crate::strand::Strand;
use crate::transcript::{CdsBoundary, CodingRegion, Exon, Transcript};

#[derive(Debug, Clone, Deserialize)]
pub struct ExonEntry {
    pub id: String,
    pub start: i64,
    pub end: i64,
    pub rank: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingEntry {
    pub start_exon: String,
    pub start_offset: i64,
    pub end_exon: String,
    pub end_offset: i64,
}

/// JSON description of one transcript and where to find its sequence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptConfig {
    pub transcript_id: String,
    pub seq_region: String,
    pub strand: i8,
    pub exons: Vec<ExonEntry>,
    pub coding_region: Option<CodingEntry>,
    /// FASTA (optionally gzipped); relative paths resolve against the config file.
    pub fasta: Option<PathBuf>,
    #[serde(default = "default_codon_table")]
    pub codon_table: u8,
}

fn default_codon_table() -> u8 {
    1
}

impl TranscriptConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;

        if let (Some(fasta), Some(dir)) = (config.fasta.as_mut(), path.parent()) {
            if fasta.is_relative() {
                *fasta = dir.join(&*fasta);
            }
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.transcript_id.trim().is_empty() {
            bail!("transcriptId must not be empty");
        }
        if self.seq_region.trim().is_empty() {
            bail!("seqRegion must not be empty");
        }
        self.strand()?;
        self.codon_table()?;
        for exon in &self.exons {
            if exon.id.trim().is_empty() {
                bail!("exon with rank {} has an empty id", exon.rank);
            }
        }
        Ok(())
    }

    pub fn strand(&self) -> Result<Strand> {
        Strand::try_from(self.strand).with_context(|| "invalid strand in config")
    }

    pub fn codon_table(&self) -> Result<CodonTable> {
        CodonTable::from_ncbi_id(self.codon_table).with_context(|| "invalid codonTable in config")
    }

    /// Sequence regions from the configured FASTA, or an empty set when none is given.
    pub fn load_sequences(&self) -> Result<RegionSequences> {
        match &self.fasta {
            Some(path) => RegionSequences::from_path(path)
                .with_context(|| format!("failed to load FASTA: {}", path.display())),
            None => Ok(RegionSequences::new()),
        }
    }

    pub fn build_transcript(&self, provider: Arc<dyn SequenceProvider>) -> Result<Transcript> {
        let strand = self.strand()?;
        let exons = self
            .exons
            .iter()
            .map(|e| Exon::new(&e.id, &self.seq_region, e.start, e.end, strand, e.rank))
            .collect::<Result<Vec<_>, _>>()?;
        let coding_region = self.coding_region.as_ref().map(|c| CodingRegion {
            start: CdsBoundary::new(&c.start_exon, c.start_offset),
            end: CdsBoundary::new(&c.end_exon, c.end_offset),
        });
        let transcript = Transcript::new(
            &self.transcript_id,
            &self.seq_region,
            strand,
            exons,
            coding_region,
            provider,
        )
        .with_context(|| format!("invalid transcript model: {}", self.transcript_id))?;
        Ok(transcript)
    }
}
