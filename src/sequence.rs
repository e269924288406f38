//! Genomic sequence access for transcript sequence assembly.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::Error;
use crate::fasta;
use crate::strand::Strand;

/// Source of nucleotide sequence for genomic regions.
///
/// `fetch_sequence` must return exactly `end - start + 1` bases for the closed,
/// 1-based interval `[start, end]`, reverse-complemented when `strand` is reverse.
pub trait SequenceProvider: Send + Sync {
    fn fetch_sequence(
        &self,
        seq_region: &str,
        start: i64,
        end: i64,
        strand: Strand,
    ) -> Result<String, Error>;
}

#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        _ => b'N',
    }
}

/// Reverse complement of a nucleotide sequence. Non-ACGT bases become `N`.
#[must_use]
pub fn reverse_complement(bases: &[u8]) -> Vec<u8> {
    bases.iter().rev().map(|&b| complement(b)).collect()
}

/// In-memory sequence regions indexed by name, typically loaded from FASTA.
#[derive(Debug, Default)]
pub struct RegionSequences {
    sequences: HashMap<String, Vec<u8>>,
}

impl RegionSequences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a FASTA file; `.gz` files are decompressed.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::from_records(fasta::read_fasta_path(path)?)
    }

    /// Build from a gzip-compressed FASTA stream.
    pub fn from_gz<R: Read>(reader: R) -> Result<Self, Error> {
        Self::from_records(fasta::parse_fasta_gz(reader)?)
    }

    fn from_records(records: Vec<fasta::FastaRecord>) -> Result<Self, Error> {
        let mut sequences = HashMap::with_capacity(records.len());
        for (name, bases) in records {
            if sequences.contains_key(&name) {
                return Err(Error::Parse(format!(
                    "duplicate sequence region in FASTA: {name}"
                )));
            }
            sequences.insert(name, bases);
        }
        debug!("loaded {} sequence regions", sequences.len());
        Ok(Self { sequences })
    }

    /// Add or replace a region.
    pub fn insert(&mut self, name: impl Into<String>, bases: impl Into<Vec<u8>>) {
        let mut bases = bases.into();
        bases.make_ascii_uppercase();
        self.sequences.insert(name.into(), bases);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.sequences.get(name).map(|v| v.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl SequenceProvider for RegionSequences {
    fn fetch_sequence(
        &self,
        seq_region: &str,
        start: i64,
        end: i64,
        strand: Strand,
    ) -> Result<String, Error> {
        let bases = self
            .get(seq_region)
            .ok_or_else(|| Error::Sequence(format!("unknown sequence region: {seq_region}")))?;

        let region_len = bases.len() as i64;
        if start < 1 || end > region_len || start > end {
            return Err(Error::OutOfRange(format!(
                "{seq_region}:{start}-{end} is outside 1..{region_len}"
            )));
        }

        let slice = &bases[(start - 1) as usize..end as usize];
        let bases = match strand {
            Strand::Forward => slice.to_vec(),
            Strand::Reverse => reverse_complement(slice),
        };
        String::from_utf8(bases)
            .map_err(|e| Error::Sequence(format!("{seq_region}: non-ASCII bases: {e}")))
    }
}
