//! Transcript data model value types.

use std::fmt;

use crate::error::Error;
use crate::strand::Strand;

/// A closed genomic interval `[start, end]`, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenomicRange {
    pub start: i64,
    pub end: i64,
}

impl GenomicRange {
    /// Returns `None` for an empty interval (`start > end`).
    #[must_use]
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    #[must_use]
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    #[must_use]
    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }
}

impl fmt::Display for GenomicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A contiguous transcribed genomic interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exon {
    id: String,
    seq_region: String,
    start: i64,
    end: i64,
    strand: Strand,
    rank: u32,
}

impl Exon {
    pub fn new(
        id: impl Into<String>,
        seq_region: impl Into<String>,
        start: i64,
        end: i64,
        strand: Strand,
        rank: u32,
    ) -> Result<Self, Error> {
        let id = id.into();
        if start < 1 || start > end {
            return Err(Error::InvalidArgument(format!(
                "exon {id}: invalid genomic interval {start}..{end}"
            )));
        }
        Ok(Self {
            id,
            seq_region: seq_region.into(),
            start,
            end,
            strand,
            rank,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn seq_region(&self) -> &str {
        &self.seq_region
    }

    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn rank(&self) -> u32 {
        self.rank
    }

    #[must_use]
    pub fn length(&self) -> i64 {
        self.end - self.start + 1
    }

    #[must_use]
    pub fn contains_genomic(&self, pos: i64) -> bool {
        pos >= self.start && pos <= self.end
    }

    #[must_use]
    pub fn range(&self) -> GenomicRange {
        GenomicRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Genomic position of the base `offset` bases (0-based) into the exon, read in
    /// the transcription direction of `strand`.
    #[must_use]
    pub fn genomic_at(&self, offset: i64, strand: Strand) -> i64 {
        strand.genomic_at(self.start, self.end, offset)
    }

    /// 0-based offset of an exonic `pos` in the transcription direction of `strand`.
    #[must_use]
    pub fn offset_of(&self, pos: i64, strand: Strand) -> i64 {
        strand.offset_of(self.start, self.end, pos)
    }
}
