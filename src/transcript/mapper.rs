//! Coordinate transformation between genomic, cDNA, CDS and peptide space.
//!
//! # Coordinate System
//!
//! Every position is **1-based inclusive**. cDNA position 1 is the first
//! transcribed base, so on the reverse strand it is the *highest* genomic
//! coordinate of the first-ranked exon. CDS position 1 is the first base of the
//! start codon, i.e. cDNA position [`CoordinateMapper::coding_region_cdna_start`];
//! bases of the 5' UTR have CDS positions `<= 0`.
//!
//! The mapper walks exons in transcription order only. Strand never introduces a
//! second traversal: it selects how a 0-based offset inside an exon projects
//! onto the genome (see [`Strand::genomic_at`] and [`Strand::offset_of`]).

use std::sync::Arc;

use crate::error::Error;
use crate::strand::Strand;

use super::types::Exon;

/// A CDS boundary resolved against the exon list: the exon's index in
/// transcription order and a 1-based offset into that exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingMarker {
    pub exon_index: usize,
    pub offset: i64,
}

/// First and last coding base of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingMarkers {
    pub start: CodingMarker,
    pub end: CodingMarker,
}

/// Transformation engine over an exon chain.
///
/// `exons` must be in transcription (rank) order: ascending genomic position on
/// the forward strand, descending on the reverse strand. [`Transcript`] checks
/// this on construction.
///
/// [`Transcript`]: super::model::Transcript
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    exons: &'a [Arc<Exon>],
    strand: Strand,
    coding: Option<CodingMarkers>,
}

impl<'a> CoordinateMapper<'a> {
    #[must_use]
    pub fn new(exons: &'a [Arc<Exon>], strand: Strand) -> Self {
        Self {
            exons,
            strand,
            coding: None,
        }
    }

    #[must_use]
    pub fn with_coding(mut self, coding: Option<CodingMarkers>) -> Self {
        self.coding = coding;
        self
    }

    #[must_use]
    pub fn exons(&self) -> &'a [Arc<Exon>] {
        self.exons
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn is_coding(&self) -> bool {
        self.coding.is_some()
    }

    /// Total spliced length.
    #[must_use]
    pub fn cdna_length(&self) -> i64 {
        self.exons.iter().map(|e| e.length()).sum()
    }

    /// Lowest genomic coordinate covered by any exon.
    #[must_use]
    pub fn seq_region_start(&self) -> Option<i64> {
        self.exons.iter().map(|e| e.start()).min()
    }

    /// Highest genomic coordinate covered by any exon.
    #[must_use]
    pub fn seq_region_end(&self) -> Option<i64> {
        self.exons.iter().map(|e| e.end()).max()
    }

    /// The exon containing genomic `pos`, or `None` when `pos` is intronic.
    ///
    /// Positions outside the transcript's genomic span are an error.
    pub fn exon_for_genomic_position(&self, pos: i64) -> Result<Option<&'a Arc<Exon>>, Error> {
        Ok(self.genomic_index(pos)?.map(|i| &self.exons[i]))
    }

    /// The exon containing cDNA `pos`.
    pub fn exon_for_cdna_position(&self, pos: i64) -> Result<&'a Arc<Exon>, Error> {
        let (index, _) = self.locate_cdna(pos)?;
        Ok(&self.exons[index])
    }

    pub fn cdna_to_genomic(&self, pos: i64) -> Result<i64, Error> {
        let (index, offset) = self.locate_cdna(pos)?;
        Ok(self.exons[index].genomic_at(offset, self.strand))
    }

    pub fn genomic_to_cdna(&self, pos: i64) -> Result<i64, Error> {
        let index = self.genomic_index(pos)?.ok_or_else(|| {
            Error::OutOfRange(format!(
                "genomic position {pos} is intronic and has no cDNA position"
            ))
        })?;
        let exon = &self.exons[index];
        Ok(self.bases_before(index) + exon.offset_of(pos, self.strand) + 1)
    }

    /// cDNA position of the first coding base.
    pub fn coding_region_cdna_start(&self) -> Result<i64, Error> {
        let marker = self.coding()?.start;
        Ok(self.bases_before(marker.exon_index) + marker.offset)
    }

    /// cDNA position of the last coding base.
    pub fn coding_region_cdna_end(&self) -> Result<i64, Error> {
        let marker = self.coding()?.end;
        Ok(self.bases_before(marker.exon_index) + marker.offset)
    }

    pub fn cds_to_genomic(&self, pos: i64) -> Result<i64, Error> {
        let cdna_start = self.coding_region_cdna_start()?;
        let cdna = pos.checked_add(cdna_start - 1).ok_or_else(|| {
            Error::OutOfRange(format!("CDS position {pos} is outside the transcript"))
        })?;
        self.cdna_to_genomic(cdna)
    }

    pub fn genomic_to_cds(&self, pos: i64) -> Result<i64, Error> {
        let cdna_start = self.coding_region_cdna_start()?;
        Ok(self.genomic_to_cdna(pos)? - cdna_start + 1)
    }

    /// Lower genomic bound of the coding region, whatever the strand.
    pub fn coding_region_genomic_start(&self) -> Result<i64, Error> {
        let coding = self.coding()?;
        let marker = match self.strand {
            Strand::Forward => coding.start,
            Strand::Reverse => coding.end,
        };
        Ok(self.project(marker))
    }

    /// Upper genomic bound of the coding region, whatever the strand.
    pub fn coding_region_genomic_end(&self) -> Result<i64, Error> {
        let coding = self.coding()?;
        let marker = match self.strand {
            Strand::Forward => coding.end,
            Strand::Reverse => coding.start,
        };
        Ok(self.project(marker))
    }

    pub fn pep_to_genomic(&self, pos: i64) -> Result<i64, Error> {
        Err(Error::NotSupported(format!(
            "peptide to genomic conversion (peptide position {pos})"
        )))
    }

    pub fn genomic_to_pep(&self, pos: i64) -> Result<i64, Error> {
        Err(Error::NotSupported(format!(
            "genomic to peptide conversion (genomic position {pos})"
        )))
    }

    fn coding(&self) -> Result<&CodingMarkers, Error> {
        self.coding
            .as_ref()
            .ok_or_else(|| Error::NonCoding("transcript has no coding region".to_string()))
    }

    fn project(&self, marker: CodingMarker) -> i64 {
        self.exons[marker.exon_index].genomic_at(marker.offset - 1, self.strand)
    }

    /// Spliced length of all exons preceding `index`.
    fn bases_before(&self, index: usize) -> i64 {
        self.exons[..index].iter().map(|e| e.length()).sum()
    }

    fn genomic_index(&self, pos: i64) -> Result<Option<usize>, Error> {
        match (self.seq_region_start(), self.seq_region_end()) {
            (Some(start), Some(end)) if pos >= start && pos <= end => {
                Ok(self.exons.iter().position(|e| e.contains_genomic(pos)))
            }
            (Some(start), Some(end)) => Err(Error::OutOfRange(format!(
                "genomic position {pos} is outside transcript span {start}..{end}"
            ))),
            _ => Err(Error::OutOfRange(format!(
                "genomic position {pos}: transcript has no exons"
            ))),
        }
    }

    /// Exon index and 0-based offset (transcription direction) of cDNA `pos`.
    fn locate_cdna(&self, pos: i64) -> Result<(usize, i64), Error> {
        if pos >= 1 {
            let mut before = 0;
            for (index, exon) in self.exons.iter().enumerate() {
                if pos <= before + exon.length() {
                    return Ok((index, pos - before - 1));
                }
                before += exon.length();
            }
        }
        Err(Error::OutOfRange(format!(
            "cDNA position {pos} is outside 1..{}",
            self.cdna_length()
        )))
    }
}
