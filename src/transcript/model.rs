//! Transcript: an ordered exon chain with optional coding region.
//!
//! Coordinate math is delegated to [`CoordinateMapper`]; this type adds the
//! derived views that need more than positions (introns, spliced sequence,
//! UTRs, protein).

use std::fmt;
use std::sync::{Arc, OnceLock};

use log::{debug, warn};

use crate::codon::Translate;
use crate::error::Error;
use crate::sequence::SequenceProvider;
use crate::strand::Strand;

use super::intron::{ExonMembership, Intron};
use super::mapper::{CodingMarker, CodingMarkers, CoordinateMapper};
use super::types::{Exon, GenomicRange};

/// A CDS boundary as annotated: exon id plus 1-based offset into that exon's
/// sequence in transcription direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsBoundary {
    pub exon_id: String,
    pub offset: i64,
}

impl CdsBoundary {
    pub fn new(exon_id: impl Into<String>, offset: i64) -> Self {
        Self {
            exon_id: exon_id.into(),
            offset,
        }
    }
}

/// First and last coding base of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingRegion {
    pub start: CdsBoundary,
    pub end: CdsBoundary,
}

pub struct Transcript {
    id: String,
    seq_region: String,
    strand: Strand,
    exons: Vec<Arc<Exon>>,
    coding: Option<CodingMarkers>,
    provider: Arc<dyn SequenceProvider>,
    seq: OnceLock<String>,
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("id", &self.id)
            .field("seq_region", &self.seq_region)
            .field("strand", &self.strand)
            .field("exons", &self.exons)
            .field("coding", &self.coding)
            .finish_non_exhaustive()
    }
}

impl Transcript {
    /// Build a transcript from its exons (any order; sorted here by rank).
    ///
    /// Exons must sit on `seq_region` and `strand`, carry unique ranks, and rank
    /// order must follow the direction of transcription without overlaps. CDS
    /// boundaries must name exons of this transcript with offsets inside them.
    pub fn new(
        id: impl Into<String>,
        seq_region: impl Into<String>,
        strand: Strand,
        exons: Vec<Exon>,
        coding_region: Option<CodingRegion>,
        provider: Arc<dyn SequenceProvider>,
    ) -> Result<Self, Error> {
        let id = id.into();
        let seq_region = seq_region.into();

        let mut exons = exons;
        exons.sort_by_key(|e| e.rank());
        for exon in &exons {
            if exon.seq_region() != seq_region || exon.strand() != strand {
                return Err(Error::InvalidArgument(format!(
                    "transcript {id}: exon {} is on {}({}), expected {seq_region}({strand})",
                    exon.id(),
                    exon.seq_region(),
                    exon.strand()
                )));
            }
        }
        for pair in exons.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if previous.rank() == next.rank() {
                return Err(Error::InvalidArgument(format!(
                    "transcript {id}: exons {} and {} share rank {}",
                    previous.id(),
                    next.id(),
                    next.rank()
                )));
            }
            let in_order = match strand {
                Strand::Forward => next.start() > previous.end(),
                Strand::Reverse => next.end() < previous.start(),
            };
            if !in_order {
                return Err(Error::InvalidArgument(format!(
                    "transcript {id}: exon {} ({}) overlaps or precedes exon {} ({}) on the {strand} strand",
                    next.id(),
                    next.range(),
                    previous.id(),
                    previous.range()
                )));
            }
        }
        let exons: Vec<Arc<Exon>> = exons.into_iter().map(Arc::new).collect();

        let coding = coding_region
            .map(|region| resolve_coding(&id, &exons, strand, &region))
            .transpose()?;

        debug!(
            "transcript {id}: {} exons on {seq_region}({strand}), coding: {}",
            exons.len(),
            coding.is_some()
        );

        Ok(Self {
            id,
            seq_region,
            strand,
            exons,
            coding,
            provider,
            seq: OnceLock::new(),
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
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Exons in rank order.
    #[must_use]
    pub fn exons(&self) -> &[Arc<Exon>] {
        &self.exons
    }

    #[must_use]
    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    #[must_use]
    pub fn is_coding(&self) -> bool {
        self.coding.is_some()
    }

    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper<'_> {
        CoordinateMapper::new(&self.exons, self.strand).with_coding(self.coding)
    }

    /// Genomic span from the lowest exon start to the highest exon end.
    #[must_use]
    pub fn genomic_range(&self) -> Option<GenomicRange> {
        let mapper = self.mapper();
        GenomicRange::new(mapper.seq_region_start()?, mapper.seq_region_end()?)
    }

    pub fn coding_region_genomic_range(&self) -> Result<GenomicRange, Error> {
        let mapper = self.mapper();
        Ok(GenomicRange {
            start: mapper.coding_region_genomic_start()?,
            end: mapper.coding_region_genomic_end()?,
        })
    }

    /// Introns between consecutive exons, in rank order.
    ///
    /// Every call starts a fresh traversal. A pair that is not adjacent by rank or
    /// leaves no intronic bases yields [`Error::InvariantViolation`].
    pub fn introns(&self) -> impl Iterator<Item = Result<Intron, Error>> + '_ {
        let membership = ExonMembership::from_transcript(self);
        self.exons.windows(2).map(move |pair| {
            Intron::between(&pair[0], &pair[1], &membership).map_err(|e| {
                warn!("transcript {}: bad exon pair: {e}", self.id);
                Error::InvariantViolation(format!("transcript {}: {e}", self.id))
            })
        })
    }

    /// Spliced transcript sequence in transcription orientation.
    ///
    /// Fetched once through the sequence provider and cached.
    pub fn seq(&self) -> Result<&str, Error> {
        if let Some(seq) = self.seq.get() {
            return Ok(seq.as_str());
        }

        let mut seq = String::with_capacity(self.mapper().cdna_length() as usize);
        for exon in &self.exons {
            debug!(
                "transcript {}: fetching {}:{}-{}({})",
                self.id,
                exon.seq_region(),
                exon.start(),
                exon.end(),
                self.strand
            );
            let bases =
                self.provider
                    .fetch_sequence(exon.seq_region(), exon.start(), exon.end(), self.strand)?;
            if bases.len() as i64 != exon.length() {
                return Err(Error::Sequence(format!(
                    "exon {}: provider returned {} bases, expected {}",
                    exon.id(),
                    bases.len(),
                    exon.length()
                )));
            }
            seq.push_str(&bases);
        }

        Ok(self.seq.get_or_init(|| seq).as_str())
    }

    /// Coding sequence, cDNA `coding_region_cdna_start..=coding_region_cdna_end`.
    pub fn cds_seq(&self) -> Result<String, Error> {
        let (start, end) = self.coding_cdna_bounds()?;
        self.cdna_slice(start, end)
    }

    /// Bases before the coding region; `None` when empty or non-coding.
    pub fn five_prime_utr_seq(&self) -> Result<Option<String>, Error> {
        if !self.is_coding() {
            return Ok(None);
        }
        let (start, _) = self.coding_cdna_bounds()?;
        if start <= 1 {
            return Ok(None);
        }
        self.cdna_slice(1, start - 1).map(Some)
    }

    /// Bases after the coding region; `None` when empty or non-coding.
    pub fn three_prime_utr_seq(&self) -> Result<Option<String>, Error> {
        if !self.is_coding() {
            return Ok(None);
        }
        let (_, end) = self.coding_cdna_bounds()?;
        let length = self.mapper().cdna_length();
        if end >= length {
            return Ok(None);
        }
        self.cdna_slice(end + 1, length).map(Some)
    }

    /// Genomic range of the 5' UTR; at the high end of the span on the reverse strand.
    pub fn five_prime_utr_range(&self) -> Result<Option<GenomicRange>, Error> {
        let Some((span, cds)) = self.span_and_cds()? else {
            return Ok(None);
        };
        Ok(match self.strand {
            Strand::Forward => GenomicRange::new(span.start, cds.start - 1),
            Strand::Reverse => GenomicRange::new(cds.end + 1, span.end),
        })
    }

    /// Genomic range of the 3' UTR; at the low end of the span on the reverse strand.
    pub fn three_prime_utr_range(&self) -> Result<Option<GenomicRange>, Error> {
        let Some((span, cds)) = self.span_and_cds()? else {
            return Ok(None);
        };
        Ok(match self.strand {
            Strand::Forward => GenomicRange::new(cds.end + 1, span.end),
            Strand::Reverse => GenomicRange::new(span.start, cds.start - 1),
        })
    }

    pub fn protein_seq(&self, translator: &dyn Translate) -> Result<String, Error> {
        Ok(translator.translate(&self.cds_seq()?))
    }

    fn coding_cdna_bounds(&self) -> Result<(i64, i64), Error> {
        if !self.is_coding() {
            return Err(Error::NonCoding(format!("transcript {}", self.id)));
        }
        let mapper = self.mapper();
        Ok((
            mapper.coding_region_cdna_start()?,
            mapper.coding_region_cdna_end()?,
        ))
    }

    fn span_and_cds(&self) -> Result<Option<(GenomicRange, GenomicRange)>, Error> {
        match self.genomic_range() {
            Some(span) if self.is_coding() => Ok(Some((span, self.coding_region_genomic_range()?))),
            _ => Ok(None),
        }
    }

    /// 1-based inclusive slice of the spliced sequence.
    fn cdna_slice(&self, start: i64, end: i64) -> Result<String, Error> {
        let seq = self.seq()?;
        let range = (start - 1) as usize..end as usize;
        seq.get(range).map(str::to_string).ok_or_else(|| {
            Error::OutOfRange(format!(
                "transcript {}: cDNA {start}..{end} outside sequence of length {}",
                self.id,
                seq.len()
            ))
        })
    }
}

/// Resolve exon-id based CDS boundaries to exon indices and check them.
fn resolve_coding(
    transcript_id: &str,
    exons: &[Arc<Exon>],
    strand: Strand,
    region: &CodingRegion,
) -> Result<CodingMarkers, Error> {
    let resolve = |boundary: &CdsBoundary, which: &str| -> Result<CodingMarker, Error> {
        let exon_index = exons
            .iter()
            .position(|e| e.id() == boundary.exon_id)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "transcript {transcript_id}: CDS {which} exon {} is not part of the transcript",
                    boundary.exon_id
                ))
            })?;
        let length = exons[exon_index].length();
        if boundary.offset < 1 || boundary.offset > length {
            return Err(Error::InvalidArgument(format!(
                "transcript {transcript_id}: CDS {which} offset {} outside exon {} (1..{length})",
                boundary.offset, boundary.exon_id
            )));
        }
        Ok(CodingMarker {
            exon_index,
            offset: boundary.offset,
        })
    };

    let markers = CodingMarkers {
        start: resolve(&region.start, "start")?,
        end: resolve(&region.end, "end")?,
    };

    let mapper = CoordinateMapper::new(exons, strand).with_coding(Some(markers));
    let (cdna_start, cdna_end) = (
        mapper.coding_region_cdna_start()?,
        mapper.coding_region_cdna_end()?,
    );
    if cdna_start > cdna_end {
        return Err(Error::InvalidArgument(format!(
            "transcript {transcript_id}: CDS start (cDNA {cdna_start}) is after CDS end (cDNA {cdna_end})"
        )));
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::CodonTable;
    use crate::sequence::RegionSequences;

    /// 300 bases; position p (1-based) holds "ACGT"[(p - 1) % 4] except a start
    /// codon at 109..=111 and a stop codon at 217..=219.
    fn provider() -> Arc<dyn SequenceProvider> {
        let mut bases: Vec<u8> = (0..300).map(|i| b"ACGT"[i % 4]).collect();
        bases[108..111].copy_from_slice(b"ATG");
        bases[216..219].copy_from_slice(b"TAA");
        let mut seqs = RegionSequences::new();
        seqs.insert("chr1", bases);
        Arc::new(seqs)
    }

    fn exon(id: &str, start: i64, end: i64, strand: Strand, rank: u32) -> Exon {
        Exon::new(id, "chr1", start, end, strand, rank).unwrap()
    }

    fn coding(start: (&str, i64), end: (&str, i64)) -> Option<CodingRegion> {
        Some(CodingRegion {
            start: CdsBoundary::new(start.0, start.1),
            end: CdsBoundary::new(end.0, end.1),
        })
    }

    fn forward() -> Transcript {
        Transcript::new(
            "T1",
            "chr1",
            Strand::Forward,
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E2", 200, 249, Strand::Forward, 2),
            ],
            coding(("E1", 10), ("E2", 20)),
            provider(),
        )
        .unwrap()
    }

    fn reverse() -> Transcript {
        Transcript::new(
            "T2",
            "chr1",
            Strand::Reverse,
            vec![
                exon("E2", 100, 149, Strand::Reverse, 2),
                exon("E1", 200, 249, Strand::Reverse, 1),
            ],
            coding(("E1", 10), ("E2", 20)),
            provider(),
        )
        .unwrap()
    }

    #[test]
    fn forward_worked_example() {
        let tx = forward();
        let mapper = tx.mapper();
        assert_eq!(mapper.coding_region_cdna_start().unwrap(), 10);
        assert_eq!(mapper.coding_region_cdna_end().unwrap(), 70);
        assert_eq!(mapper.coding_region_genomic_start().unwrap(), 109);
        assert_eq!(mapper.coding_region_genomic_end().unwrap(), 219);

        let introns: Vec<Intron> = tx.introns().collect::<Result<_, _>>().unwrap();
        assert_eq!(introns.len(), 1);
        assert_eq!(introns[0].start(), 150);
        assert_eq!(introns[0].end(), 199);
        assert_eq!(introns[0].transcript_id(), "T1");
    }

    #[test]
    fn reverse_first_cdna_base_is_high_end() {
        let tx = reverse();
        assert_eq!(tx.exons()[0].id(), "E1");
        assert_eq!(tx.mapper().cdna_to_genomic(1).unwrap(), 249);
    }

    #[test]
    fn introns_are_restartable() {
        let tx = forward();
        assert_eq!(tx.introns().count(), 1);
        assert_eq!(tx.introns().count(), 1);
    }

    #[test]
    fn sequence_views_forward() {
        let tx = forward();
        let seq = tx.seq().unwrap();
        assert_eq!(seq.len(), 100);

        let cds = tx.cds_seq().unwrap();
        assert_eq!(cds.len(), 61);
        assert!(cds.starts_with("ATG"));
        assert!(cds.ends_with("TAA"));

        let utr5 = tx.five_prime_utr_seq().unwrap().unwrap();
        let utr3 = tx.three_prime_utr_seq().unwrap().unwrap();
        assert_eq!(utr5.len(), 9);
        assert_eq!(utr3.len(), 30);
        assert_eq!(format!("{utr5}{cds}{utr3}"), seq);
    }

    #[test]
    fn protein_translation() {
        let tx = forward();
        let protein = tx.protein_seq(&CodonTable::standard()).unwrap();
        assert_eq!(protein.len(), 21);
        assert!(protein.starts_with('M'));
        assert!(protein.ends_with("X"));
    }

    #[test]
    fn reverse_sequence_is_reverse_complemented() {
        let tx = reverse();
        let seq = tx.seq().unwrap().to_string();
        let plus = provider().fetch_sequence("chr1", 200, 249, Strand::Forward).unwrap();
        let expected = String::from_utf8(crate::sequence::reverse_complement(plus.as_bytes())).unwrap();
        assert!(seq.starts_with(&expected));
    }

    #[test]
    fn utr_ranges_forward() {
        let tx = forward();
        assert_eq!(
            tx.five_prime_utr_range().unwrap(),
            Some(GenomicRange { start: 100, end: 108 })
        );
        assert_eq!(
            tx.three_prime_utr_range().unwrap(),
            Some(GenomicRange { start: 220, end: 249 })
        );
    }

    #[test]
    fn utr_ranges_reverse() {
        let tx = reverse();
        // CDS genomic bounds 130..=240
        assert_eq!(
            tx.five_prime_utr_range().unwrap(),
            Some(GenomicRange { start: 241, end: 249 })
        );
        assert_eq!(
            tx.three_prime_utr_range().unwrap(),
            Some(GenomicRange { start: 100, end: 129 })
        );
    }

    #[test]
    fn empty_utrs_are_none() {
        let tx = Transcript::new(
            "T3",
            "chr1",
            Strand::Forward,
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E2", 200, 249, Strand::Forward, 2),
            ],
            coding(("E1", 1), ("E2", 50)),
            provider(),
        )
        .unwrap();
        assert!(tx.five_prime_utr_seq().unwrap().is_none());
        assert!(tx.three_prime_utr_seq().unwrap().is_none());
        assert!(tx.five_prime_utr_range().unwrap().is_none());
        assert!(tx.three_prime_utr_range().unwrap().is_none());
        assert_eq!(tx.cds_seq().unwrap().len(), 100);
    }

    #[test]
    fn empty_transcript() {
        let tx = Transcript::new("T0", "chr1", Strand::Forward, vec![], None, provider()).unwrap();
        assert_eq!(tx.introns().count(), 0);
        assert_eq!(tx.seq().unwrap(), "");
        assert!(tx.genomic_range().is_none());
        assert!(tx.five_prime_utr_range().unwrap().is_none());
        assert!(tx.three_prime_utr_seq().unwrap().is_none());
    }

    #[test]
    fn non_coding_transcript() {
        let tx = Transcript::new(
            "T4",
            "chr1",
            Strand::Forward,
            vec![exon("E1", 100, 149, Strand::Forward, 1)],
            None,
            provider(),
        )
        .unwrap();
        assert!(matches!(tx.cds_seq(), Err(Error::NonCoding(_))));
        assert!(tx.five_prime_utr_seq().unwrap().is_none());
        assert!(tx.three_prime_utr_range().unwrap().is_none());
        assert!(tx.protein_seq(&CodonTable::standard()).is_err());
    }

    #[test]
    fn skipped_rank_is_an_invariant_violation() {
        let tx = Transcript::new(
            "T5",
            "chr1",
            Strand::Forward,
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E3", 200, 249, Strand::Forward, 3),
            ],
            None,
            provider(),
        )
        .unwrap();
        let results: Vec<_> = tx.introns().collect();
        assert!(matches!(results[0], Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn back_to_back_exons_are_an_invariant_violation() {
        let tx = Transcript::new(
            "T6",
            "chr1",
            Strand::Forward,
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E2", 150, 199, Strand::Forward, 2),
            ],
            None,
            provider(),
        )
        .unwrap();
        assert!(matches!(
            tx.introns().next(),
            Some(Err(Error::InvariantViolation(_)))
        ));
    }

    #[test]
    fn rejects_out_of_order_exons() {
        let err = Transcript::new(
            "T7",
            "chr1",
            Strand::Reverse,
            vec![
                exon("E1", 100, 149, Strand::Reverse, 1),
                exon("E2", 200, 249, Strand::Reverse, 2),
            ],
            None,
            provider(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_strand_mismatch_and_duplicate_rank() {
        let mismatch = Transcript::new(
            "T8",
            "chr1",
            Strand::Forward,
            vec![exon("E1", 100, 149, Strand::Reverse, 1)],
            None,
            provider(),
        );
        assert!(matches!(mismatch, Err(Error::InvalidArgument(_))));

        let duplicate = Transcript::new(
            "T9",
            "chr1",
            Strand::Forward,
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E2", 200, 249, Strand::Forward, 1),
            ],
            None,
            provider(),
        );
        assert!(matches!(duplicate, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn rejects_bad_cds_markers() {
        let exons = || {
            vec![
                exon("E1", 100, 149, Strand::Forward, 1),
                exon("E2", 200, 249, Strand::Forward, 2),
            ]
        };
        for region in [
            coding(("EX", 1), ("E2", 20)),
            coding(("E1", 0), ("E2", 20)),
            coding(("E1", 10), ("E2", 51)),
            coding(("E2", 10), ("E1", 20)),
        ] {
            let result = Transcript::new("T", "chr1", Strand::Forward, exons(), region, provider());
            assert!(matches!(result, Err(Error::InvalidArgument(_))));
        }
    }

    #[test]
    fn short_provider_response_is_an_error() {
        struct Short;
        impl SequenceProvider for Short {
            fn fetch_sequence(&self, _: &str, _: i64, _: i64, _: Strand) -> Result<String, Error> {
                Ok("A".to_string())
            }
        }
        let tx = Transcript::new(
            "T10",
            "chr1",
            Strand::Forward,
            vec![exon("E1", 100, 149, Strand::Forward, 1)],
            None,
            Arc::new(Short),
        )
        .unwrap();
        assert!(matches!(tx.seq(), Err(Error::Sequence(_))));
    }

    #[test]
    fn transcript_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transcript>();

        let tx = Arc::new(forward());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tx = Arc::clone(&tx);
                std::thread::spawn(move || tx.seq().unwrap().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 100);
        }
    }
}
