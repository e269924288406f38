//! Introns derived from pairs of adjacent exons.
//!
//! Adjacency is judged against an explicit exon → transcript membership table
//! rather than by walking relations: callers register which transcripts use an
//! exon, and at which rank, before asking for the intron between two exons.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::strand::Strand;

use super::model::Transcript;
use super::types::{Exon, GenomicRange};

/// One transcript's use of an exon.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Membership {
    transcript_id: String,
    rank: u32,
}

/// Exon id → transcripts containing the exon, with the exon's rank in each.
#[derive(Debug, Clone, Default)]
pub struct ExonMembership {
    by_exon: HashMap<String, Vec<Membership>>,
}

impl ExonMembership {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership of every exon of a single transcript.
    #[must_use]
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let mut membership = Self::new();
        membership.add_transcript(transcript);
        membership
    }

    pub fn add_transcript(&mut self, transcript: &Transcript) {
        for exon in transcript.exons() {
            self.register(transcript.id(), exon.id(), exon.rank());
        }
    }

    /// Record that `exon_id` is the `rank`-th exon of `transcript_id`. Re-registering
    /// the same pair replaces the earlier rank.
    pub fn register(&mut self, transcript_id: &str, exon_id: &str, rank: u32) {
        let records = self.by_exon.entry(exon_id.to_string()).or_default();
        match records.iter_mut().find(|m| m.transcript_id == transcript_id) {
            Some(existing) => existing.rank = rank,
            None => records.push(Membership {
                transcript_id: transcript_id.to_string(),
                rank,
            }),
        }
    }

    /// Transcripts containing `exon_id` as `(transcript_id, rank)`, in registration order.
    pub fn transcripts_of<'a>(
        &'a self,
        exon_id: &str,
    ) -> impl Iterator<Item = (&'a str, u32)> + use<'a> {
        self.by_exon
            .get(exon_id)
            .into_iter()
            .flatten()
            .map(|m| (m.transcript_id.as_str(), m.rank))
    }

    fn rank_in(&self, exon_id: &str, transcript_id: &str) -> Option<u32> {
        self.transcripts_of(exon_id)
            .find(|(tid, _)| *tid == transcript_id)
            .map(|(_, rank)| rank)
    }
}

/// The genomic gap between two consecutive exons of a transcript.
#[derive(Debug, Clone)]
pub struct Intron {
    seq_region: String,
    start: i64,
    end: i64,
    strand: Strand,
    previous_exon: Arc<Exon>,
    next_exon: Arc<Exon>,
    transcript_id: String,
}

impl Intron {
    /// Build the intron between two exons, given in either order.
    ///
    /// The exons must share at least one transcript in `membership`, and in one
    /// of those shared transcripts their ranks must differ by exactly one.
    pub fn between(
        first: &Arc<Exon>,
        second: &Arc<Exon>,
        membership: &ExonMembership,
    ) -> Result<Self, Error> {
        let shared: Vec<&str> = membership
            .transcripts_of(first.id())
            .map(|(tid, _)| tid)
            .filter(|tid| membership.rank_in(second.id(), tid).is_some())
            .collect();
        if shared.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "exons {} and {} are not two exons of a common transcript",
                first.id(),
                second.id()
            )));
        }

        let adjacent_in = shared.into_iter().find(|tid| {
            match (
                membership.rank_in(first.id(), tid),
                membership.rank_in(second.id(), tid),
            ) {
                (Some(a), Some(b)) => a.abs_diff(b) == 1,
                _ => false,
            }
        });

        match adjacent_in {
            Some(tid) => Self::span(tid, first, second),
            None => Err(Error::InvalidArgument(format!(
                "exons {} and {} are not adjacent in any common transcript",
                first.id(),
                second.id()
            ))),
        }
    }

    /// Intron spanning the gap between two exons already known to be adjacent in
    /// `transcript_id`. Rejects exons on different regions and empty spans.
    fn span(
        transcript_id: &str,
        first: &Arc<Exon>,
        second: &Arc<Exon>,
    ) -> Result<Self, Error> {
        if first.seq_region() != second.seq_region() {
            return Err(Error::InvalidArgument(format!(
                "exons {} and {} lie on different sequence regions",
                first.id(),
                second.id()
            )));
        }

        let (previous, next) = if first.start() <= second.start() {
            (first, second)
        } else {
            (second, first)
        };

        let start = previous.end() + 1;
        let end = next.start() - 1;
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "exons {} and {} leave no intronic bases between them ({}..{})",
                previous.id(),
                next.id(),
                start,
                end
            )));
        }

        Ok(Self {
            seq_region: previous.seq_region().to_string(),
            start,
            end,
            strand: previous.strand(),
            previous_exon: Arc::clone(previous),
            next_exon: Arc::clone(next),
            transcript_id: transcript_id.to_string(),
        })
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

    /// Exon with the lower genomic start.
    #[must_use]
    pub fn previous_exon(&self) -> &Arc<Exon> {
        &self.previous_exon
    }

    /// Exon with the higher genomic start.
    #[must_use]
    pub fn next_exon(&self) -> &Arc<Exon> {
        &self.next_exon
    }

    #[must_use]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
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
}
