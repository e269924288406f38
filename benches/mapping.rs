use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use txcoord::sequence::RegionSequences;
use txcoord::strand::Strand;
use txcoord::transcript::{CdsBoundary, CodingRegion, Exon, Transcript};

const EXON_COUNT: u32 = 60;

/// Reverse-strand transcript with 60 exons of 150 bp separated by 850 bp introns.
fn build_transcript() -> Transcript {
    let exons: Vec<Exon> = (0..EXON_COUNT)
        .map(|i| {
            let start = 1_000_000 + i64::from(i) * 1000;
            let rank = EXON_COUNT - i;
            Exon::new(format!("E{rank}"), "chr1", start, start + 149, Strand::Reverse, rank).unwrap()
        })
        .collect();
    let coding = CodingRegion {
        start: CdsBoundary::new("E2", 40),
        end: CdsBoundary::new(format!("E{}", EXON_COUNT - 1), 90),
    };
    Transcript::new(
        "BENCH1",
        "chr1",
        Strand::Reverse,
        exons,
        Some(coding),
        Arc::new(RegionSequences::new()),
    )
    .unwrap()
}

fn bench_cdna_round_trip(c: &mut Criterion) {
    let transcript = build_transcript();
    let mapper = transcript.mapper();
    let length = mapper.cdna_length();

    c.bench_function("cdna->genomic->cdna (60 exons, all positions)", |b| {
        b.iter(|| {
            for pos in 1..=length {
                let g = mapper.cdna_to_genomic(pos).unwrap();
                assert_eq!(mapper.genomic_to_cdna(g).unwrap(), pos);
            }
        });
    });
}

fn bench_cds_mapping(c: &mut Criterion) {
    let transcript = build_transcript();
    let mapper = transcript.mapper();
    let cds_length =
        mapper.coding_region_cdna_end().unwrap() - mapper.coding_region_cdna_start().unwrap() + 1;

    c.bench_function("cds->genomic (60 exons, every codon start)", |b| {
        b.iter(|| {
            for pos in (1..=cds_length).step_by(3) {
                mapper.cds_to_genomic(pos).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_cdna_round_trip, bench_cds_mapping);
criterion_main!(benches);
