//! Transcript model: exons, introns, coordinate mapping and derived views.

pub mod intron;
pub mod mapper;
pub mod model;
pub mod types;

pub use intron::{ExonMembership, Intron};
pub use mapper::{CodingMarker, CodingMarkers, CoordinateMapper};
pub use model::{CdsBoundary, CodingRegion, Transcript};
pub use types::{Exon, GenomicRange};
