//! FASTA reader for genomic sequence regions.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// One FASTA record: the region name taken from the header and its bases.
pub type FastaRecord = (String, Vec<u8>);

/// Reads a FASTA file, decompressing it when the file name ends in `.gz`.
pub fn read_fasta_path(path: &Path) -> Result<Vec<FastaRecord>, Error> {
    let file = File::open(path)?;
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    if gzipped {
        parse_fasta_gz(file)
    } else {
        parse_fasta(BufReader::new(file))
    }
}

/// Reads gzip-compressed FASTA.
pub fn parse_fasta_gz<R: Read>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    parse_fasta(BufReader::new(GzDecoder::new(reader)))
}

/// Reads FASTA from a buffered reader. Bases are uppercased; line breaks and
/// surrounding whitespace are dropped.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    let mut records: Vec<FastaRecord> = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            let name = region_name(header).ok_or_else(|| {
                Error::Parse(format!("empty FASTA header (line {})", line_num + 1))
            })?;
            current = Some((name, Vec::new()));
        } else if let Some((_, bases)) = current.as_mut() {
            let start = bases.len();
            bases.extend_from_slice(line.trim().as_bytes());
            bases[start..].make_ascii_uppercase();
        } else if !line.trim().is_empty() {
            return Err(Error::Parse(format!(
                "sequence data before first FASTA header (line {})",
                line_num + 1
            )));
        }
    }

    records.extend(current);
    Ok(records)
}

/// Region name from a header line (without `>`).
///
/// NCBI pipe headers (`gi|123|ref|NC_000001.11|`, `ref|NC_000001.11|`) yield the
/// accession after `ref`; anything else yields the first whitespace token.
fn region_name(header: &str) -> Option<String> {
    let token = header.split_whitespace().next()?;
    let fields: Vec<&str> = token.split('|').collect();
    let name = fields
        .iter()
        .position(|f| *f == "ref")
        .and_then(|i| fields.get(i + 1))
        .filter(|acc| !acc.is_empty())
        .copied()
        .unwrap_or(token);
    Some(name.to_string())
}
