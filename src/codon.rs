//! Codon translation for coding sequences.

use crate::error::Error;

/// Translates nucleotide sequence into amino acids.
///
/// Stop codons are kept as `*`; callers trim them if needed.
pub trait Translate: Send + Sync {
    fn translate(&self, nucleotides: &str) -> String;
}

/// NCBI genetic code, amino acids listed in TCAG codon order
/// (TTT, TTC, TTA, TTG, TCT, ... GGG).
const STANDARD: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const VERTEBRATE_MITOCHONDRIAL: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG";

/// Lookup table from codon to amino acid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonTable {
    ncbi_id: u8,
    amino_acids: [u8; 64],
}

fn base_index(b: u8) -> Option<usize> {
    match b {
        b'T' | b't' | b'U' | b'u' => Some(0),
        b'C' | b'c' => Some(1),
        b'A' | b'a' => Some(2),
        b'G' | b'g' => Some(3),
        _ => None,
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        Self {
            ncbi_id: 1,
            amino_acids: *STANDARD,
        }
    }

    /// Vertebrate mitochondrial genetic code (NCBI translation table 2).
    #[must_use]
    pub fn mitochondrial() -> Self {
        Self {
            ncbi_id: 2,
            amino_acids: *VERTEBRATE_MITOCHONDRIAL,
        }
    }

    pub fn from_ncbi_id(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Self::standard()),
            2 => Ok(Self::mitochondrial()),
            _ => Err(Error::InvalidArgument(format!(
                "unsupported NCBI translation table: {id}"
            ))),
        }
    }

    #[must_use]
    pub fn ncbi_id(&self) -> u8 {
        self.ncbi_id
    }

    /// Amino acid for one codon; `X` for short or ambiguous codons.
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        let [a, b, c] = codon else {
            return b'X';
        };
        match (base_index(*a), base_index(*b), base_index(*c)) {
            (Some(a), Some(b), Some(c)) => self.amino_acids[a * 16 + b * 4 + c],
            _ => b'X',
        }
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl Translate for CodonTable {
    /// Codon-by-codon translation; a trailing partial codon becomes `X`.
    fn translate(&self, nucleotides: &str) -> String {
        nucleotides
            .as_bytes()
            .chunks(3)
            .map(|codon| self.translate_codon(codon) as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), b'M');
        for stop in [b"TAA", b"TAG", b"TGA"] {
            assert_eq!(table.translate_codon(stop), b'*');
        }
        assert_eq!(table.translate_codon(b"AUG"), b'M');
    }

    #[test]
    fn spot_checks_standard_table() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"TTT"), b'F');
        assert_eq!(table.translate_codon(b"AGA"), b'R');
        assert_eq!(table.translate_codon(b"ATA"), b'I');
        assert_eq!(table.translate_codon(b"TGG"), b'W');
        assert_eq!(table.translate_codon(b"GGG"), b'G');
        assert_eq!(table.translate_codon(b"aaa"), b'K');
    }

    #[test]
    fn mitochondrial_differences() {
        let table = CodonTable::from_ncbi_id(2).unwrap();
        assert_eq!(table.translate_codon(b"TGA"), b'W');
        assert_eq!(table.translate_codon(b"AGA"), b'*');
        assert_eq!(table.translate_codon(b"AGG"), b'*');
        assert_eq!(table.translate_codon(b"ATA"), b'M');
    }

    #[test]
    fn translate_keeps_stop_and_flags_partial_codon() {
        let table = CodonTable::default();
        assert_eq!(table.translate("ATGGCATGCTAA"), "MAC*");
        assert_eq!(table.translate("ATGGC"), "MX");
        assert_eq!(table.translate(""), "");
        assert_eq!(table.translate("ATNGGG"), "XG");
    }

    #[test]
    fn unknown_table_id() {
        assert!(matches!(
            CodonTable::from_ncbi_id(11),
            Err(Error::InvalidArgument(_))
        ));
    }
}
