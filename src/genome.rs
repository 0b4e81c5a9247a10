//! Chromosome sizes parser.
//!
//! Parses UCSC `.chrom.sizes` files (whitespace-delimited: chrom size).

use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bedgraph::BedGraphError;

/// Chromosome sizes for one assembly.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    sizes: FxHashMap<String, u64>,
}

impl Genome {
    /// Create an empty genome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load chromosome sizes from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BedGraphError> {
        let file = File::open(path)?;
        let mut genome = Self::new();

        for (line_num, line_result) in BufReader::new(file).lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_ascii_whitespace();
            let (Some(chrom), Some(size)) = (fields.next(), fields.next()) else {
                return Err(BedGraphError::Parse {
                    line: line_num + 1,
                    message: "Chrom sizes file requires two columns: chrom and size".to_string(),
                });
            };

            let size: u64 = size.parse().map_err(|_| BedGraphError::Parse {
                line: line_num + 1,
                message: format!("Invalid chromosome size: {}", size),
            })?;

            genome.insert(chrom.to_string(), size);
        }

        Ok(genome)
    }

    /// Get the size of a chromosome.
    #[inline]
    pub fn chrom_size(&self, chrom: &str) -> Option<u64> {
        self.sizes.get(chrom).copied()
    }

    /// Check if a chromosome exists.
    #[inline]
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.sizes.contains_key(chrom)
    }

    /// Get number of chromosomes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Insert a chromosome size; a repeated name replaces the earlier size.
    pub fn insert(&mut self, chrom: String, size: u64) {
        self.sizes.insert(chrom, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_genome_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t248956422").unwrap();
        writeln!(file, "chr2 242193529").unwrap();
        writeln!(file, "# comment line").unwrap();
        writeln!(file, "chrUn_KI270302v1\t2274").unwrap();

        let genome = Genome::from_file(file.path()).unwrap();

        assert_eq!(genome.chrom_size("chr1"), Some(248956422));
        assert_eq!(genome.chrom_size("chr2"), Some(242193529));
        assert_eq!(genome.chrom_size("chrUn_KI270302v1"), Some(2274));
        assert_eq!(genome.chrom_size("chr4"), None);
        assert_eq!(genome.len(), 3);
    }

    #[test]
    fn test_genome_bad_size() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\tlots").unwrap();

        let err = Genome::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BedGraphError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_comment_only_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# no sizes here").unwrap();

        let genome = Genome::from_file(file.path()).unwrap();
        assert!(genome.is_empty());
        assert_eq!(genome.len(), 0);
    }

    #[test]
    fn test_genome_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1").unwrap();

        assert!(Genome::from_file(file.path()).is_err());
    }

    #[test]
    fn test_duplicate_replaces_size() {
        let mut genome = Genome::new();
        genome.insert("chr1".to_string(), 1000);
        genome.insert("chr2".to_string(), 500);
        genome.insert("chr1".to_string(), 2000);

        assert!(genome.has_chrom("chr1"));
        assert!(!genome.has_chrom("chr3"));
        assert_eq!(genome.chrom_size("chr1"), Some(2000));
        assert_eq!(genome.len(), 2);
    }
}
