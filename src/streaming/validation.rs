//! Sort validation for streaming operations.
//!
//! The streaming resolver requires sorted input. Validation checks that:
//! 1. All records for a chromosome are contiguous (no interleaving)
//! 2. Within a chromosome, start positions are non-decreasing
//!
//! Any consistent chromosome order is accepted, so both byte order
//! (chr1, chr10, chr2...) and genome order (chr1, chr2, chr3...) pass.

use crate::bedgraph::BedGraphError;
use rustc_hash::FxHashSet;

/// Inline sort validator for use within streaming loops.
///
/// Validating while records are processed avoids reading the input twice.
#[derive(Debug, Default)]
pub struct SortValidator {
    prev_chrom: Option<String>,
    prev_start: u64,
    seen_chroms: FxHashSet<String>,
    record_count: usize,
}

impl SortValidator {
    /// Create a new sort validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that the given record maintains sort order.
    #[inline]
    pub fn validate(&mut self, chrom: &str, start: u64) -> Result<(), BedGraphError> {
        self.record_count += 1;

        match self.prev_chrom.as_deref() {
            Some(pc) if pc == chrom => {
                if start < self.prev_start {
                    return Err(BedGraphError::InvalidFormat(format!(
                        "Input not sorted: position {} at record {} comes after {} on {}",
                        start, self.record_count, self.prev_start, chrom
                    )));
                }
            }
            Some(pc) => {
                // Switching chromosomes - check we haven't seen this one before
                if self.seen_chroms.contains(chrom) {
                    return Err(BedGraphError::InvalidFormat(format!(
                        "Input not sorted: chromosome '{}' at record {} was seen earlier (chromosomes must be contiguous)",
                        chrom, self.record_count
                    )));
                }
                self.seen_chroms.insert(pc.to_string());
                self.prev_chrom = Some(chrom.to_string());
            }
            None => self.prev_chrom = Some(chrom.to_string()),
        }

        self.prev_start = start;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_input_passes() {
        let mut v = SortValidator::new();
        v.validate("chr1", 100).unwrap();
        v.validate("chr1", 100).unwrap();
        v.validate("chr1", 300).unwrap();
        v.validate("chr10", 50).unwrap();
        v.validate("chr2", 10).unwrap();
    }

    #[test]
    fn test_decreasing_start_fails() {
        let mut v = SortValidator::new();
        v.validate("chr1", 300).unwrap();
        let err = v.validate("chr1", 100).unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_interleaved_chroms_fail() {
        let mut v = SortValidator::new();
        v.validate("chr1", 100).unwrap();
        v.validate("chr2", 100).unwrap();
        assert!(v.validate("chr1", 500).is_err());
    }
}
