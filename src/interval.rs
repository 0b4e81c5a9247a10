//! Core signal interval type for bedGraph records.

use std::cmp::Ordering;
use std::fmt;

/// A genomic signal interval: chromosome, start, end and value.
/// Uses 0-based, half-open coordinates (bedGraph format).
#[derive(Debug, Clone, PartialEq)]
pub struct SignalInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub value: f64,
}

impl SignalInterval {
    /// Create a new interval.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, value: f64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            value,
        }
    }

    /// Returns true if the interval covers no bases.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Compare by chromosome bytes, then start (`sort -k1,1 -k2,2n` order).
    #[inline]
    pub fn cmp_position(&self, other: &SignalInterval) -> Ordering {
        self.chrom
            .as_bytes()
            .cmp(other.chrom.as_bytes())
            .then(self.start.cmp(&other.start))
    }
}

/// Same text as [`BedGraphWriter`](crate::streaming::BedGraphWriter) emits.
impl fmt::Display for SignalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = ryu::Buffer::new();
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chrom,
            self.start,
            self.end,
            value.format(self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(!SignalInterval::new("chr1", 100, 101, 0.0).is_empty());
        assert!(SignalInterval::new("chr1", 100, 100, 0.0).is_empty());
        assert!(SignalInterval::new("chr1", 200, 100, 0.0).is_empty());
    }

    #[test]
    fn test_position_ordering() {
        let mut intervals = [
            SignalInterval::new("chr2", 100, 200, 1.0),
            SignalInterval::new("chr10", 300, 400, 2.0),
            SignalInterval::new("chr1", 200, 300, 3.0),
            SignalInterval::new("chr1", 100, 200, 4.0),
        ];
        intervals.sort_by(|a, b| a.cmp_position(b));

        assert_eq!(intervals[0].start, 100);
        assert_eq!(intervals[1].start, 200);
        // Byte order: chr10 sorts before chr2
        assert_eq!(intervals[2].chrom, "chr10");
        assert_eq!(intervals[3].chrom, "chr2");
    }

    #[test]
    fn test_display() {
        let iv = SignalInterval::new("chrX", 5, 10, 0.25);
        assert_eq!(iv.to_string(), "chrX\t5\t10\t0.25");
    }

    #[test]
    fn test_display_matches_writer() {
        let iv = SignalInterval::new("chr1", 100, 200, 5.0);
        let mut out = Vec::new();
        crate::bedgraph::write_intervals(&mut out, std::slice::from_ref(&iv)).unwrap();

        assert_eq!(iv.to_string(), "chr1\t100\t200\t5.0");
        assert_eq!(format!("{}\n", iv).into_bytes(), out);
    }
}
