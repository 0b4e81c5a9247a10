//! Resolve command implementation.
//!
//! Removes overlaps from a lifted bedGraph so it can be re-encoded.
//! Two modes:
//! - in-memory (default): any input order, chromosomes resolved in parallel
//! - streaming (`assume_sorted`): O(1) memory, input validated as sorted

use crate::bedgraph::{BedGraphError, BedGraphReader};
use crate::interval::SignalInterval;
use crate::parallel::resolve_by_chromosome_with_stats;
use crate::resolve::{ResolveStats, StreamingResolver};
use crate::streaming::{BedGraphWriter, SortValidator};
use log::debug;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Resolve command configuration.
#[derive(Debug, Clone, Default)]
pub struct ResolveCommand {
    /// Input is sorted by chromosome then start; stream it
    pub assume_sorted: bool,
}

impl ResolveCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assume_sorted(mut self, assume_sorted: bool) -> Self {
        self.assume_sorted = assume_sorted;
        self
    }

    /// Resolve in-memory records, any order, any number of chromosomes.
    pub fn resolve(
        &self,
        intervals: Vec<SignalInterval>,
    ) -> Result<(Vec<SignalInterval>, ResolveStats), BedGraphError> {
        Ok(resolve_by_chromosome_with_stats(intervals)?)
    }

    /// Run on a file, writing bedGraph to `output`.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        output: &mut W,
    ) -> Result<ResolveStats, BedGraphError> {
        let file = File::open(input)?;
        self.run_reader(BedGraphReader::new(file), output)
    }

    /// Run on any bedGraph source.
    pub fn run_reader<R: Read, W: Write>(
        &self,
        reader: BedGraphReader<R>,
        output: &mut W,
    ) -> Result<ResolveStats, BedGraphError> {
        let mut writer = BedGraphWriter::new(output);

        let stats = if self.assume_sorted {
            self.resolve_streaming(reader, &mut writer)?
        } else {
            let intervals = reader.records().collect::<Result<Vec<_>, _>>()?;
            let (resolved, stats) = self.resolve(intervals)?;
            for interval in &resolved {
                writer.write_interval(interval)?;
            }
            stats
        };

        writer.flush()?;
        debug!("resolve: {}", stats);
        Ok(stats)
    }

    fn resolve_streaming<R: Read, W: Write>(
        &self,
        reader: BedGraphReader<R>,
        writer: &mut BedGraphWriter<W>,
    ) -> Result<ResolveStats, BedGraphError> {
        let mut validator = SortValidator::new();
        let mut resolver = StreamingResolver::new();

        for result in reader.records() {
            let record = result?;
            validator.validate(&record.chrom, record.start)?;
            if let Some(done) = resolver.push(record)? {
                writer.write_interval(&done)?;
            }
        }
        if let Some(done) = resolver.finish() {
            writer.write_interval(&done)?;
        }

        Ok(resolver.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn run_on(cmd: &ResolveCommand, content: &str) -> Result<String, BedGraphError> {
        let mut out = Vec::new();
        cmd.run_reader(BedGraphReader::new(content.as_bytes()), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_resolve_unsorted_file() {
        let input = "chr2\t10\t30\t1\nchr1\t150\t250\t9\nchr1\t100\t200\t5\n";
        let out = run_on(&ResolveCommand::new(), input).unwrap();

        assert_eq!(
            out,
            "chr1\t100\t200\t5.0\nchr1\t200\t250\t9.0\nchr2\t10\t30\t1.0\n"
        );
    }

    #[test]
    fn test_streaming_same_as_in_memory() {
        let input = "chr1\t100\t200\t5\nchr1\t100\t300\t6\nchr1\t120\t180\t9\nchr1\t250\t400\t2\nchr2\t0\t10\t1\n";
        let batch = run_on(&ResolveCommand::new(), input).unwrap();
        let streamed = run_on(&ResolveCommand::new().with_assume_sorted(true), input).unwrap();

        assert_eq!(batch, streamed);
        assert_eq!(batch, "chr1\t100\t300\t6.0\nchr1\t300\t400\t2.0\nchr2\t0\t10\t1.0\n");
    }

    #[test]
    fn test_streaming_rejects_unsorted() {
        let input = "chr1\t300\t400\t1\nchr1\t100\t200\t2\n";
        let err = run_on(&ResolveCommand::new().with_assume_sorted(true), input).unwrap_err();
        assert!(matches!(err, BedGraphError::InvalidFormat(_)));
    }

    #[test]
    #[serial]
    fn test_zero_length_rejects_file() {
        let err = run_on(&ResolveCommand::new(), "chr1\t100\t100\t5\n").unwrap_err();
        assert!(matches!(err, BedGraphError::InvalidInterval(_)));
    }

    #[test]
    fn test_stats() {
        let mut out = Vec::new();
        let stats = ResolveCommand::new()
            .run_reader(
                BedGraphReader::new("chr1\t0\t10\t1\nchr1\t5\t8\t2\nchr1\t5\t20\t3\n".as_bytes()),
                &mut out,
            )
            .unwrap();

        assert_eq!(stats.records_in, 3);
        assert_eq!(stats.records_out, 2);
        assert_eq!(stats.truncated, 1);
        assert_eq!(stats.dropped, 1);
    }
}
