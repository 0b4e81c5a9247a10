//! Filter command implementation.
//!
//! Liftover can place records on alternate haplotypes, unplaced contigs or
//! names the target assembly does not define. Only records whose chromosome
//! is listed in the target chrom sizes are kept; kept lines are copied
//! through verbatim.

use crate::bedgraph::BedGraphError;
use crate::genome::Genome;
use crate::interval::SignalInterval;
use crate::streaming::{should_skip_line, trim_line_end, BedGraphWriter};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Counters from a filter run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub kept: usize,
    pub dropped: usize,
}

impl std::fmt::Display for FilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kept: {}, dropped: {}", self.kept, self.dropped)
    }
}

/// Filter command configuration.
#[derive(Debug, Clone, Default)]
pub struct FilterCommand;

impl FilterCommand {
    pub fn new() -> Self {
        Self
    }

    /// Keep in-memory records on chromosomes known to `genome`.
    pub fn filter(
        &self,
        intervals: Vec<SignalInterval>,
        genome: &Genome,
    ) -> (Vec<SignalInterval>, FilterStats) {
        let total = intervals.len();
        let kept: Vec<SignalInterval> = intervals
            .into_iter()
            .filter(|iv| genome.has_chrom(&iv.chrom))
            .collect();
        let stats = FilterStats {
            kept: kept.len(),
            dropped: total - kept.len(),
        };
        (kept, stats)
    }

    /// Run on a file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        genome: &Genome,
        output: &mut W,
    ) -> Result<FilterStats, BedGraphError> {
        let file = File::open(input)?;
        self.run_reader(file, genome, output)
    }

    /// Streaming filter over any source.
    pub fn run_reader<R: Read, W: Write>(
        &self,
        input: R,
        genome: &Genome,
        output: &mut W,
    ) -> Result<FilterStats, BedGraphError> {
        let mut reader = BufReader::new(input);
        let mut writer = BedGraphWriter::new(output);
        let mut stats = FilterStats::default();
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = trim_line_end(&buf);
            if should_skip_line(line) {
                continue;
            }

            let chrom = line
                .split(|b| b.is_ascii_whitespace())
                .next()
                .unwrap_or_default();
            let known = std::str::from_utf8(chrom)
                .map(|c| genome.has_chrom(c))
                .unwrap_or(false);

            if known {
                writer.write_line(line)?;
                stats.kept += 1;
            } else {
                stats.dropped += 1;
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}
