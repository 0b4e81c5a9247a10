//! Clip command implementation.
//!
//! Removes records that refer to positions off the end of their
//! chromosome, like UCSC `bedClip`. Records that start inside the
//! chromosome but run past its end are dropped by default or cut back to
//! the chromosome end with `truncate`.

use crate::bedgraph::{BedGraphError, BedGraphReader};
use crate::genome::Genome;
use crate::interval::SignalInterval;
use crate::streaming::BedGraphWriter;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Counters from a clip run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClipStats {
    pub kept: usize,
    /// Kept after cutting the end back to the chromosome size
    pub clipped: usize,
    pub dropped: usize,
}

impl std::fmt::Display for ClipStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Kept: {} (clipped: {}), dropped: {}",
            self.kept, self.clipped, self.dropped
        )
    }
}

/// Clip command configuration.
#[derive(Debug, Clone, Default)]
pub struct ClipCommand {
    /// Truncate records spanning the chromosome end instead of dropping them
    pub truncate: bool,
}

impl ClipCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Clip a single record in place.
    #[inline]
    pub fn clip_record(&self, record: &mut SignalInterval, genome: &Genome) -> ClipOutcome {
        let Some(chrom_size) = genome.chrom_size(&record.chrom) else {
            return ClipOutcome::Dropped;
        };

        if record.start >= chrom_size || record.is_empty() {
            return ClipOutcome::Dropped;
        }

        if record.end > chrom_size {
            if !self.truncate {
                return ClipOutcome::Dropped;
            }
            record.end = chrom_size;
            return ClipOutcome::Clipped;
        }

        ClipOutcome::Kept
    }

    /// Clip in-memory records.
    pub fn clip(
        &self,
        intervals: Vec<SignalInterval>,
        genome: &Genome,
    ) -> (Vec<SignalInterval>, ClipStats) {
        let mut stats = ClipStats::default();
        let kept = intervals
            .into_iter()
            .filter_map(|mut record| {
                let outcome = self.clip_record(&mut record, genome);
                stats.count(outcome);
                (outcome != ClipOutcome::Dropped).then_some(record)
            })
            .collect();
        (kept, stats)
    }

    /// Run on a file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        genome: &Genome,
        output: &mut W,
    ) -> Result<ClipStats, BedGraphError> {
        let file = File::open(input)?;
        self.run_reader(BedGraphReader::new(file), genome, output)
    }

    /// Streaming clip over any bedGraph source.
    pub fn run_reader<R: Read, W: Write>(
        &self,
        reader: BedGraphReader<R>,
        genome: &Genome,
        output: &mut W,
    ) -> Result<ClipStats, BedGraphError> {
        let mut writer = BedGraphWriter::new(output);
        let mut stats = ClipStats::default();

        for result in reader.records() {
            let mut record = result?;
            let outcome = self.clip_record(&mut record, genome);
            stats.count(outcome);
            if outcome != ClipOutcome::Dropped {
                writer.write_interval(&record)?;
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipOutcome {
    Kept,
    Clipped,
    Dropped,
}

impl ClipStats {
    fn count(&mut self, outcome: ClipOutcome) {
        match outcome {
            ClipOutcome::Kept => self.kept += 1,
            ClipOutcome::Clipped => {
                self.kept += 1;
                self.clipped += 1;
            }
            ClipOutcome::Dropped => self.dropped += 1,
        }
    }
}
