//! Overlap resolution for lifted signal intervals.
//!
//! Liftover maps adjacent source positions independently, so neighbouring
//! records can land on overlapping target ranges. bigWig encoders reject
//! overlaps, so every chromosome's records are passed through a single
//! sweep that keeps the earlier interval and truncates or drops the later.
//!
//! Policy, per chromosome:
//! 1. Sort by start ascending; on equal starts the longer interval comes
//!    first, and input order breaks any remaining tie.
//! 2. Track the end of the last emitted interval (the boundary).
//! 3. A candidate starting at or after the boundary is emitted unchanged.
//! 4. Otherwise its start is moved up to the boundary; if nothing is left
//!    it is dropped, else the truncated remainder is emitted.

use crate::interval::SignalInterval;
use thiserror::Error;

/// A batch the resolver refuses to process.
///
/// The whole batch is rejected; no partial output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidIntervalError {
    #[error("interval {chrom}:{start}-{end} is empty (end must be greater than start)")]
    EmptyInterval { chrom: String, start: u64, end: u64 },

    #[error("batch mixes chromosomes '{expected}' and '{found}'")]
    MixedChromosomes { expected: String, found: String },
}

/// Counters describing what the resolver did to a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    pub records_in: usize,
    pub records_out: usize,
    /// Emitted with a start moved up to the previous end
    pub truncated: usize,
    /// Fully covered by an earlier interval
    pub dropped: usize,
}

impl ResolveStats {
    /// Add another batch's counters to this one.
    pub fn absorb(&mut self, other: &ResolveStats) {
        self.records_in += other.records_in;
        self.records_out += other.records_out;
        self.truncated += other.truncated;
        self.dropped += other.dropped;
    }
}

impl std::fmt::Display for ResolveStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records in: {}, out: {}, truncated: {}, dropped: {}",
            self.records_in, self.records_out, self.truncated, self.dropped
        )
    }
}

/// Check that every interval is non-empty and all share one chromosome.
pub fn validate_batch(intervals: &[SignalInterval]) -> Result<(), InvalidIntervalError> {
    let Some(first) = intervals.first() else {
        return Ok(());
    };

    for iv in intervals {
        if iv.chrom != first.chrom {
            return Err(InvalidIntervalError::MixedChromosomes {
                expected: first.chrom.clone(),
                found: iv.chrom.clone(),
            });
        }
        check_non_empty(iv)?;
    }
    Ok(())
}

#[inline]
fn check_non_empty(iv: &SignalInterval) -> Result<(), InvalidIntervalError> {
    if iv.is_empty() {
        return Err(InvalidIntervalError::EmptyInterval {
            chrom: iv.chrom.clone(),
            start: iv.start,
            end: iv.end,
        });
    }
    Ok(())
}

/// Apply the truncate-or-drop step to one candidate.
#[inline]
fn settle(
    boundary: &mut u64,
    mut iv: SignalInterval,
    stats: &mut ResolveStats,
) -> Option<SignalInterval> {
    if iv.start < *boundary {
        iv.start = *boundary;
        if iv.start >= iv.end {
            stats.dropped += 1;
            return None;
        }
        stats.truncated += 1;
    }
    *boundary = iv.end;
    stats.records_out += 1;
    Some(iv)
}

/// Resolve overlaps within a single chromosome's batch.
///
/// Input may be in any order. Output is sorted by start and free of
/// overlaps.
///
/// # Example
///
/// ```
/// use wiglift::interval::SignalInterval;
/// use wiglift::resolve::resolve_overlaps;
///
/// let out = resolve_overlaps(vec![
///     SignalInterval::new("chr1", 100, 200, 5.0),
///     SignalInterval::new("chr1", 150, 250, 9.0),
/// ])
/// .unwrap();
///
/// assert_eq!(out[1], SignalInterval::new("chr1", 200, 250, 9.0));
/// ```
pub fn resolve_overlaps(
    intervals: Vec<SignalInterval>,
) -> Result<Vec<SignalInterval>, InvalidIntervalError> {
    resolve_batch(intervals).map(|(resolved, _)| resolved)
}

/// Same as [`resolve_overlaps`], also returning counters.
pub fn resolve_batch(
    mut intervals: Vec<SignalInterval>,
) -> Result<(Vec<SignalInterval>, ResolveStats), InvalidIntervalError> {
    validate_batch(&intervals)?;

    let mut stats = ResolveStats {
        records_in: intervals.len(),
        ..Default::default()
    };

    // Stable: equal (start, end) keep input order
    intervals.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut boundary = 0;
    let resolved = intervals
        .into_iter()
        .filter_map(|iv| settle(&mut boundary, iv, &mut stats))
        .collect();

    Ok((resolved, stats))
}

/// Resolver for input already sorted by chromosome, then start.
///
/// Holds at most one record at a time. Among records sharing a start only
/// the longest survives (the first one on ties), which makes the output
/// identical to [`resolve_overlaps`] applied per chromosome. Sort order is
/// not checked here; callers pair this with a
/// [`SortValidator`](crate::streaming::SortValidator).
#[derive(Debug, Default)]
pub struct StreamingResolver {
    boundary: u64,
    pending: Option<SignalInterval>,
    stats: ResolveStats,
}

impl StreamingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next record. Returns a record that is now final, if any.
    pub fn push(
        &mut self,
        iv: SignalInterval,
    ) -> Result<Option<SignalInterval>, InvalidIntervalError> {
        check_non_empty(&iv)?;
        self.stats.records_in += 1;

        let Some(pending) = self.pending.take() else {
            self.pending = Some(iv);
            return Ok(None);
        };

        if pending.chrom == iv.chrom && pending.start == iv.start {
            // Same start: the shorter one is contained in the longer one
            if iv.end > pending.end {
                self.pending = Some(iv);
            } else {
                self.pending = Some(pending);
            }
            self.stats.dropped += 1;
            return Ok(None);
        }

        let new_chrom = pending.chrom != iv.chrom;
        let settled = settle(&mut self.boundary, pending, &mut self.stats);
        if new_chrom {
            self.boundary = 0;
        }
        self.pending = Some(iv);
        Ok(settled)
    }

    /// Flush the held record at end of input.
    pub fn finish(&mut self) -> Option<SignalInterval> {
        let pending = self.pending.take()?;
        let settled = settle(&mut self.boundary, pending, &mut self.stats);
        self.boundary = 0;
        settled
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }
}
