//! Per-chromosome parallel resolution using Rayon.

use crate::interval::SignalInterval;
use crate::resolve::{resolve_batch, InvalidIntervalError, ResolveStats};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Minimum number of intervals before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Group intervals by chromosome.
pub fn group_by_chromosome(
    intervals: Vec<SignalInterval>,
) -> FxHashMap<String, Vec<SignalInterval>> {
    let mut groups: FxHashMap<String, Vec<SignalInterval>> = FxHashMap::default();

    for interval in intervals {
        match groups.get_mut(interval.chrom.as_str()) {
            Some(group) => group.push(interval),
            None => {
                groups.insert(interval.chrom.clone(), vec![interval]);
            }
        }
    }

    groups
}

/// Resolve overlaps across any number of chromosomes.
///
/// Each chromosome is an independent batch. Output is concatenated in
/// chromosome byte order, the order `sort -k1,1` produces.
pub fn resolve_by_chromosome(
    intervals: Vec<SignalInterval>,
) -> Result<Vec<SignalInterval>, InvalidIntervalError> {
    resolve_by_chromosome_with_stats(intervals).map(|(resolved, _)| resolved)
}

/// Same as [`resolve_by_chromosome`], also returning summed counters.
pub fn resolve_by_chromosome_with_stats(
    intervals: Vec<SignalInterval>,
) -> Result<(Vec<SignalInterval>, ResolveStats), InvalidIntervalError> {
    let total = intervals.len();
    let mut groups: Vec<(String, Vec<SignalInterval>)> =
        group_by_chromosome(intervals).into_iter().collect();
    groups.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let results: Vec<(Vec<SignalInterval>, ResolveStats)> = if total < PARALLEL_THRESHOLD {
        groups
            .into_iter()
            .map(|(_, batch)| resolve_batch(batch))
            .collect::<Result<_, _>>()?
    } else {
        groups
            .into_par_iter()
            .map(|(_, batch)| resolve_batch(batch))
            .collect::<Result<_, _>>()?
    };

    let mut stats = ResolveStats::default();
    let mut resolved = Vec::with_capacity(total);
    for (batch, batch_stats) in results {
        stats.absorb(&batch_stats);
        resolved.extend(batch);
    }

    Ok((resolved, stats))
}
