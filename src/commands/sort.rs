//! Sort command implementation.
//!
//! Orders bedGraph lines like `LC_ALL=C sort -k1,1 -k2,2n`:
//! 1. Chromosome (byte order)
//! 2. Start coordinate (ascending, numeric)
//! 3. Input order preserved for ties (stable sort)
//!
//! Lines are written back verbatim. Large files are memory-mapped and
//! large inputs are parsed and sorted in parallel.

use crate::bedgraph::BedGraphError;
use crate::interval::SignalInterval;
use crate::parallel::PARALLEL_THRESHOLD;
use crate::streaming::{parse_u64_fast, should_skip_line, BedGraphWriter};
use memchr::{memchr, memchr2};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Minimum file size to use mmap (smaller files use buffered I/O)
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Statistics from a sort run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortStats {
    pub records: usize,
    pub chromosomes: usize,
    pub used_mmap: bool,
}

impl std::fmt::Display for SortStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Records: {}, Chroms: {}, Mmap: {}",
            self.records,
            self.chromosomes,
            if self.used_mmap { "yes" } else { "no" }
        )
    }
}

/// One line's sort key and location in the buffer.
#[derive(Debug, Clone, Copy)]
struct SortEntry<'a> {
    chrom: &'a [u8],
    start: u64,
    line: &'a [u8],
}

/// Sort command configuration.
#[derive(Debug, Clone, Default)]
pub struct SortCommand;

impl SortCommand {
    pub fn new() -> Self {
        Self
    }

    /// Stable in-memory sort by chromosome bytes, then start.
    pub fn sort(&self, mut intervals: Vec<SignalInterval>) -> Vec<SignalInterval> {
        if intervals.len() >= PARALLEL_THRESHOLD {
            intervals.par_sort_by(|a, b| a.cmp_position(b));
        } else {
            intervals.sort_by(|a, b| a.cmp_position(b));
        }
        intervals
    }

    /// Run on a file.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        output: &mut W,
    ) -> Result<SortStats, BedGraphError> {
        let file = File::open(input)?;
        if file.metadata()?.len() >= MMAP_THRESHOLD {
            // SAFETY: the file is only read, and intermediate files are not
            // modified while a run is in progress.
            let mmap = unsafe { Mmap::map(&file)? };
            let mut stats = self.sort_bytes(&mmap, output)?;
            stats.used_mmap = true;
            Ok(stats)
        } else {
            self.run_reader(file, output)
        }
    }

    /// Run on any source by reading it fully into memory.
    pub fn run_reader<R: Read, W: Write>(
        &self,
        mut reader: R,
        output: &mut W,
    ) -> Result<SortStats, BedGraphError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.sort_bytes(&data, output)
    }

    fn sort_bytes<W: Write>(&self, data: &[u8], output: &mut W) -> Result<SortStats, BedGraphError> {
        let lines = split_lines(data);

        let mut entries: Vec<SortEntry> = if lines.len() >= PARALLEL_THRESHOLD {
            lines
                .par_iter()
                .map(|line| parse_entry(line))
                .collect::<Result<_, _>>()?
        } else {
            lines
                .iter()
                .map(|line| parse_entry(line))
                .collect::<Result<_, _>>()?
        };

        if entries.len() >= PARALLEL_THRESHOLD {
            entries.par_sort_by(|a, b| a.chrom.cmp(b.chrom).then(a.start.cmp(&b.start)));
        } else {
            entries.sort_by(|a, b| a.chrom.cmp(b.chrom).then(a.start.cmp(&b.start)));
        }

        let mut writer = BedGraphWriter::new(output);
        let mut chromosomes = 0;
        let mut prev_chrom: Option<&[u8]> = None;
        for entry in &entries {
            if prev_chrom != Some(entry.chrom) {
                chromosomes += 1;
                prev_chrom = Some(entry.chrom);
            }
            writer.write_line(entry.line)?;
        }
        writer.flush()?;

        Ok(SortStats {
            records: entries.len(),
            chromosomes,
            used_mmap: false,
        })
    }
}

/// Split into data lines, dropping line endings, blanks and headers.
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::with_capacity(data.len() / 32);
    let mut pos = 0;

    while pos < data.len() {
        let end = memchr(b'\n', &data[pos..]).map_or(data.len(), |off| pos + off);
        let mut line = &data[pos..end];
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        if !should_skip_line(line) {
            lines.push(line);
        }
        pos = end + 1;
    }

    lines
}

/// Extract (chrom, start) from a whitespace-separated line.
#[inline]
fn parse_entry(line: &[u8]) -> Result<SortEntry<'_>, BedGraphError> {
    let invalid = || {
        BedGraphError::InvalidFormat(format!(
            "Cannot sort unparsable record: '{}'",
            String::from_utf8_lossy(line)
        ))
    };

    let sep1 = memchr2(b'\t', b' ', line).ok_or_else(invalid)?;
    let rest = &line[sep1 + 1..];
    let sep2 = memchr2(b'\t', b' ', rest).unwrap_or(rest.len());
    let start = parse_u64_fast(&rest[..sep2]).ok_or_else(invalid)?;

    Ok(SortEntry {
        chrom: &line[..sep1],
        start,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn sort_str(input: &str) -> (String, SortStats) {
        let mut out = Vec::new();
        let stats = SortCommand::new().run_reader(input.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_sort_order() {
        let (out, stats) = sort_str(
            "chr2\t5\t6\t1\nchr10\t100\t200\t2\nchr1\t300\t400\t3\nchr1\t20\t30\t4\n",
        );
        assert_eq!(
            out,
            "chr1\t20\t30\t4\nchr1\t300\t400\t3\nchr10\t100\t200\t2\nchr2\t5\t6\t1\n"
        );
        assert_eq!(stats.records, 4);
        assert_eq!(stats.chromosomes, 3);
    }

    #[test]
    fn test_numeric_start_and_stability() {
        // 9 < 10 numerically; equal starts keep input order
        let (out, _) = sort_str("chr1\t10\t20\ta\nchr1\t9\t20\tb\nchr1\t10\t15\tc\n");
        assert_eq!(out, "chr1\t9\t20\tb\nchr1\t10\t20\ta\nchr1\t10\t15\tc\n");
    }

    #[test]
    fn test_headers_and_crlf() {
        let (out, stats) = sort_str("track type=bedGraph\r\nchr1\t5\t6\t1\r\n\nchr1\t1\t2\t1");
        assert_eq!(out, "chr1\t1\t2\t1\nchr1\t5\t6\t1\n");
        assert_eq!(stats.records, 2);
    }

    #[test]
    fn test_bad_line() {
        let mut out = Vec::new();
        let err = SortCommand::new()
            .run_reader("chr1\tx\t2\t1\n".as_bytes(), &mut out)
            .unwrap_err();
        assert!(matches!(err, BedGraphError::InvalidFormat(_)));
    }

    #[test]
    fn test_mmap_path() {
        let mut file = NamedTempFile::new().unwrap();
        let n = 5_000u64;
        for i in (0..n).rev() {
            writeln!(file, "chr{}\t{}\t{}\t{}", i % 3, i * 10, i * 10 + 5, i).unwrap();
        }
        file.flush().unwrap();

        let mut out = Vec::new();
        let stats = SortCommand::new().run(file.path(), &mut out).unwrap();
        assert!(stats.used_mmap);
        assert_eq!(stats.records, n as usize);
        assert_eq!(stats.chromosomes, 3);

        let text = String::from_utf8(out).unwrap();
        let keys: Vec<(String, u64)> = text
            .lines()
            .map(|l| {
                let mut f = l.split('\t');
                (f.next().unwrap().to_string(), f.next().unwrap().parse().unwrap())
            })
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_parallel_sort_is_stable() {
        // Pairs of lines share (chrom, start); the fourth column records input order
        let n = PARALLEL_THRESHOLD + 2_000;
        let lines: Vec<String> = (0..n)
            .map(|i| {
                let start = (n - i) / 2;
                format!("chr{}\t{}\t{}\t{}", start % 5, start, start + 10, i)
            })
            .collect();
        let input = lines.join("\n") + "\n";

        let (out, stats) = sort_str(&input);
        assert_eq!(stats.records, n);
        assert_eq!(stats.chromosomes, 5);

        fn key(line: &str) -> (&str, usize) {
            let mut f = line.split('\t');
            (f.next().unwrap(), f.next().unwrap().parse().unwrap())
        }
        let mut expected: Vec<&str> = lines.iter().map(String::as_str).collect();
        expected.sort_by(|a, b| key(a).cmp(&key(b)));
        assert_eq!(out.lines().collect::<Vec<_>>(), expected);

        let rows: Vec<(&str, usize, usize)> = out
            .lines()
            .map(|l| {
                let f: Vec<&str> = l.split('\t').collect();
                (f[0], f[1].parse().unwrap(), f[3].parse().unwrap())
            })
            .collect();
        let mut ties = 0;
        for w in rows.windows(2) {
            assert!((w[0].0, w[0].1) <= (w[1].0, w[1].1));
            if (w[0].0, w[0].1) == (w[1].0, w[1].1) {
                assert!(w[0].2 < w[1].2, "tie out of input order: {:?}", w);
                ties += 1;
            }
        }
        assert!(ties > 0);
    }

    #[test]
    fn test_parallel_in_memory_sort_is_stable() {
        let n = PARALLEL_THRESHOLD + 100;
        let intervals: Vec<SignalInterval> = (0..n)
            .map(|i| {
                let start = ((n - i) / 3) as u64;
                SignalInterval::new(format!("chr{}", start % 2), start, start + 1, i as f64)
            })
            .collect();

        let sorted = SortCommand::new().sort(intervals);
        assert_eq!(sorted.len(), n);
        for w in sorted.windows(2) {
            match w[0].cmp_position(&w[1]) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => assert!(w[0].value < w[1].value),
                std::cmp::Ordering::Greater => panic!("out of order: {:?}", w),
            }
        }
    }

    #[test]
    fn test_sort_in_memory() {
        let sorted = SortCommand::new().sort(vec![
            SignalInterval::new("chr2", 1, 2, 1.0),
            SignalInterval::new("chr1", 9, 10, 2.0),
            SignalInterval::new("chr1", 3, 4, 3.0),
        ]);
        let starts: Vec<_> = sorted.iter().map(|r| (r.chrom.as_str(), r.start)).collect();
        assert_eq!(starts, vec![("chr1", 3), ("chr1", 9), ("chr2", 1)]);
    }
}
