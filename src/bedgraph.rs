//! Streaming bedGraph file parser.

use crate::config::is_drop_empty;
use crate::interval::SignalInterval;
use crate::resolve::InvalidIntervalError;
use crate::streaming::{parse_bedgraph_bytes, should_skip_line, BedGraphWriter};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading, transforming or converting tracks.
#[derive(Error, Debug)]
pub enum BedGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid bedGraph format: {0}")]
    InvalidFormat(String),

    #[error("Invalid interval batch: {0}")]
    InvalidInterval(#[from] InvalidIntervalError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External tool '{tool}' not found")]
    ToolNotFound { tool: String },

    #[error("External tool '{tool}' failed with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, BedGraphError>;

/// A streaming bedGraph file reader.
pub struct BedGraphReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl BedGraphReader<File> {
    /// Open a bedGraph file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BedGraphReader<R> {
    /// Create a new bedGraph reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::with_capacity(256),
        }
    }

    /// Read the next record.
    pub fn read_record(&mut self) -> Result<Option<SignalInterval>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_ascii();
            if should_skip_line(line) {
                continue;
            }

            let record = self.parse_line(line)?;
            if record.start == record.end && is_drop_empty() {
                debug!(
                    "Skipping zero-length record {}:{} at line {}",
                    record.chrom, record.start, self.line_number
                );
                continue;
            }
            return Ok(Some(record));
        }
    }

    /// Parse a single bedGraph line.
    fn parse_line(&self, line: &[u8]) -> Result<SignalInterval> {
        // Tab-separated records take the fast path; anything else (space
        // separated, malformed) goes through the checked parser below.
        if let Some((chrom, start, end, value)) = parse_bedgraph_bytes(line) {
            if !chrom.is_empty() && start <= end {
                if let Ok(chrom) = std::str::from_utf8(chrom) {
                    return Ok(SignalInterval::new(chrom, start, end, value));
                }
            }
        }

        let line = std::str::from_utf8(line).map_err(|e| BedGraphError::Parse {
            line: self.line_number,
            message: format!("Invalid UTF-8: {}", e),
        })?;
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();

        if fields.len() < 4 {
            return Err(BedGraphError::Parse {
                line: self.line_number,
                message: format!("Expected at least 4 fields, got {}", fields.len()),
            });
        }

        let start = self.parse_position(fields[1], "start")?;
        let end = self.parse_position(fields[2], "end")?;

        if start > end {
            return Err(BedGraphError::Parse {
                line: self.line_number,
                message: format!("Start ({}) > end ({})", start, end),
            });
        }

        let value: f64 = fields[3].parse().map_err(|_| BedGraphError::Parse {
            line: self.line_number,
            message: format!("Invalid value: '{}'", fields[3]),
        })?;

        Ok(SignalInterval::new(fields[0], start, end, value))
    }

    fn parse_position(&self, s: &str, field_name: &str) -> Result<u64> {
        s.parse().map_err(|_| BedGraphError::Parse {
            line: self.line_number,
            message: format!("Invalid {} position: '{}'", field_name, s),
        })
    }

    /// Get an iterator over all records.
    pub fn records(self) -> BedGraphRecordIter<R> {
        BedGraphRecordIter { reader: self }
    }
}

/// Iterator over bedGraph records.
pub struct BedGraphRecordIter<R: Read> {
    reader: BedGraphReader<R>,
}

impl<R: Read> Iterator for BedGraphRecordIter<R> {
    type Item = Result<SignalInterval>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// Parse records from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<SignalInterval>> {
    BedGraphReader::new(content.as_bytes()).records().collect()
}

/// Write records to a writer as bedGraph lines.
pub fn write_intervals<W: io::Write>(writer: W, intervals: &[SignalInterval]) -> Result<()> {
    let mut out = BedGraphWriter::new(writer);
    for interval in intervals {
        out.write_interval(interval)?;
    }
    out.flush()
}
