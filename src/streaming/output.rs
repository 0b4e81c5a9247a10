//! Efficient output formatting for bedGraph records.
//!
//! Uses itoa for integer formatting and ryu for float formatting
//! to avoid allocation in the hot path.

use crate::bedgraph::BedGraphError;
use crate::interval::SignalInterval;
use std::io::{BufWriter, Write};

/// Buffer size for BedGraphWriter (256KB default).
const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered bedGraph output writer.
pub struct BedGraphWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> BedGraphWriter<W> {
    /// Create a new BedGraphWriter with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new BedGraphWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        }
    }

    /// Write one `chrom\tstart\tend\tvalue` line.
    #[inline]
    pub fn write_record(
        &mut self,
        chrom: &[u8],
        start: u64,
        end: u64,
        value: f64,
    ) -> Result<(), BedGraphError> {
        self.writer.write_all(chrom)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.ryu_buf.format(value).as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    pub fn write_interval(&mut self, interval: &SignalInterval) -> Result<(), BedGraphError> {
        self.write_record(
            interval.chrom.as_bytes(),
            interval.start,
            interval.end,
            interval.value,
        )
    }

    /// Write a full line as-is with newline.
    #[inline]
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), BedGraphError> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), BedGraphError> {
        self.writer.flush()?;
        Ok(())
    }
}
