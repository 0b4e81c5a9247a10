//! wiglift: lift bigWig signal tracks between hg19 and hg38.
//!
//! bigWig decoding/encoding and the coordinate liftover are done by
//! external tools. This library provides everything in between: bedGraph
//! I/O, chromosome filtering and clipping, sorting, and the overlap
//! resolution that makes lifted records encodable again.
//!
//! # Features
//!
//! - **Overlap resolution**: earlier interval wins, later ones are truncated or dropped
//! - **Parallel processing**: chromosomes are resolved independently with Rayon
//! - **Streaming I/O**: sorted input is resolved in constant memory
//!
//! # Example
//!
//! ```rust
//! use wiglift::{bedgraph, parallel::resolve_by_chromosome};
//!
//! let lifted = bedgraph::parse_intervals("chr1\t100\t200\t5\nchr1\t150\t250\t9\n").unwrap();
//! let resolved = resolve_by_chromosome(lifted).unwrap();
//!
//! assert_eq!(resolved[1].start, 200);
//! ```

pub mod bedgraph;
pub mod commands;
pub mod config;
pub mod genome;
pub mod interval;
pub mod parallel;
pub mod resolve;
pub mod streaming;
pub mod tools;

// Re-export commonly used types
pub use bedgraph::{BedGraphError, BedGraphReader};
pub use interval::SignalInterval;
pub use resolve::{resolve_overlaps, InvalidIntervalError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bedgraph::{BedGraphError, BedGraphReader};
    pub use crate::commands::{
        ClipCommand, ConvertCommand, FilterCommand, ResolveCommand, SortCommand,
    };
    pub use crate::config::{Assembly, ConvertConfig};
    pub use crate::genome::Genome;
    pub use crate::interval::SignalInterval;
    pub use crate::resolve::{resolve_overlaps, InvalidIntervalError, StreamingResolver};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::bedgraph::parse_intervals;
        use crate::commands::{ClipCommand, FilterCommand, SortCommand};
        use crate::genome::Genome;
        use crate::parallel::resolve_by_chromosome;

        let lifted = "chr1\t150\t250\t9\nchr1_alt\t1\t5\t1\nchr1\t100\t200\t5\nchr1\t950\t1200\t2\n";
        let intervals = parse_intervals(lifted).unwrap();

        let mut genome = Genome::new();
        genome.insert("chr1".to_string(), 1000);

        let (kept, _) = FilterCommand::new().filter(intervals, &genome);
        let (clipped, _) = ClipCommand::new().with_truncate(true).clip(kept, &genome);
        let sorted = SortCommand::new().sort(clipped);
        let resolved = resolve_by_chromosome(sorted).unwrap();

        let coords: Vec<_> = resolved.iter().map(|r| (r.start, r.end, r.value)).collect();
        assert_eq!(
            coords,
            vec![(100, 200, 5.0), (200, 250, 9.0), (950, 1000, 2.0)]
        );
    }
}
