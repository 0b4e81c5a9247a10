//! Shared streaming utilities for wiglift.
//!
//! This module provides the pieces used by every line-oriented command:
//! - Zero-allocation bedGraph parsing
//! - Sort validation
//! - Efficient output formatting

pub mod output;
pub mod parsing;
pub mod validation;

pub use output::BedGraphWriter;
pub use parsing::{parse_bedgraph_bytes, parse_u64_fast, should_skip_line, trim_line_end};
pub use validation::SortValidator;
