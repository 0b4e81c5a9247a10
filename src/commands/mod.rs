//! Command implementations for wiglift.

pub mod clip;
pub mod convert;
pub mod filter;
pub mod resolve;
pub mod sort;

pub use clip::{ClipCommand, ClipOutcome, ClipStats};
pub use convert::{ConvertCommand, ConvertStats};
pub use filter::{FilterCommand, FilterStats};
pub use resolve::ResolveCommand;
pub use sort::{SortCommand, SortStats};
