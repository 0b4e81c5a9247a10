//! Runtime configuration for wiglift.
//!
//! Holds the process-wide parse flag set once at startup, plus the
//! assembly and resource-file naming used by the convert pipeline.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::bedgraph::BedGraphError;

/// Global flag for skipping zero-length bedGraph records at parse time.
///
/// By default a record with start == end is handed to the overlap resolver,
/// which rejects the whole batch. When enabled, such records are silently
/// dropped during parsing, the way the UCSC tools tolerate them.
static DROP_EMPTY: AtomicBool = AtomicBool::new(false);

/// Enable or disable dropping of zero-length records.
///
/// # Example
///
/// ```
/// use wiglift::config;
///
/// // Enable at startup before any parsing
/// config::set_drop_empty(true);
/// assert!(config::is_drop_empty());
/// config::set_drop_empty(false);
/// ```
#[inline]
pub fn set_drop_empty(enabled: bool) {
    DROP_EMPTY.store(enabled, Ordering::Release);
}

/// Check if zero-length records are dropped during parsing.
#[inline]
pub fn is_drop_empty() -> bool {
    DROP_EMPTY.load(Ordering::Acquire)
}

/// Human reference genome assemblies supported by the convert pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Assembly {
    Hg19,
    Hg38,
}

impl Assembly {
    /// Lowercase UCSC name, e.g. `hg19`.
    pub fn name(&self) -> &'static str {
        match self {
            Assembly::Hg19 => "hg19",
            Assembly::Hg38 => "hg38",
        }
    }

    /// Capitalized name as used inside chain file names, e.g. `Hg38`.
    fn capitalized(&self) -> &'static str {
        match self {
            Assembly::Hg19 => "Hg19",
            Assembly::Hg38 => "Hg38",
        }
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Assembly {
    type Err = BedGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hg19" => Ok(Assembly::Hg19),
            "hg38" => Ok(Assembly::Hg38),
            _ => Err(BedGraphError::Config(format!(
                "Unsupported assembly '{}': expected hg19 or hg38",
                s
            ))),
        }
    }
}

/// UCSC chain file name for lifting `source` onto `target`.
///
/// `hg19` -> `hg38` gives `hg19ToHg38.over.chain.gz`.
pub fn chain_file_name(source: Assembly, target: Assembly) -> String {
    format!("{}To{}.over.chain.gz", source.name(), target.capitalized())
}

/// UCSC chromosome sizes file name for an assembly, e.g. `hg38.chrom.sizes`.
pub fn chrom_sizes_file_name(assembly: Assembly) -> String {
    format!("{}.chrom.sizes", assembly.name())
}

/// Settings for a full bigWig liftover run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Input bigWig in source coordinates
    pub input: PathBuf,
    /// Output bigWig in target coordinates
    pub output: PathBuf,
    pub source: Assembly,
    pub target: Assembly,
    /// Directory holding chain and chrom sizes files
    pub resources_dir: PathBuf,
    /// Directory holding the external tools (PATH lookup when None)
    pub tools_dir: Option<PathBuf>,
    /// Directory for intermediate files; kept after the run when set
    pub work_dir: Option<PathBuf>,
    /// Truncate records running past chromosome ends instead of dropping them
    pub truncate: bool,
}

impl ConvertConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        source: Assembly,
        target: Assembly,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            source,
            target,
            resources_dir: PathBuf::from("."),
            tools_dir: None,
            work_dir: None,
            truncate: false,
        }
    }

    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = dir.into();
        self
    }

    pub fn with_tools_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.tools_dir = dir;
        self
    }

    pub fn with_work_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.work_dir = dir;
        self
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Source and target must differ.
    pub fn validate(&self) -> Result<(), BedGraphError> {
        if self.source == self.target {
            return Err(BedGraphError::Config(format!(
                "Source and target assemblies must be different (both are {})",
                self.source
            )));
        }
        Ok(())
    }

    /// Path of the chain file for this run.
    pub fn chain_file(&self) -> PathBuf {
        self.resources_dir
            .join(chain_file_name(self.source, self.target))
    }

    /// Path of the target assembly's chrom sizes file.
    pub fn chrom_sizes_file(&self) -> PathBuf {
        self.resources_dir
            .join(chrom_sizes_file_name(self.target))
    }
}
