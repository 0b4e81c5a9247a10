//! Convert command implementation.
//!
//! Lifts a bigWig track from one assembly to another:
//!
//! ```text
//! bigWigToBedGraph -> CrossMap bed -> filter -> clip -> sort -> resolve -> bedGraphToBigWig
//! ```
//!
//! The external steps run as subprocesses; the bedGraph steps in between
//! run in-process on intermediate files in a work directory.

use crate::bedgraph::BedGraphError;
use crate::commands::{
    ClipCommand, ClipStats, FilterCommand, FilterStats, ResolveCommand, SortCommand,
};
use crate::config::ConvertConfig;
use crate::genome::Genome;
use crate::resolve::ResolveStats;
use crate::tools::Toolchain;
use log::{info, warn};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TOTAL_STEPS: usize = 8;

const INPUT_BEDGRAPH: &str = "input.bedGraph";
const LIFTED_BEDGRAPH: &str = "lifted.bedGraph";
const FILTERED_BEDGRAPH: &str = "filtered.bedGraph";
const CLIPPED_BEDGRAPH: &str = "clipped.bedGraph";
const SORTED_BEDGRAPH: &str = "sorted.bedGraph";
const RESOLVED_BEDGRAPH: &str = "resolved.bedGraph";

/// Counters from each in-process stage of a conversion.
#[derive(Debug, Default, Clone)]
pub struct ConvertStats {
    pub filter: FilterStats,
    pub clip: ClipStats,
    pub resolve: ResolveStats,
}

/// Where intermediate files go: a caller-owned directory that is kept,
/// or a temporary one removed on drop.
enum WorkDir {
    Kept(PathBuf),
    Temp(TempDir),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Kept(path) => path,
            WorkDir::Temp(dir) => dir.path(),
        }
    }
}

/// Convert command: one bigWig liftover run.
#[derive(Debug, Clone)]
pub struct ConvertCommand {
    config: ConvertConfig,
    tools: Toolchain,
}

impl ConvertCommand {
    pub fn new(config: ConvertConfig) -> Self {
        let tools = Toolchain::locate(config.tools_dir.as_deref());
        Self { config, tools }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<ConvertStats, BedGraphError> {
        let cfg = &self.config;
        let mut step = 0;
        let mut progress = |message: &str| {
            step += 1;
            info!("[{}/{}] {}", step, TOTAL_STEPS, message);
        };

        progress(&format!(
            "Checking inputs for {} -> {} conversion",
            cfg.source, cfg.target
        ));
        cfg.validate()?;
        let chain = cfg.chain_file();
        let chrom_sizes = cfg.chrom_sizes_file();
        require_file(&cfg.input, "input bigWig")?;
        require_file(&chain, "chain file")?;
        require_file(&chrom_sizes, "chrom sizes file")?;

        progress("Loading target chromosome sizes");
        let genome = Genome::from_file(&chrom_sizes)?;
        if genome.is_empty() {
            return Err(BedGraphError::Config(format!(
                "No chromosomes in chrom sizes file: {}",
                chrom_sizes.display()
            )));
        }
        info!("Loaded {} {} chromosome sizes", genome.len(), cfg.target);

        let work = self.work_dir()?;
        let path = |name: &str| work.path().join(name);

        progress("Converting bigWig to bedGraph");
        self.tools.to_bedgraph(&cfg.input, &path(INPUT_BEDGRAPH))?;

        progress("Lifting coordinates with CrossMap");
        self.tools
            .lift(&chain, &path(INPUT_BEDGRAPH), &path(LIFTED_BEDGRAPH))?;

        progress("Filtering chromosomes and clipping coordinates");
        let filter = FilterCommand::new().run(
            path(LIFTED_BEDGRAPH),
            &genome,
            &mut create(&path(FILTERED_BEDGRAPH))?,
        )?;
        let clip = ClipCommand::new().with_truncate(cfg.truncate).run(
            path(FILTERED_BEDGRAPH),
            &genome,
            &mut create(&path(CLIPPED_BEDGRAPH))?,
        )?;
        if filter.dropped > 0 {
            warn!(
                "Dropped {} records on chromosomes absent from the {} assembly",
                filter.dropped, cfg.target
            );
        }
        if clip.dropped > 0 {
            warn!("Dropped {} records outside chromosome bounds", clip.dropped);
        }

        progress("Sorting lifted records");
        SortCommand::new().run(
            path(CLIPPED_BEDGRAPH),
            &mut create(&path(SORTED_BEDGRAPH))?,
        )?;

        progress("Adjusting overlapping regions");
        let resolve = ResolveCommand::new().with_assume_sorted(true).run(
            path(SORTED_BEDGRAPH),
            &mut create(&path(RESOLVED_BEDGRAPH))?,
        )?;
        info!("{}", resolve);

        progress("Converting back to bigWig");
        self.tools
            .to_bigwig(&path(RESOLVED_BEDGRAPH), &chrom_sizes, &cfg.output)?;

        if let WorkDir::Kept(dir) = &work {
            info!("Intermediate files kept in {}", dir.display());
        }
        info!("Conversion complete: {}", cfg.output.display());

        Ok(ConvertStats {
            filter,
            clip,
            resolve,
        })
    }

    fn work_dir(&self) -> Result<WorkDir, BedGraphError> {
        match &self.config.work_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                Ok(WorkDir::Kept(dir.clone()))
            }
            None => Ok(WorkDir::Temp(
                tempfile::Builder::new().prefix("wiglift-").tempdir()?,
            )),
        }
    }
}

fn require_file(path: &Path, what: &str) -> Result<(), BedGraphError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BedGraphError::Config(format!(
            "Missing {}: {}",
            what,
            path.display()
        )))
    }
}

fn create(path: &Path) -> Result<File, BedGraphError> {
    Ok(File::create(path)?)
}
