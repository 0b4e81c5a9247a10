//! wiglift: lift bigWig signal tracks between genome assemblies
//!
//! Usage: wiglift <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use wiglift::bedgraph::{BedGraphError, BedGraphReader};
use wiglift::commands::{ClipCommand, ConvertCommand, FilterCommand, ResolveCommand, SortCommand};
use wiglift::config::{Assembly, ConvertConfig};
use wiglift::genome::Genome;

#[derive(Parser)]
#[command(name = "wiglift")]
#[command(version)]
#[command(about = "wiglift: convert bigWig signal tracks between hg19 and hg38", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Skip zero-length records (start == end) while reading bedGraph
    /// input. By default they are rejected as invalid intervals.
    #[arg(long, global = true)]
    drop_empty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove overlaps from a lifted bedGraph (earlier interval wins)
    Resolve {
        /// Input bedGraph file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Stream sorted input in constant memory
        #[arg(long)]
        assume_sorted: bool,

        /// Print resolution statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Keep only records on chromosomes listed in a chrom sizes file
    Filter {
        /// Input bedGraph file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Chrom sizes file of the target assembly
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Print filter statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Drop or truncate records extending past chromosome ends
    Clip {
        /// Input bedGraph file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Chrom sizes file of the target assembly
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Truncate records at the chromosome end instead of dropping them
        #[arg(long)]
        truncate: bool,

        /// Print clip statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Sort a bedGraph by chromosome and start (LC_ALL=C sort -k1,1 -k2,2n)
    Sort {
        /// Input bedGraph file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print sorting statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Convert a bigWig file from one assembly to another
    Convert {
        /// Input bigWig file
        #[arg(short, long)]
        input: PathBuf,

        /// Output bigWig file
        #[arg(short, long)]
        output: PathBuf,

        /// Source assembly
        #[arg(long, value_enum)]
        from: Assembly,

        /// Target assembly
        #[arg(long, value_enum)]
        to: Assembly,

        /// Directory containing chain and chrom sizes files
        #[arg(long, default_value = ".")]
        resources: PathBuf,

        /// Directory containing bigWigToBedGraph, CrossMap and bedGraphToBigWig
        /// (default: search PATH)
        #[arg(long)]
        tools_dir: Option<PathBuf>,

        /// Keep intermediate files in this directory
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Truncate records at chromosome ends instead of dropping them
        #[arg(long)]
        truncate: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Must be set before any parsing occurs
    if cli.drop_empty {
        wiglift::config::set_drop_empty(true);
    }

    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            error!("Failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Resolve {
            input,
            assume_sorted,
            stats,
        } => run_resolve(input, assume_sorted, stats),

        Commands::Filter {
            input,
            genome,
            stats,
        } => run_filter(input, genome, stats),

        Commands::Clip {
            input,
            genome,
            truncate,
            stats,
        } => run_clip(input, genome, truncate, stats),

        Commands::Sort { input, stats } => run_sort(input, stats),

        Commands::Convert {
            input,
            output,
            from,
            to,
            resources,
            tools_dir,
            work_dir,
            truncate,
        } => {
            let config = ConvertConfig::new(input, output, from, to)
                .with_resources_dir(resources)
                .with_tools_dir(tools_dir)
                .with_work_dir(work_dir)
                .with_truncate(truncate);
            ConvertCommand::new(config).run().map(|_| ())
        }
    };

    if let Err(e) = result {
        if is_broken_pipe(&e) {
            process::exit(0);
        }
        error!("{}", e);
        process::exit(1);
    }
}

/// `None` and `-` both mean stdin.
fn stdin_requested(input: &Option<PathBuf>) -> bool {
    match input {
        Some(path) => path.to_string_lossy() == "-",
        None => true,
    }
}

fn is_broken_pipe(err: &BedGraphError) -> bool {
    matches!(err, BedGraphError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
}

fn run_resolve(
    input: Option<PathBuf>,
    assume_sorted: bool,
    stats: bool,
) -> Result<(), BedGraphError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let cmd = ResolveCommand::new().with_assume_sorted(assume_sorted);
    let result = if stdin_requested(&input) {
        cmd.run_reader(BedGraphReader::new(io::stdin().lock()), &mut handle)?
    } else {
        let path = input.unwrap_or_default();
        cmd.run(&path, &mut handle)?
    };
    handle.flush()?;

    if stats {
        eprintln!("Resolve stats: {}", result);
    }
    Ok(())
}

fn run_filter(input: Option<PathBuf>, genome: PathBuf, stats: bool) -> Result<(), BedGraphError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let genome = Genome::from_file(&genome)?;
    let cmd = FilterCommand::new();
    let result = if stdin_requested(&input) {
        cmd.run_reader(io::stdin().lock(), &genome, &mut handle)?
    } else {
        let path = input.unwrap_or_default();
        cmd.run(&path, &genome, &mut handle)?
    };
    handle.flush()?;

    if stats {
        eprintln!("Filter stats: {}", result);
    }
    Ok(())
}

fn run_clip(
    input: Option<PathBuf>,
    genome: PathBuf,
    truncate: bool,
    stats: bool,
) -> Result<(), BedGraphError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let genome = Genome::from_file(&genome)?;
    let cmd = ClipCommand::new().with_truncate(truncate);
    let result = if stdin_requested(&input) {
        cmd.run_reader(BedGraphReader::new(io::stdin().lock()), &genome, &mut handle)?
    } else {
        let path = input.unwrap_or_default();
        cmd.run(&path, &genome, &mut handle)?
    };
    handle.flush()?;

    if stats {
        eprintln!("Clip stats: {}", result);
    }
    Ok(())
}

fn run_sort(input: Option<PathBuf>, stats: bool) -> Result<(), BedGraphError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let cmd = SortCommand::new();
    let result = if stdin_requested(&input) {
        cmd.run_reader(io::stdin().lock(), &mut handle)?
    } else {
        let path = input.unwrap_or_default();
        cmd.run(&path, &mut handle)?
    };
    handle.flush()?;

    if stats {
        eprintln!("Sort stats: {}", result);
    }
    Ok(())
}
