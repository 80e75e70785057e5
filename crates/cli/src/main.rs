//! Cache simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Run:** Simulate one cache geometry over a trace file.
//! 2. **Sweep:** Simulate every geometry of a JSON config over a trace, in parallel.
//! 3. **Interactive:** A small text shell for building caches and simulating traces.

mod interactive;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{env, fs, io};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{CacheConfig, Config};
use cachesim_core::sim::trace::{self, TraceError, TraceRecord};
use cachesim_core::sim::{Simulator, simulate_many};
use cachesim_core::stats::{ConsoleSink, JsonLogSink, ReportError, ReportSink};
use cachesim_core::{ResultSummary, SimError};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory trace (lines of `R <hex>` / `W <hex>`) through an LRU \
                  set-associative cache and report miss rates.\n\nExamples:\n  \
                  cachesim run -t gcc_memref.out --ways 4 --sets 256\n  \
                  cachesim sweep -t mcf_memref.out -c sweep.json --log results.jsonl\n  \
                  cachesim interactive -t gcc_memref.out -t mcf_memref.out"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a single cache over a trace.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Associativity (overrides the config file).
        #[arg(long)]
        ways: Option<usize>,

        /// Number of sets, a power of two (overrides the config file).
        #[arg(long)]
        sets: Option<usize>,

        /// Block size in bytes, a power of two (overrides the config file).
        #[arg(long)]
        block_size: Option<usize>,

        /// Address width in bits (overrides the config file).
        #[arg(long)]
        address_width: Option<u32>,
    },

    /// Simulate every cache listed in the config over a trace, in parallel.
    Sweep {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Interactive shell: create caches and simulate traces from a menu.
    Interactive {
        /// Trace files offered by the `s` command.
        #[arg(short, long = "trace")]
        traces: Vec<PathBuf>,

        /// Append each result to this JSON-lines file.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Trace file; searched for in the current directory and its parents.
    #[arg(short, long)]
    trace: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append each result to this JSON-lines file (overrides the config file).
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Failures surfaced by the CLI.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("cannot read config {path}: {source}")]
    ConfigIo { path: PathBuf, source: io::Error },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config lists no caches")]
    NoCaches,

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run {
            common,
            ways,
            sets,
            block_size,
            address_width,
        } => cmd_run(&common, ways, sets, block_size, address_width),
        Commands::Sweep { common } => cmd_sweep(&common),
        Commands::Interactive { traces, log } => interactive::run(traces, log),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins over the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reads the config file if one was given, otherwise returns the defaults.
fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let json = fs::read_to_string(path).map_err(|source| CliError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_json(&json).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds and loads the trace, returning its records and identifier.
pub(crate) fn load_trace(name: &Path) -> Result<(Vec<TraceRecord>, String), CliError> {
    let path = trace::resolve_trace_path(name, env::current_dir()?)?;
    let records = trace::load_trace(&path)?;
    Ok((records, trace::trace_identifier(&path)))
}

/// Builds the sinks a result is delivered to.
pub(crate) fn build_sinks(print: bool, log: Option<&Path>) -> Vec<Box<dyn ReportSink>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if print {
        sinks.push(Box::new(ConsoleSink::stdout()));
    }
    if let Some(path) = log {
        sinks.push(Box::new(JsonLogSink::new(path)));
    }
    sinks
}

pub(crate) fn deliver(
    sinks: &mut [Box<dyn ReportSink>],
    summary: &ResultSummary,
) -> Result<(), CliError> {
    for sink in sinks {
        sink.report(summary)?;
    }
    Ok(())
}

fn cmd_run(
    common: &CommonArgs,
    ways: Option<usize>,
    sets: Option<usize>,
    block_size: Option<usize>,
    address_width: Option<u32>,
) -> Result<(), CliError> {
    let config = load_config(common.config.as_deref())?;
    let base = config.caches.first().copied().unwrap_or_default();
    if config.caches.len() > 1 {
        warn!(
            caches = config.caches.len(),
            "config lists several caches; `run` uses the first (see `sweep`)"
        );
    }
    let cache = CacheConfig {
        ways: ways.unwrap_or(base.ways),
        sets: sets.unwrap_or(base.sets),
        block_size: block_size.unwrap_or(base.block_size),
        address_width: address_width.unwrap_or(base.address_width),
    };
    let geometry = cache.geometry()?;

    let (records, trace_id) = load_trace(&common.trace)?;
    let mut simulator = Simulator::new(geometry);
    let summary = simulator.run(records, &trace_id)?;

    let log = common.log.as_deref().or(config.general.log_file.as_deref().map(Path::new));
    let mut sinks = build_sinks(config.general.print_summary, log);
    deliver(&mut sinks, &summary)
}

fn cmd_sweep(common: &CommonArgs) -> Result<(), CliError> {
    let config = load_config(common.config.as_deref())?;
    if config.caches.is_empty() {
        return Err(CliError::NoCaches);
    }
    let geometries = config.geometries()?;

    let (records, trace_id) = load_trace(&common.trace)?;
    let results = simulate_many(&geometries, &records, &trace_id);

    let log = common.log.as_deref().or(config.general.log_file.as_deref().map(Path::new));
    let mut sinks = build_sinks(config.general.print_summary, log);
    for result in results {
        deliver(&mut sinks, &result?)?;
    }
    Ok(())
}
