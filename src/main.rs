use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::cache::CacheAction;

#[derive(Parser)]
#[command(
    name = "thunktree",
    version,
    about = "Build, edit and compute trees of deferred calls"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a node tree and print its value
    Compute {
        /// Node tree (.json)
        input: PathBuf,
        /// Cache directory (default: $THUNKTREE_CACHE_DIR or .thunkcache)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
        /// Compute everything without reading or writing the cache
        #[arg(long, conflicts_with = "cache_dir")]
        no_cache: bool,
        /// Print task and cache counters to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Print the argument at an address
    Get {
        /// Node tree (.json)
        input: PathBuf,
        /// Index, name, or slash-separated path
        address: String,
    },
    /// Replace the argument(s) at an address
    Set {
        /// Node tree (.json)
        input: PathBuf,
        /// Index, name, or slash-separated path
        address: String,
        /// New value as JSON (literal or node object)
        value: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a scan node from zipped value lists
    Scan {
        /// Node tree (.json)
        input: PathBuf,
        /// Axis to vary, as ADDR=JSON_ARRAY (repeatable)
        #[arg(long, value_name = "ADDR=VALUES")]
        vary: Vec<String>,
        /// Name of the resulting scan node
        #[arg(long)]
        name: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show content hashes of every node (BLAKE3)
    Hash {
        /// Node tree (.json)
        input: PathBuf,
        /// Show full 256-bit hashes instead of short form
        #[arg(long)]
        full: bool,
    },
    /// Print the lowered task graph in Graphviz DOT
    Lower {
        /// Node tree (.json)
        input: PathBuf,
    },
    /// Inspect, read or clear the result cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Compute {
            input,
            cache_dir,
            no_cache,
            stats,
        } => cli::compute::cmd_compute(input, cache_dir, no_cache, stats),
        Command::Get { input, address } => cli::get::cmd_get(input, address),
        Command::Set {
            input,
            address,
            value,
            output,
        } => cli::set::cmd_set(input, address, value, output),
        Command::Scan {
            input,
            vary,
            name,
            output,
        } => cli::scan::cmd_scan(input, vary, name, output),
        Command::Hash { input, full } => cli::hash::cmd_hash(input, full),
        Command::Lower { input } => cli::lower::cmd_lower(input),
        Command::Cache { action } => cli::cache::cmd_cache(action),
    }
}
