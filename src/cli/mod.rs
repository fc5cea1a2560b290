pub mod cache;
pub mod compute;
pub mod get;
pub mod hash;
pub mod lower;
pub mod scan;
pub mod set;

use std::path::{Path, PathBuf};
use std::process;

use thunktree::{Arg, ComputeOptions, Node};

/// Load a node tree from a JSON file, exiting on failure.
pub fn load_node(path: &Path) -> Node {
    match Node::load(path) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("error: cannot load '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Write `node` as JSON to `output`, or to stdout when no file is given.
pub fn write_node(node: &Node, output: Option<&Path>) {
    match output {
        Some(path) => {
            if let Err(e) = node.save(path) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => match node.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
    }
}

/// Parse a command-line argument value: any JSON literal, or a JSON
/// object describing a node.
pub fn parse_arg(text: &str) -> Arg {
    match serde_json::from_str::<Arg>(text) {
        Ok(arg) => arg,
        Err(e) => {
            eprintln!("error: invalid value '{}': {}", text, e);
            process::exit(1);
        }
    }
}

/// Cache configuration from the common `--cache-dir` / `--no-cache` flags.
/// Without either flag the environment decides.
pub fn resolve_options(cache_dir: Option<PathBuf>, no_cache: bool) -> ComputeOptions {
    if no_cache {
        return ComputeOptions::uncached();
    }
    match cache_dir {
        Some(dir) => ComputeOptions::with_cache_dir(dir),
        None => ComputeOptions::from_env(),
    }
}

/// Print `error` and exit with status 1.
pub fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", error);
    process::exit(1);
}
