use std::path::PathBuf;

use thunktree::exec::compute_with_stats;
use thunktree::Registry;

use super::{fail, load_node, resolve_options};

pub fn cmd_compute(input: PathBuf, cache_dir: Option<PathBuf>, no_cache: bool, stats: bool) {
    let node = load_node(&input);
    let options = resolve_options(cache_dir, no_cache);
    let registry = Registry::with_builtins();

    let (value, run) = match compute_with_stats(&node, &registry, &options) {
        Ok(result) => result,
        Err(e) => fail(e),
    };
    println!("{}", value);

    if stats {
        eprintln!(
            "{} tasks, {} invoked, {} from cache",
            run.tasks, run.invoked, run.cache_hits
        );
        match &options.cache_dir {
            Some(dir) => eprintln!("cache: {}", dir.display()),
            None => eprintln!("cache: disabled"),
        }
    }
}
