use std::path::PathBuf;

use clap::Subcommand;
use thunktree::{ComputeOptions, ContentHash, DiskCache};

use super::fail;

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show entry count and size
    Stats {
        /// Cache directory (default: $THUNKTREE_CACHE_DIR or .thunkcache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Print the cached result for a task key (see `hash --full`)
    Get {
        /// Full 64-digit hex key
        key: String,
        /// Cache directory (default: $THUNKTREE_CACHE_DIR or .thunkcache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// Delete every cached result
    Clear {
        /// Cache directory (default: $THUNKTREE_CACHE_DIR or .thunkcache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

pub fn cmd_cache(action: CacheAction) {
    match action {
        CacheAction::Stats { cache_dir } => cmd_cache_stats(open(cache_dir)),
        CacheAction::Get { key, cache_dir } => cmd_cache_get(open(cache_dir), &key),
        CacheAction::Clear { cache_dir } => cmd_cache_clear(open(cache_dir)),
    }
}

fn open(cache_dir: Option<PathBuf>) -> DiskCache {
    match cache_dir {
        Some(dir) => DiskCache::new(dir),
        None => match ComputeOptions::from_env().cache() {
            Some(cache) => cache,
            None => fail("no cache directory configured"),
        },
    }
}

fn cmd_cache_stats(cache: DiskCache) {
    match cache.stats() {
        Ok(stats) => {
            println!("Cache: {}", cache.root().display());
            println!("  entries: {}", stats.entries);
            println!("  bytes:   {}", stats.total_bytes);
        }
        Err(e) => fail(e),
    }
}

fn cmd_cache_get(cache: DiskCache, key: &str) {
    let hash = match ContentHash::from_hex(key.trim()) {
        Some(hash) => hash,
        None => fail(format!("'{}' is not a 64-digit hex key", key)),
    };
    match cache.lookup(&hash) {
        Some(value) => println!("{}", value),
        None => fail(format!("no cached result for {}", hash)),
    }
}

fn cmd_cache_clear(cache: DiskCache) {
    if let Err(e) = cache.clear() {
        fail(e);
    }
    eprintln!("Cleared {}", cache.root().display());
}
