//! Execution: lower a node tree into a task graph and evaluate it.
//!
//! Pipeline:
//! ```text
//! Node ─→ lower() ─→ TaskGraph ─→ Scheduler ─→ Value
//!                                    │  ▲
//!                                    ▼  │
//!                                 DiskCache
//! ```
//!
//! Evaluation is synchronous and pulls from the root. Each task first
//! consults the cache; on a hit its dependencies are never visited. Every
//! computed task result is memoized for the rest of the run and written to
//! the cache.
//!
//! All configuration travels in `ComputeOptions`; nothing is process-wide,
//! so concurrent computations with different options do not interfere.

pub mod cache;
pub mod lower;
pub mod registry;

use std::collections::HashMap;
use std::path::PathBuf;

use petgraph::graph::NodeIndex;

use crate::error::ComputeError;
use crate::graph::Node;
use crate::value::Value;

pub use cache::{CacheStats, DiskCache};
pub use lower::{lower, Input, Task, TaskGraph};
pub use registry::{Call, NodeFn, Registry, TUPLE};


/// Cache directory used when none is configured.
pub const DEFAULT_CACHE_DIR: &str = ".thunkcache";

/// Environment variable overriding the cache directory in `from_env`.
pub const CACHE_DIR_ENV: &str = "THUNKTREE_CACHE_DIR";

/// Options controlling a single computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputeOptions {
    /// Where results are cached; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self {
            cache_dir: Some(PathBuf::from(DEFAULT_CACHE_DIR)),
        }
    }
}

impl ComputeOptions {
    /// Cache results under `dir`.
    pub fn with_cache_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(dir.into()),
        }
    }

    /// Compute everything, read and write no cache.
    pub fn uncached() -> Self {
        Self { cache_dir: None }
    }

    /// Default options, with `$THUNKTREE_CACHE_DIR` overriding the cache
    /// directory when set.
    pub fn from_env() -> Self {
        match std::env::var(CACHE_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::with_cache_dir(dir),
            _ => Self::default(),
        }
    }

    pub fn cache(&self) -> Option<DiskCache> {
        self.cache_dir.as_ref().map(DiskCache::new)
    }
}

/// Counters from one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Tasks in the lowered graph.
    pub tasks: usize,
    /// Functions actually invoked.
    pub invoked: usize,
    /// Task results served from the disk cache.
    pub cache_hits: usize,
}

/// Lower and evaluate `node`.
pub fn compute(
    node: &Node,
    registry: &Registry,
    options: &ComputeOptions,
) -> Result<Value, ComputeError> {
    compute_with_stats(node, registry, options).map(|(value, _)| value)
}

/// Like `compute`, also reporting what the run did.
pub fn compute_with_stats(
    node: &Node,
    registry: &Registry,
    options: &ComputeOptions,
) -> Result<(Value, RunStats), ComputeError> {
    let graph = lower(node, registry)?;
    let mut scheduler = Scheduler {
        graph: &graph,
        registry,
        cache: options.cache(),
        memo: HashMap::new(),
        stats: RunStats {
            tasks: graph.len(),
            ..RunStats::default()
        },
    };
    let value = scheduler.evaluate(graph.root)?;
    log::debug!(
        "computed {}: {} tasks, {} invoked, {} cache hits",
        node.label(),
        scheduler.stats.tasks,
        scheduler.stats.invoked,
        scheduler.stats.cache_hits
    );
    Ok((value, scheduler.stats))
}

impl Node {
    /// Lower and evaluate this tree. See `exec::compute`.
    pub fn compute(
        &self,
        registry: &Registry,
        options: &ComputeOptions,
    ) -> Result<Value, ComputeError> {
        compute(self, registry, options)
    }
}

// ─── Scheduler ─────────────────────────────────────────────────────

struct Scheduler<'g> {
    graph: &'g TaskGraph,
    registry: &'g Registry,
    cache: Option<DiskCache>,
    memo: HashMap<NodeIndex, Value>,
    stats: RunStats,
}

impl Scheduler<'_> {
    fn evaluate(&mut self, index: NodeIndex) -> Result<Value, ComputeError> {
        if let Some(value) = self.memo.get(&index) {
            return Ok(value.clone());
        }
        let graph = self.graph;
        let task = graph.task(index);

        if let Some(value) = self.cache.as_ref().and_then(|c| c.lookup(&task.key)) {
            log::debug!("cache hit: {}", task);
            self.stats.cache_hits += 1;
            self.memo.insert(index, value.clone());
            return Ok(value);
        }

        let mut call = registry::Call::default();
        for input in &task.args {
            let value = self.input(input)?;
            call.args.push(value);
        }
        for (key, input) in &task.kwargs {
            let value = self.input(input)?;
            call.kwargs.insert(key.clone(), value);
        }

        let registry = self.registry;
        let entry = registry
            .entry(&task.func)
            .ok_or_else(|| ComputeError::UnknownFunction(task.func.clone()))?;
        log::debug!("invoke: {}", task);
        let value = (entry.func)(&call).map_err(|message| ComputeError::Call {
            func: task.func.clone(),
            message,
        })?;
        self.stats.invoked += 1;

        if let Some(cache) = &self.cache {
            cache.store(&task.key, &value)?;
        }
        self.memo.insert(index, value.clone());
        Ok(value)
    }

    fn input(&mut self, input: &Input) -> Result<Value, ComputeError> {
        match input {
            Input::Literal(v) => Ok(v.clone()),
            Input::Task(index) => self.evaluate(*index),
        }
    }
}
