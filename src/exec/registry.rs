//! Function registry: maps the function names stored in nodes to code.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// Name of the aggregate function produced by `Node::scan`.
pub const TUPLE: &str = "tuple";

/// Signature of a registered function.
pub type NodeFn = dyn Fn(&Call) -> Result<Value, String> + Send + Sync;

/// Evaluated arguments handed to a registered function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Call {
    pub args: Vec<Value>,
    pub kwargs: IndexMap<String, Value>,
}

impl Call {
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Bind a parameter the way a call site would: the `index`-th
    /// positional argument if present, otherwise the keyword `key`.
    pub fn param(&self, index: usize, key: &str) -> Result<&Value, String> {
        self.arg(index)
            .or_else(|| self.kwarg(key))
            .ok_or_else(|| format!("missing argument {} ({})", key, index))
    }

    /// Like `param`, falling back to `default` when neither is given.
    pub fn param_or<'a>(&'a self, index: usize, key: &str, default: &'a Value) -> &'a Value {
        self.arg(index).or_else(|| self.kwarg(key)).unwrap_or(default)
    }
}

#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) version: u32,
    pub(crate) func: Arc<NodeFn>,
}

/// Registered functions, keyed by name.
///
/// A function's `version` takes part in cache keys: bump it when the
/// implementation changes so stale cached results are not reused.
#[derive(Clone)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// A registry holding only the `tuple` aggregate used by scans.
    pub fn new() -> Self {
        let mut registry = Registry {
            entries: HashMap::new(),
        };
        registry.register(TUPLE, |call| Ok(Value::Tuple(call.args.clone())));
        registry
    }

    /// `new()` plus `identity`, `add`, `sub` and `mul`.
    ///
    /// The binary functions bind `(x, y)` positionally or by keyword.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("identity", |call| Ok(call.param(0, "x")?.clone()));
        registry.register("add", |call| call.param(0, "x")?.add(call.param(1, "y")?));
        registry.register("sub", |call| call.param(0, "x")?.sub(call.param(1, "y")?));
        registry.register("mul", |call| call.param(0, "x")?.mul(call.param(1, "y")?));
        registry
    }

    /// Register `func` under `name` at version 0, replacing any earlier entry.
    pub fn register<F>(&mut self, name: &str, func: F) -> &mut Self
    where
        F: Fn(&Call) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.register_versioned(name, 0, func)
    }

    pub fn register_versioned<F>(&mut self, name: &str, version: u32, func: F) -> &mut Self
    where
        F: Fn(&Call) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                version,
                func: Arc::new(func),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn version(&self, name: &str) -> Option<u32> {
        self.entries.get(name).map(|e| e.version)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .finish()
    }
}
