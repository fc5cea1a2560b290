//! Lowering: node tree → task graph.
//!
//! Every node becomes a task that depends on the tasks of its child
//! arguments; literals pass through unchanged. Tasks are keyed by content
//! (see `crate::hash`), and structurally identical subtrees collapse into a
//! single task, so the result is a DAG rather than a tree.

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::registry::Registry;
use crate::error::ComputeError;
use crate::graph::{Arg, Node};
use crate::hash::{call_key, ContentHash, KeyInput};
use crate::value::Value;

/// One input of a task.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Literal(Value),
    Task(NodeIndex),
}

/// A single call, ready to run once its input tasks have values.
#[derive(Clone, Debug)]
pub struct Task {
    pub func: String,
    pub args: Vec<Input>,
    pub kwargs: IndexMap<String, Input>,
    pub key: ContentHash,
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.func, self.key)
    }
}

/// Tasks plus dependency edges (`dependency → dependent`), each edge
/// labelled with the argument slot it feeds.
#[derive(Clone, Debug)]
pub struct TaskGraph {
    pub graph: DiGraph<Task, String>,
    pub root: NodeIndex,
}

impl TaskGraph {
    /// Number of distinct tasks.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn task(&self, index: NodeIndex) -> &Task {
        &self.graph[index]
    }

    pub fn root_task(&self) -> &Task {
        &self.graph[self.root]
    }

    /// Tasks that `index` reads from, deduplicated.
    pub fn dependencies(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(index, Direction::Incoming)
            .collect();
        deps.sort();
        deps.dedup();
        deps
    }

    /// Graphviz rendering of the task graph.
    pub fn to_dot(&self) -> String {
        use petgraph::dot::Dot;
        format!("{}", Dot::new(&self.graph))
    }
}

/// Lower `node` against `registry`.
///
/// Fails with `UnknownFunction` for the first function name in document
/// order that the registry does not know.
pub fn lower(node: &Node, registry: &Registry) -> Result<TaskGraph, ComputeError> {
    let mut lowering = Lowering {
        registry,
        graph: DiGraph::new(),
        seen: HashMap::new(),
    };
    let root = lowering.lower_node(node)?;
    log::debug!(
        "lowered {} ({} nodes) into {} tasks",
        node.label(),
        node.size(),
        lowering.graph.node_count()
    );
    Ok(TaskGraph {
        graph: lowering.graph,
        root,
    })
}

struct Lowering<'r> {
    registry: &'r Registry,
    graph: DiGraph<Task, String>,
    seen: HashMap<ContentHash, NodeIndex>,
}

impl Lowering<'_> {
    fn lower_node(&mut self, node: &Node) -> Result<NodeIndex, ComputeError> {
        let version = self
            .registry
            .version(node.func())
            .ok_or_else(|| ComputeError::UnknownFunction(node.func().to_string()))?;

        let mut args = Vec::with_capacity(node.args().len());
        for arg in node.args() {
            args.push(self.lower_arg(arg)?);
        }
        let mut kwargs = IndexMap::with_capacity(node.kwargs().len());
        for (key, arg) in node.kwargs() {
            kwargs.insert(key.clone(), self.lower_arg(arg)?);
        }

        let key = call_key(
            node.func(),
            version,
            args.iter().map(|input| self.key_input(input)),
            kwargs
                .iter()
                .map(|(k, input)| (k.as_str(), self.key_input(input))),
        );

        if let Some(&index) = self.seen.get(&key) {
            return Ok(index);
        }

        let positional = args
            .iter()
            .enumerate()
            .map(|(i, input)| (i.to_string(), input));
        let keyword = kwargs.iter().map(|(k, input)| (k.clone(), input));
        let deps: Vec<(NodeIndex, String)> = positional
            .chain(keyword)
            .filter_map(|(slot, input)| match input {
                Input::Task(index) => Some((*index, slot)),
                Input::Literal(_) => None,
            })
            .collect();

        let index = self.graph.add_node(Task {
            func: node.func().to_string(),
            args,
            kwargs,
            key,
        });
        for (dep, slot) in deps {
            self.graph.add_edge(dep, index, slot);
        }
        self.seen.insert(key, index);
        Ok(index)
    }

    fn lower_arg(&mut self, arg: &Arg) -> Result<Input, ComputeError> {
        match arg {
            Arg::Literal(v) => Ok(Input::Literal(v.clone())),
            Arg::Child(child) => self.lower_node(child).map(Input::Task),
        }
    }

    fn key_input<'a>(&self, input: &'a Input) -> KeyInput<'a> {
        match input {
            Input::Literal(v) => KeyInput::Literal(v),
            Input::Task(index) => KeyInput::Child(self.graph[*index].key),
        }
    }
}
