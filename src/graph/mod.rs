//! Node trees: deferred calls whose arguments may themselves be nodes.
//!
//! A `Node` names a registered function and holds its positional and
//! keyword arguments. Each argument slot is either a literal `Value` or an
//! owned child `Node`, so a tree never shares subtrees and `clone()` is a
//! fully independent deep copy.
//!
//! Any slot can be reached by an `Address`:
//! - `3` or `"3"`: positional index,
//! - `"y"`: keyword key, else a child named `y`, else a recursive search,
//! - `"y/0"`: path, one segment per level.
//!
//! Reads (`get`) return the first match in document order. Writes (`set`)
//! update every matching direct child and every match found recursively.

pub mod address;
mod assign;
mod resolve;
mod scan;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

pub use address::{Address, Segment};
pub use scan::Sweep;


// ─── Arguments ─────────────────────────────────────────────────────

/// One argument slot: a literal or an owned child node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Literal(Value),
    Child(Node),
}

impl Arg {
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Arg::Literal(v) => Some(v),
            Arg::Child(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Arg::Literal(_) => None,
            Arg::Child(node) => Some(node),
        }
    }

    pub(crate) fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Arg::Literal(_) => None,
            Arg::Child(node) => Some(node),
        }
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Literal(v) => write!(f, "{}", v),
            Arg::Child(node) => write!(f, "{}", node),
        }
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::Child(node)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Literal(v)
    }
}

macro_rules! literal_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Literal(Value::from(v))
                }
            }
        )*
    };
}

literal_arg!((), bool, i32, i64, f64, &str, String);

// ─── Slots ─────────────────────────────────────────────────────────

/// Location of an argument inside one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Positional(usize),
    /// Index into the keyword map, in insertion order.
    Keyword(usize),
}

// ─── Node ──────────────────────────────────────────────────────────

/// A deferred call: function name plus positional and keyword arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    func: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<Arg>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    kwargs: IndexMap<String, Arg>,
}

impl Node {
    /// An unnamed call of `func` with no arguments yet.
    pub fn new(func: impl Into<String>) -> Self {
        Node {
            name: None,
            func: func.into(),
            args: Vec::new(),
            kwargs: IndexMap::new(),
        }
    }

    /// A call of `func` that parents can find by `name`.
    pub fn named(name: impl Into<String>, func: impl Into<String>) -> Self {
        Node::new(func).with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several positional arguments.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a keyword argument. A repeated key replaces the earlier value
    /// and keeps its original position.
    pub fn kwarg(mut self, key: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.kwargs.insert(key.into(), arg.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn func(&self) -> &str {
        &self.func
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn kwargs(&self) -> &IndexMap<String, Arg> {
        &self.kwargs
    }

    /// `name:func` or just `func`, used in error messages and logs.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{}:{}", name, self.func),
            None => self.func.clone(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children().map(|(_, child)| child.size()).sum::<usize>()
    }

    // ─── Slot access ───────────────────────────────────────────────

    /// Direct child nodes in document order: positional before keyword.
    pub(crate) fn children(&self) -> impl Iterator<Item = (Slot, &Node)> {
        let positional = self
            .args
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.as_node().map(|n| (Slot::Positional(i), n)));
        let keyword = self
            .kwargs
            .values()
            .enumerate()
            .filter_map(|(i, a)| a.as_node().map(|n| (Slot::Keyword(i), n)));
        positional.chain(keyword)
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = (Slot, &mut Node)> {
        let positional = self
            .args
            .iter_mut()
            .enumerate()
            .filter_map(|(i, a)| a.as_node_mut().map(|n| (Slot::Positional(i), n)));
        let keyword = self
            .kwargs
            .values_mut()
            .enumerate()
            .filter_map(|(i, a)| a.as_node_mut().map(|n| (Slot::Keyword(i), n)));
        positional.chain(keyword)
    }

    pub(crate) fn slot(&self, slot: Slot) -> Option<&Arg> {
        match slot {
            Slot::Positional(i) => self.args.get(i),
            Slot::Keyword(i) => self.kwargs.get_index(i).map(|(_, a)| a),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> Option<&mut Arg> {
        match slot {
            Slot::Positional(i) => self.args.get_mut(i),
            Slot::Keyword(i) => self.kwargs.get_index_mut(i).map(|(_, a)| a),
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.label())?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}", arg)?;
        }
        for (key, arg) in &self.kwargs {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}={}", key, arg)?;
        }
        write!(f, ")")
    }
}
