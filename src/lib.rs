//! Addressable trees of deferred computations.
//!
//! Build a tree of `Node`s, each a registered function name plus positional
//! and keyword arguments that are literals or further nodes. Read and
//! rewrite any slot by index, name or `/`-path, clone independent copies,
//! generate zipped parameter sweeps with `scan`, then `compute` the tree
//! through a content-addressed disk cache.
//!
//! ```no_run
//! use thunktree::{ComputeOptions, Node, Registry, Sweep};
//!
//! let registry = Registry::with_builtins();
//! let node = Node::new("mul").arg(2).arg(2);
//! let sweep = node.scan(&Sweep::new().vary(0, [1, 2, 3, 4]), None).unwrap();
//! let result = sweep.compute(&registry, &ComputeOptions::default()).unwrap();
//! assert_eq!(result.to_string(), "(2, 4, 6, 8)");
//! ```

pub mod error;
pub mod exec;
pub mod graph;
pub mod hash;
pub mod persist;
pub mod value;

pub use error::{ComputeError, GraphError, PersistError};
pub use exec::{compute, Call, ComputeOptions, DiskCache, Registry};
pub use graph::{Address, Arg, Node, Segment, Sweep};
pub use hash::{hash_node, ContentHash};
pub use value::Value;
