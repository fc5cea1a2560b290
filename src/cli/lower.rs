use std::path::PathBuf;

use thunktree::exec::lower;
use thunktree::Registry;

use super::{fail, load_node};

pub fn cmd_lower(input: PathBuf) {
    let node = load_node(&input);
    let registry = Registry::with_builtins();
    let graph = match lower(&node, &registry) {
        Ok(graph) => graph,
        Err(e) => fail(e),
    };
    eprintln!("{} nodes, {} tasks", node.size(), graph.len());
    println!("{}", graph.to_dot());
}
