use std::path::PathBuf;

use thunktree::{hash_node, Node};

use super::load_node;

pub fn cmd_hash(input: PathBuf, full: bool) {
    let node = load_node(&input);
    print_hashes(&node, "", full);
}

/// Print the root hash, then one line per child node with its address.
fn print_hashes(node: &Node, address: &str, full: bool) {
    let hash = hash_node(node);
    let shown = if full { hash.to_hex() } else { hash.to_string() };
    let at = if address.is_empty() { "/" } else { address };
    println!("{} {} {}", shown, at, node.label());

    let positional = node
        .args()
        .iter()
        .enumerate()
        .map(|(i, arg)| (i.to_string(), arg));
    let keyword = node.kwargs().iter().map(|(k, arg)| (k.clone(), arg));
    for (slot, arg) in positional.chain(keyword) {
        if let Some(child) = arg.as_node() {
            let path = if address.is_empty() {
                slot
            } else {
                format!("{}/{}", address, slot)
            };
            print_hashes(child, &path, full);
        }
    }
}
