use std::path::PathBuf;

use super::{fail, load_node, parse_arg, write_node};

pub fn cmd_set(input: PathBuf, address: String, value: String, output: Option<PathBuf>) {
    let mut node = load_node(&input);
    let value = parse_arg(&value);
    if let Err(e) = node.set(address.as_str(), value) {
        fail(e);
    }
    write_node(&node, output.as_deref());
}
