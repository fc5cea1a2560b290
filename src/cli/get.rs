use std::path::PathBuf;

use thunktree::Arg;

use super::{fail, load_node};

pub fn cmd_get(input: PathBuf, address: String) {
    let node = load_node(&input);
    match node.get(address.as_str()) {
        Ok(Arg::Literal(value)) => println!("{}", value),
        Ok(Arg::Child(child)) => match child.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        },
        Err(e) => fail(e),
    }
}
