use std::path::PathBuf;

use thunktree::{Arg, Sweep};

use super::{fail, load_node, write_node};

/// Parse one `--vary ADDR=JSON_ARRAY` flag.
fn parse_axis(axis: &str) -> Result<(String, Vec<Arg>), String> {
    let (address, values) = axis
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=JSON_ARRAY, got '{}'", axis))?;
    let values: Vec<Arg> = serde_json::from_str(values)
        .map_err(|e| format!("invalid values for '{}': {}", address, e))?;
    Ok((address.to_string(), values))
}

pub fn cmd_scan(input: PathBuf, vary: Vec<String>, name: Option<String>, output: Option<PathBuf>) {
    let node = load_node(&input);

    let mut sweep = Sweep::new();
    for axis in &vary {
        match parse_axis(axis) {
            Ok((address, values)) => sweep = sweep.vary(address, values),
            Err(e) => fail(e),
        }
    }

    let scan = match node.scan(&sweep, name.as_deref()) {
        Ok(scan) => scan,
        Err(e) => fail(e),
    };
    eprintln!("Scan of {} runs", scan.args().len());
    write_node(&scan, output.as_deref());
}
