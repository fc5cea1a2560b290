//! Addressing and lowering throughput.
//!
//! Measures name lookup in a deep chain, whole-tree clone, scan
//! construction over a wide sweep, and lowering of a scan into tasks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use thunktree::exec::lower;
use thunktree::{Node, Registry, Sweep};

/// A chain of `depth` nested `add` nodes with a named leaf at the bottom.
fn deep_chain(depth: usize) -> Node {
    let mut node = Node::named("leaf", "identity").kwarg("x", 0);
    for i in 0..depth {
        node = Node::new("add").arg(node).kwarg("y", i as i64);
    }
    node
}

fn bench_get(c: &mut Criterion) {
    let node = deep_chain(200);
    c.bench_function("get_recursive_name_depth_200", |b| {
        b.iter(|| black_box(node.get("leaf").is_ok()))
    });
    c.bench_function("get_path_depth_200", |b| {
        let path = vec!["0"; 200].join("/");
        b.iter(|| black_box(node.get(path.as_str()).is_ok()))
    });
}

fn bench_clone(c: &mut Criterion) {
    let node = deep_chain(200);
    c.bench_function("clone_depth_200", |b| b.iter(|| black_box(node.clone())));
}

fn bench_scan(c: &mut Criterion) {
    let node = deep_chain(50);
    let sweep = Sweep::new().vary("leaf/x", 0..256i64);
    c.bench_function("scan_256_runs", |b| {
        b.iter(|| black_box(node.scan(&sweep, None).is_ok()))
    });

    let registry = Registry::with_builtins();
    let scan = match node.scan(&sweep, None) {
        Ok(scan) => scan,
        Err(e) => panic!("scan failed: {}", e),
    };
    c.bench_function("lower_scan_256_runs", |b| {
        b.iter(|| black_box(lower(&scan, &registry).is_ok()))
    });
}

criterion_group!(benches, bench_get, bench_clone, bench_scan);
criterion_main!(benches);
