//! End-to-end scenarios through the public API: build a tree, edit it,
//! save and reload it, scan it, and compute it against an on-disk cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thunktree::{ComputeError, ComputeOptions, GraphError, Node, Registry, Sweep, Value};

/// A registry with a `slow_add` whose invocations are counted.
fn registry_with_counter() -> (Registry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = Registry::with_builtins();
    registry.register("slow_add", move |call| {
        counter.fetch_add(1, Ordering::SeqCst);
        call.param(0, "x")?.add(call.param(1, "y")?)
    });
    (registry, calls)
}

fn model() -> Node {
    Node::named("model", "add")
        .kwarg(
            "x",
            Node::named("left", "mul").kwarg("x", 1).kwarg("y", 2),
        )
        .kwarg(
            "y",
            Node::named("right", "mul").kwarg("x", 3).kwarg("y", 4),
        )
}

#[test]
fn test_build_edit_compute() {
    let registry = Registry::with_builtins();
    let options = ComputeOptions::uncached();
    let mut node = model();
    assert_eq!(node.compute(&registry, &options).unwrap(), Value::Int(14));

    node.set("left/y", 10).unwrap();
    assert_eq!(node.get_value("x/y").unwrap(), &Value::Int(10));
    assert_eq!(node.compute(&registry, &options).unwrap(), Value::Int(22));

    let err = node.set("middle", 0).unwrap_err();
    assert_eq!(
        err,
        GraphError::NotFound {
            address: "middle".into(),
            node: "model:add".into(),
        }
    );
}

#[test]
fn test_saved_tree_computes_from_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let options = ComputeOptions::with_cache_dir(tmp.path().join("cache"));
    let (registry, calls) = registry_with_counter();
    let node = Node::new("slow_add")
        .arg(Node::new("slow_add").arg(1).arg(2))
        .arg(Node::new("slow_add").arg(3).arg(4));
    assert_eq!(node.compute(&registry, &options).unwrap(), Value::Int(10));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let path = tmp.path().join("tree.json");
    node.save(&path).unwrap();
    let loaded = Node::load(&path).unwrap();
    assert_eq!(loaded.compute(&registry, &options).unwrap(), Value::Int(10));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_scan_over_paths_with_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let options = ComputeOptions::with_cache_dir(tmp.path());
    let registry = Registry::with_builtins();
    let node = model();
    let sweep = Sweep::new().vary("left/x", [1, 2, 3]).vary("right/x", [0, 1, 2]);
    let scan = node.scan(&sweep, Some("sweep")).unwrap();

    assert_eq!(scan.name(), Some("sweep"));
    assert_eq!(scan.args().len(), 3);
    assert_eq!(
        scan.compute(&registry, &options).unwrap(),
        Value::from(vec![2, 4 + 4, 6 + 8])
    );
    // Scanning leaves `node` itself untouched.
    assert_eq!(node.get_value("left/x").unwrap(), &Value::Int(1));
    assert_eq!(node.compute(&registry, &options).unwrap(), Value::Int(14));
}

#[test]
fn test_scan_rejects_uneven_axes() {
    let sweep = Sweep::new().vary("left/x", [1, 2, 3]).vary("right/x", [0, 1]);
    assert_eq!(
        model().scan(&sweep, None).unwrap_err(),
        GraphError::LengthMismatch {
            address: "right/x".into(),
            expected: 3,
            found: 2,
        }
    );
}

#[test]
fn test_clone_diverges_from_source() {
    let registry = Registry::with_builtins();
    let options = ComputeOptions::uncached();
    let source = model();
    let mut copy = source.clone();
    copy.set("right", Node::named("right", "identity").arg(100)).unwrap();

    assert_eq!(source.compute(&registry, &options).unwrap(), Value::Int(14));
    assert_eq!(copy.compute(&registry, &options).unwrap(), Value::Int(102));
}

#[test]
fn test_error_surfaces_function_name() {
    let registry = Registry::with_builtins();
    let node = Node::new("sub").arg(1).kwarg("y", "two");
    let err = node.compute(&registry, &ComputeOptions::uncached()).unwrap_err();
    assert!(matches!(err, ComputeError::Call { ref func, .. } if func == "sub"));
    assert!(err.to_string().contains("sub"), "{}", err);
}
