//! # Cascade Benchmarks
//!
//! Performance benchmarks for keepsake-core traversal and dispatch.
//!
//! Run with: `cargo bench -p keepsake-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keepsake_core::{Control, MemoryStore, Serializer, WidgetId, WidgetTree, WindowClass};
use std::hint::black_box;

/// Build a window with `size` scalar children of mixed kinds.
fn build_flat_form(size: usize) -> (WidgetTree, WidgetId) {
    let mut tree = WidgetTree::new();
    let win = tree.insert_root(
        "mainWindow",
        Control::Window {
            class: WindowClass::Main,
            x: 0,
            y: 0,
            width: 1024,
            height: 768,
            dock_layout: vec![0; 64],
        },
    );
    for i in 0..size {
        let control = match i % 4 {
            0 => Control::Checkbox { checked: i % 2 == 0 },
            1 => Control::SpinBox { value: i as i64 },
            2 => Control::TextField {
                text: format!("value {i}"),
            },
            _ => Control::ComboBox {
                editable: false,
                index: (i % 3) as i64,
                text: String::new(),
                items: vec!["a".into(), "b".into(), "c".into()],
            },
        };
        tree.insert_child(win, format!("widget{i}"), control)
            .expect("insert");
    }
    (tree, win)
}

/// Build a deeply nested chain of containers, one checkbox per level.
fn build_deep_form(depth: usize) -> (WidgetTree, WidgetId) {
    let mut tree = WidgetTree::new();
    let root = tree.insert_root("form", Control::Container);
    let mut parent = root;
    for i in 0..depth {
        let level = tree
            .insert_child(parent, format!("level{i}"), Control::Container)
            .expect("insert");
        tree.insert_child(level, format!("flag{i}"), Control::Checkbox { checked: true })
            .expect("insert");
        parent = level;
    }
    (tree, root)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_save_cascade_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_cascade_flat");

    for size in [100, 1000, 10000].iter() {
        let (mut tree, win) = build_flat_form(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut serializer = Serializer::new(MemoryStore::new());
                serializer.save_cascade(&mut tree, win, None);
                black_box(serializer.into_store())
            });
        });
    }

    group.finish();
}

fn bench_load_cascade_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_cascade_flat");

    for size in [100, 1000, 10000].iter() {
        let (mut tree, win) = build_flat_form(*size);
        let mut serializer = Serializer::new(MemoryStore::new());
        serializer.save_cascade(&mut tree, win, None);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                serializer.load_cascade(&mut tree, win, None);
                black_box(&tree)
            });
        });
    }

    group.finish();
}

fn bench_save_cascade_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_cascade_deep");

    for depth in [10, 50, 100].iter() {
        let (mut tree, root) = build_deep_form(*depth);

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| {
                let mut serializer = Serializer::new(MemoryStore::new());
                serializer.save_cascade(&mut tree, root, Some("grp"));
                black_box(serializer.into_store())
            });
        });
    }

    group.finish();
}

fn bench_single_dispatch(c: &mut Criterion) {
    let mut tree = WidgetTree::new();
    let combo = tree.insert_root(
        "searchTerms",
        Control::ComboBox {
            editable: true,
            index: 0,
            text: "current".into(),
            items: (0..50).map(|i| format!("item{i}")).collect(),
        },
    );
    let mut serializer = Serializer::new(MemoryStore::new());
    serializer.policies_mut().set_history_limit(combo, 20);

    c.bench_function("save_control_editable_combo", |b| {
        b.iter(|| black_box(serializer.save_control(&tree, combo, None)));
    });
}

criterion_group!(
    benches,
    bench_save_cascade_flat,
    bench_load_cascade_flat,
    bench_save_cascade_deep,
    bench_single_dispatch,
);

criterion_main!(benches);
