//! Layout engine micro-benchmarks
//!
//! Measures full passes over fresh trees and the cost of relayout after a
//! single leaf changes.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flexlay::{Direction, FlexDirection, LayoutTree, MeasureFunc, MeasureMode, NodeId, Size, Wrap};
use std::hint::black_box;
use std::sync::Arc;

/// Text-like content: 8pt glyphs on 12pt lines, wrapping at the offered width.
fn text_measure(chars: usize) -> MeasureFunc {
    Arc::new(move |width, width_mode, _, _| {
        let natural = chars as f32 * 8.0;
        let line_width = match width_mode {
            MeasureMode::Exactly => width,
            MeasureMode::AtMost => natural.min(width),
            MeasureMode::Undefined => natural,
        };
        let per_line = (line_width / 8.0).floor().max(1.0);
        Size::new(line_width, (chars as f32 / per_line).ceil() * 12.0)
    })
}

/// A column of `rows` wrapping rows, each holding `cells` text leaves.
fn build_grid(tree: &mut LayoutTree, rows: usize, cells: usize) -> (NodeId, Vec<NodeId>) {
    let root = tree.new_node();
    tree.set_width(root, 800.0).expect("root exists");
    let mut leaves = Vec::with_capacity(rows * cells);
    for row_index in 0..rows {
        let row = tree.new_node();
        tree.set_flex_direction(row, FlexDirection::Row).expect("row exists");
        tree.set_flex_wrap(row, Wrap::Wrap).expect("row exists");
        tree.set_padding(row, flexlay::Edge::All, 4.0).expect("row exists");
        tree.add_child(root, row).expect("row is detached");
        for cell_index in 0..cells {
            let leaf = tree.new_node();
            tree.set_flex_grow(leaf, 1.0).expect("leaf exists");
            tree.set_measure_func(leaf, Some(text_measure(5 + (row_index + cell_index) % 40)))
                .expect("leaf has no children");
            tree.add_child(row, leaf).expect("leaf is detached");
            leaves.push(leaf);
        }
    }
    (root, leaves)
}

fn benchmark_full_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_layout");

    for rows in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, &rows| {
            b.iter(|| {
                let mut tree = LayoutTree::new();
                let (root, _) = build_grid(&mut tree, rows, 8);
                tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
                    .expect("layout succeeds");
                black_box(tree.layout_height(root).expect("root exists"))
            });
        });
    }

    group.finish();
}

fn benchmark_incremental_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_relayout");

    for rows in [10, 100, 500] {
        let mut tree = LayoutTree::new();
        let (root, leaves) = build_grid(&mut tree, rows, 8);
        tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
            .expect("layout succeeds");
        let target = leaves[leaves.len() / 2];

        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| {
                tree.mark_dirty(target).expect("leaf has a measure function");
                tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
                    .expect("layout succeeds");
                black_box(tree.last_pass_stats())
            });
        });
    }

    group.finish();
}

fn benchmark_cached_layout(c: &mut Criterion) {
    let mut tree = LayoutTree::new();
    let (root, _) = build_grid(&mut tree, 100, 8);
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .expect("layout succeeds");

    c.bench_function("cached_layout", |b| {
        b.iter(|| {
            tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
                .expect("layout succeeds");
            black_box(tree.last_pass_stats())
        });
    });
}

criterion_group!(
    benches,
    benchmark_full_layout,
    benchmark_incremental_relayout,
    benchmark_cached_layout
);
criterion_main!(benches);
