//! Benchmarks for the cell-grid placement engine.
//!
//! Run with: cargo bench -p dashgrid-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use dashgrid_layout::{
    CellAndSpan, CellGrid, GridConfig, ItemId, ItemSpec, ReorderMode,
};
use std::hint::black_box;

const CELL: i32 = 100;

/// Grid with every other cell occupied by a 1x1 item, checkerboard style.
fn checkerboard(count: i32) -> CellGrid {
    let config = GridConfig::new(count, count, CELL, CELL).expect("valid bench grid");
    let mut grid = CellGrid::new(config);
    let mut next = 1u64;
    for y in 0..count {
        for x in 0..count {
            if (x + y) % 2 == 0 {
                grid.add_item(ItemId::new(next), CellAndSpan::new(x, y, 1, 1), true, true);
                next += 1;
            }
        }
    }
    grid
}

/// Fully packed single row, the worst case for the cascading push.
fn packed_row(count_x: i32) -> CellGrid {
    let config = GridConfig::new(count_x, 1, CELL, CELL).expect("valid bench grid");
    let mut grid = CellGrid::new(config);
    for x in 0..count_x - 1 {
        grid.add_item(ItemId::new(x as u64 + 1), CellAndSpan::new(x, 0, 1, 1), true, true);
    }
    grid
}

fn bench_nearest_vacant(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/nearest_vacant");

    for count in [5, 8, 12] {
        let grid = checkerboard(count);
        let px = count * CELL / 2;
        group.bench_with_input(BenchmarkId::new("span_2x2", count), &grid, |b, grid| {
            b.iter(|| black_box(grid.find_nearest_vacant_area(black_box(px), black_box(px), 1, 1, 2, 2)))
        });
    }

    group.finish();
}

fn bench_reorder_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/reorder_preview");

    // Hint on a checkerboard: nearest-area scan plus solution selection,
    // no committed-state mutation.
    for count in [5, 8, 12] {
        let mut grid = checkerboard(count);
        let px = CELL / 2;
        group.bench_function(BenchmarkId::new("hint", count), |b| {
            b.iter(|| {
                black_box(grid.perform_reorder(
                    black_box(px),
                    black_box(px),
                    1,
                    1,
                    1,
                    1,
                    None,
                    ReorderMode::Hint,
                ))
            })
        });
    }

    // Validity probe on a packed row: forces the full push cascade.
    for count_x in [6, 12, 24] {
        let mut grid = packed_row(count_x);
        let px = CELL / 2;
        group.bench_function(BenchmarkId::new("accept_drop_packed_row", count_x), |b| {
            b.iter(|| {
                black_box(grid.perform_reorder(
                    black_box(px),
                    black_box(CELL / 2),
                    1,
                    1,
                    1,
                    1,
                    None,
                    ReorderMode::AcceptDrop,
                ))
            })
        });
    }

    group.finish();
}

fn bench_drop_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/drop_commit");

    for count_x in [6, 12] {
        group.bench_function(BenchmarkId::new("push_row_and_commit", count_x), |b| {
            b.iter_batched(
                || packed_row(count_x),
                |mut grid| {
                    let result = grid.perform_reorder(
                        CELL / 2,
                        CELL / 2,
                        1,
                        1,
                        1,
                        1,
                        None,
                        ReorderMode::Drop,
                    );
                    black_box(result.found);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_migration_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/migration_probe");

    // has_reorder_solution runs the solver at every cell; this is the
    // documented worst case.
    for count in [4, 6] {
        let mut grid = checkerboard(count);
        let spec = ItemSpec::new(2, 2).with_min_span(1, 1);
        group.bench_function(BenchmarkId::new("has_reorder_solution", count), |b| {
            b.iter(|| black_box(grid.has_reorder_solution(&spec)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_nearest_vacant,
    bench_reorder_preview,
    bench_drop_commit,
    bench_migration_probe,
);

criterion_main!(benches);
