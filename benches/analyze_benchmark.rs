//! Benchmarks for layout reconstruction and table detection.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic token clouds shaped like recognized
//! document pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use unscan::analyze::{reconstruct, structure_blocks, LayoutConfig, TableConfig};
use unscan::model::Token;

/// Synthetic prose page: `lines` lines of `words` words each, with a
/// little vertical jitter so line grouping has real work to do.
fn prose_tokens(lines: usize, words: usize) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(lines * words);
    for line in 0..lines {
        let y = 40.0 + line as f32 * 18.0 + (line % 3) as f32 * 0.7;
        for word in 0..words {
            tokens.push(Token::new(
                format!("w{}l{}", word, line),
                40.0 + word as f32 * 55.0,
                y,
                48.0,
                12.0,
                0.92,
                0,
            ));
        }
    }
    tokens
}

/// Synthetic tabular page: a grid of column-aligned tokens.
fn grid_tokens(rows: usize, cols: usize) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            tokens.push(Token::new(
                format!("r{}c{}", row, col),
                50.0 + col as f32 * 120.0,
                40.0 + row as f32 * 20.0,
                60.0,
                12.0,
                0.95,
                0,
            ));
        }
    }
    tokens
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();

    c.bench_function("reconstruct_prose_50x12", |b| {
        let tokens = prose_tokens(50, 12);
        b.iter(|| reconstruct(black_box(tokens.clone()), black_box(&config)))
    });

    c.bench_function("reconstruct_prose_200x15", |b| {
        let tokens = prose_tokens(200, 15);
        b.iter(|| reconstruct(black_box(tokens.clone()), black_box(&config)))
    });
}

fn bench_tables(c: &mut Criterion) {
    let layout = LayoutConfig::default();
    let table = TableConfig::default();

    c.bench_function("structure_grid_30x6", |b| {
        let blocks = reconstruct(grid_tokens(30, 6), &layout);
        b.iter(|| structure_blocks(black_box(blocks.clone()), black_box(&table)))
    });

    c.bench_function("full_page_analysis", |b| {
        let mut tokens = prose_tokens(40, 10);
        let mut grid = grid_tokens(20, 5);
        for t in &mut grid {
            t.y += 800.0;
        }
        tokens.append(&mut grid);

        b.iter(|| {
            let blocks = reconstruct(black_box(tokens.clone()), &layout);
            structure_blocks(blocks, &table)
        })
    });
}

criterion_group!(benches, bench_layout, bench_tables);
criterion_main!(benches);
