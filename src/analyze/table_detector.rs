//! Table structuring from aligned token columns.
//!
//! A block whose lines repeat the same token start positions is
//! reprojected into a row/column grid by clustering start-x coordinates
//! into column bins. Classification is heuristic and degrades to plain
//! text on any ambiguity; it never raises a hard error.

use std::collections::BTreeSet;

use crate::model::{Block, Table, TableCell, TableRow, TextBlock};

/// Table detection thresholds.
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    /// Minimum number of lines for a block to qualify as tabular
    pub min_rows: usize,

    /// Minimum number of column bins
    pub min_columns: usize,

    /// Bins whose centers are closer than this many pixels are merged
    pub column_tolerance: f32,

    /// A bin must contain tokens from at least this many distinct lines
    pub min_column_support: usize,
}

impl TableConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum row count.
    pub fn with_min_rows(mut self, rows: usize) -> Self {
        self.min_rows = rows;
        self
    }

    /// Set the column merge tolerance in pixels.
    pub fn with_column_tolerance(mut self, tolerance: f32) -> Self {
        self.column_tolerance = tolerance;
        self
    }

    /// Set the minimum per-column line support.
    pub fn with_min_column_support(mut self, support: usize) -> Self {
        self.min_column_support = support;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_columns: 2,
            column_tolerance: 12.0,
            min_column_support: 2,
        }
    }
}

/// A column bin accumulated from token start positions.
#[derive(Debug, Clone)]
struct ColumnBin {
    sum: f32,
    count: usize,
    lines: BTreeSet<usize>,
}

impl ColumnBin {
    fn center(&self) -> f32 {
        self.sum / self.count as f32
    }

    fn absorb(&mut self, other: &ColumnBin) {
        self.sum += other.sum;
        self.count += other.count;
        self.lines.extend(other.lines.iter().copied());
    }
}

/// Classify a block and reproject it into a table when its token start
/// positions line up; otherwise return it unchanged as plain text.
pub fn structure_block(block: TextBlock, config: &TableConfig) -> Block {
    if block.lines.len() < config.min_rows {
        return Block::Text(block);
    }

    let bins = column_bins(&block, config);
    if bins.len() < config.min_columns {
        log::debug!(
            "table_detector: {} aligned columns, below minimum {}",
            bins.len(),
            config.min_columns
        );
        return Block::Text(block);
    }

    let centers: Vec<f32> = bins.iter().map(|b| b.center()).collect();

    // Tokens must sit close to a retained column; a stray start position
    // means the alignment is not table-like enough to trust.
    let drift_limit = config.column_tolerance * 2.0;
    for line in &block.lines {
        for token in &line.tokens {
            let (_, distance) = nearest_column(&centers, token.x);
            if distance > drift_limit {
                log::debug!(
                    "table_detector: token {:?} drifts {:.1}px from columns, keeping text",
                    token.text,
                    distance
                );
                return Block::Text(block);
            }
        }
    }

    let column_count = centers.len();
    let mut rows = Vec::with_capacity(block.lines.len());
    for line in block.lines {
        let mut cells: Vec<Vec<crate::model::Token>> = vec![Vec::new(); column_count];
        for token in line.tokens {
            let (col, _) = nearest_column(&centers, token.x);
            cells[col].push(token);
        }
        rows.push(TableRow::new(cells.into_iter().map(TableCell::new).collect()));
    }

    log::debug!(
        "table_detector: structured {} rows x {} columns",
        rows.len(),
        column_count
    );
    Block::Table(Table::new(rows, column_count))
}

/// Structure every block of a page, leaving non-tabular blocks as text.
pub fn structure_blocks(blocks: Vec<TextBlock>, config: &TableConfig) -> Vec<Block> {
    blocks
        .into_iter()
        .map(|b| structure_block(b, config))
        .collect()
}

/// Cluster token start-x positions into supported column bins.
fn column_bins(block: &TextBlock, config: &TableConfig) -> Vec<ColumnBin> {
    let mut starts: Vec<(usize, f32)> = Vec::new();
    for (line_idx, line) in block.lines.iter().enumerate() {
        for token in &line.tokens {
            starts.push((line_idx, token.x));
        }
    }
    starts.sort_by(|a, b| a.1.total_cmp(&b.1));

    // Greedy left-to-right clustering against the running center.
    let mut bins: Vec<ColumnBin> = Vec::new();
    for (line_idx, x) in starts {
        match bins.last_mut() {
            Some(bin) if x - bin.center() <= config.column_tolerance => {
                bin.sum += x;
                bin.count += 1;
                bin.lines.insert(line_idx);
            }
            _ => {
                let mut lines = BTreeSet::new();
                lines.insert(line_idx);
                bins.push(ColumnBin {
                    sum: x,
                    count: 1,
                    lines,
                });
            }
        }
    }

    // Merge adjacent bins whose centers ended up closer than the
    // tolerance after averaging.
    let mut merged: Vec<ColumnBin> = Vec::new();
    for bin in bins {
        match merged.last_mut() {
            Some(last) if bin.center() - last.center() < config.column_tolerance => {
                last.absorb(&bin);
            }
            _ => merged.push(bin),
        }
    }

    merged
        .into_iter()
        .filter(|b| b.lines.len() >= config.min_column_support)
        .collect()
}

/// Index and distance of the closest column center.
fn nearest_column(centers: &[f32], x: f32) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (i, center) in centers.iter().enumerate() {
        let d = (x - center).abs();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}
