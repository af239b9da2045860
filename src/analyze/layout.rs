//! Reading-order reconstruction from flat token lists.
//!
//! A single deterministic pass: stable sort by (top, left), group into
//! lines by vertical band overlap, then group lines into blocks by the
//! vertical gap relative to the median line height. No backtracking.

use crate::model::{Line, TextBlock, Token};

/// Thresholds for line and block grouping.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Minimum vertical overlap fraction (of the shorter band) for two
    /// tokens to share a line
    pub line_overlap: f32,

    /// A vertical gap above this multiple of the median line height
    /// starts a new block
    pub block_gap_factor: f32,
}

impl LayoutConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line overlap fraction.
    pub fn with_line_overlap(mut self, overlap: f32) -> Self {
        self.line_overlap = overlap;
        self
    }

    /// Set the block gap factor.
    pub fn with_block_gap_factor(mut self, factor: f32) -> Self {
        self.block_gap_factor = factor;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            block_gap_factor: 1.8,
        }
    }
}

/// Group a page's tokens into reading-order text blocks.
pub fn reconstruct(tokens: Vec<Token>, config: &LayoutConfig) -> Vec<TextBlock> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let lines = group_into_lines(tokens, config);
    group_into_blocks(lines, config)
}

/// Group tokens into lines by vertical band overlap.
///
/// Tokens are stable-sorted by (top, left) first, so two tokens with
/// identical vertical position order by horizontal position ascending.
fn group_into_lines(mut tokens: Vec<Token>, config: &LayoutConfig) -> Vec<Line> {
    tokens.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut band_top = 0.0f32;
    let mut band_bottom = 0.0f32;

    for token in tokens {
        if current.is_empty() {
            band_top = token.y;
            band_bottom = token.bottom();
            current.push(token);
            continue;
        }

        let overlap = band_bottom.min(token.bottom()) - band_top.max(token.y);
        let shorter = (band_bottom - band_top).min(token.height).max(f32::EPSILON);

        if overlap / shorter > config.line_overlap {
            band_top = band_top.min(token.y);
            band_bottom = band_bottom.max(token.bottom());
            current.push(token);
        } else {
            lines.push(finish_line(std::mem::take(&mut current)));
            band_top = token.y;
            band_bottom = token.bottom();
            current.push(token);
        }
    }

    if !current.is_empty() {
        lines.push(finish_line(current));
    }

    lines
}

/// Order a line's tokens left-to-right.
fn finish_line(mut tokens: Vec<Token>) -> Line {
    tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
    Line::new(tokens)
}

/// Group lines into blocks at gaps exceeding the median line height
/// times the configured factor.
fn group_into_blocks(lines: Vec<Line>, config: &LayoutConfig) -> Vec<TextBlock> {
    if lines.is_empty() {
        return Vec::new();
    }

    let median = median_line_height(&lines).max(1.0);
    let gap_threshold = median * config.block_gap_factor;

    let mut blocks: Vec<TextBlock> = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut prev_bottom = f32::NEG_INFINITY;

    for line in lines {
        let gap = line.top() - prev_bottom;
        if !current.is_empty() && gap > gap_threshold {
            log::debug!(
                "layout: block break at gap {:.1}px (threshold {:.1}px)",
                gap,
                gap_threshold
            );
            blocks.push(TextBlock::new(std::mem::take(&mut current)));
        }
        prev_bottom = line.bottom();
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(TextBlock::new(current));
    }

    blocks
}

/// Median of the line heights.
fn median_line_height(lines: &[Line]) -> f32 {
    let mut heights: Vec<f32> = lines.iter().map(|l| l.height()).collect();
    heights.sort_by(f32::total_cmp);
    heights[heights.len() / 2]
}
