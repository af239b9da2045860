//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{Line, Table, Token};

/// A single page's extraction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Zero-based page index in the source document
    pub index: u32,

    /// Rendered page width in pixels (0 for degraded pages)
    pub width: u32,

    /// Rendered page height in pixels (0 for degraded pages)
    pub height: u32,

    /// Processing status for this page
    pub status: PageStatus,

    /// Content blocks in reading order
    pub blocks: Vec<Block>,
}

impl PageEntry {
    /// Create a successfully processed page.
    pub fn new(index: u32, width: u32, height: u32, blocks: Vec<Block>) -> Self {
        Self {
            index,
            width,
            height,
            status: PageStatus::Ok,
            blocks,
        }
    }

    /// Create a degraded page with empty content.
    pub fn degraded(index: u32, reason: impl Into<String>) -> Self {
        Self {
            index,
            width: 0,
            height: 0,
            status: PageStatus::Degraded {
                reason: reason.into(),
            },
            blocks: Vec::new(),
        }
    }

    /// Whether the page was processed successfully.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, PageStatus::Ok)
    }

    /// Iterate over all tokens retained on the page.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.blocks.iter().flat_map(|b| b.tokens())
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Processing status of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageStatus {
    /// The page was rasterized and recognized normally.
    Ok,
    /// A recoverable failure left this page without content.
    Degraded {
        /// What went wrong
        reason: String,
    },
}

/// A content block on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A plain text block (paragraph-like group of lines)
    Text(TextBlock),

    /// A structured table
    Table(Table),
}

impl Block {
    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Iterate over the block's tokens.
    pub fn tokens(&self) -> Box<dyn Iterator<Item = &Token> + '_> {
        match self {
            Block::Text(t) => Box::new(t.lines.iter().flat_map(|l| l.tokens.iter())),
            Block::Table(t) => Box::new(
                t.rows
                    .iter()
                    .flat_map(|r| r.cells.iter())
                    .flat_map(|c| c.tokens.iter()),
            ),
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Text(t) => t.plain_text(),
            Block::Table(t) => t.plain_text(),
        }
    }
}

/// A reading-order group of lines forming a paragraph-like region.
///
/// Invariant: lines are ordered top-to-bottom; tokens within a line are
/// ordered left-to-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Lines in reading order
    pub lines: Vec<Line>,
}

impl TextBlock {
    /// Create a text block from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Get the block's text, one line per row.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the block has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
