//! Request-level aggregate types.

use serde::{Deserialize, Serialize};

use super::{PageEntry, Table};

/// Per-document extraction aggregate.
///
/// Pages are always present in original document order, regardless of
/// per-page completion order. Created once per request and discarded
/// after the response is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Page entries in source order
    pub pages: Vec<PageEntry>,

    /// Overall confidence summary over retained tokens
    pub confidence: ConfidenceSummary,
}

impl ExtractionResult {
    /// Assemble a result from ordered page entries.
    pub fn from_pages(pages: Vec<PageEntry>) -> Self {
        let confidence = ConfidenceSummary::from_pages(&pages);
        Self { pages, confidence }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Iterate over pages that were degraded.
    pub fn degraded_pages(&self) -> impl Iterator<Item = &PageEntry> {
        self.pages.iter().filter(|p| !p.is_ok())
    }

    /// Iterate over all detected tables in page order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.pages.iter().flat_map(|p| {
            p.blocks.iter().filter_map(|b| match b {
                super::Block::Table(t) => Some(t),
                super::Block::Text(_) => None,
            })
        })
    }

    /// Get plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Token-count-weighted confidence over the whole result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    /// Mean confidence of retained tokens; 0.0 when no tokens
    pub mean: f32,

    /// Number of retained tokens
    pub token_count: usize,
}

impl ConfidenceSummary {
    /// Compute the summary over all tokens in the given pages.
    pub fn from_pages(pages: &[PageEntry]) -> Self {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for page in pages {
            for token in page.tokens() {
                sum += f64::from(token.confidence);
                count += 1;
            }
        }
        let mean = if count == 0 {
            0.0
        } else {
            (sum / count as f64) as f32
        };
        Self {
            mean,
            token_count: count,
        }
    }
}

impl Default for ConfidenceSummary {
    fn default() -> Self {
        Self {
            mean: 0.0,
            token_count: 0,
        }
    }
}
