//! Plain text rendering for extraction results.

use std::fmt::Write as _;

use crate::model::{Block, ExtractionResult, PageStatus};

/// Convert an extraction result to plain text.
///
/// Pages are separated by `--- page N ---` markers (1-based). Degraded
/// pages render a bracketed note instead of content.
pub fn to_text(result: &ExtractionResult) -> String {
    let mut out = String::new();

    for page in &result.pages {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "--- page {} ---", page.index + 1);

        match &page.status {
            PageStatus::Degraded { reason } => {
                let _ = writeln!(out, "[degraded: {}]", reason);
            }
            PageStatus::Ok => {
                for block in &page.blocks {
                    match block {
                        Block::Text(text) => {
                            for line in &text.lines {
                                out.push_str(&line.text());
                                out.push('\n');
                            }
                        }
                        Block::Table(table) => {
                            out.push_str(&table.plain_text());
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, PageEntry, TextBlock, Token};

    fn word(text: &str, x: f32, page: u32) -> Token {
        Token {
            text: text.to_string(),
            x,
            y: 10.0,
            width: 40.0,
            height: 12.0,
            confidence: 0.9,
            page,
        }
    }

    #[test]
    fn test_page_separators() {
        let block = Block::Text(TextBlock {
            lines: vec![Line {
                tokens: vec![word("Hello", 10.0, 0), word("world", 60.0, 0)],
            }],
        });
        let pages = vec![
            PageEntry::new(0, 800, 1000, vec![block]),
            PageEntry::new(1, 800, 1000, vec![]),
        ];
        let text = to_text(&ExtractionResult::from_pages(pages));

        assert!(text.contains("--- page 1 ---"));
        assert!(text.contains("--- page 2 ---"));
        assert!(text.contains("Hello world"));
    }

    #[test]
    fn test_degraded_page_note() {
        let pages = vec![PageEntry::degraded(0, "render failed")];
        let text = to_text(&ExtractionResult::from_pages(pages));

        assert!(text.contains("[degraded: render failed]"));
    }

    #[test]
    fn test_empty_result() {
        let text = to_text(&ExtractionResult::from_pages(vec![]));
        assert!(text.is_empty());
    }
}
