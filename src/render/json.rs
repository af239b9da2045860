//! JSON rendering for extraction results.

use crate::error::{Error, Result};
use crate::model::ExtractionResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an extraction result to JSON.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let rendered = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    rendered.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Line, PageEntry, TextBlock, Token};

    fn sample_result() -> ExtractionResult {
        let token = Token {
            text: "Bonjour".to_string(),
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 12.0,
            confidence: 0.93,
            page: 0,
        };
        let block = Block::Text(TextBlock {
            lines: vec![Line { tokens: vec![token] }],
        });
        ExtractionResult::from_pages(vec![PageEntry::new(0, 800, 1000, vec![block])])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample_result(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"pages\""));
        assert!(json.contains("Bonjour"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample_result(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.contains("\"confidence\""));
    }

    #[test]
    fn test_round_trips_through_serde() {
        let result = sample_result();
        let json = to_json(&result, JsonFormat::Compact).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
