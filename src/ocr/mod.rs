//! OCR engine adapters.
//!
//! The pipeline talks to recognition engines through the [`OcrEngine`]
//! trait; [`TesseractEngine`] is the production adapter and tests plug
//! in mock engines. Engine instances are never shared between
//! concurrent page tasks; see [`EnginePool`] for checkout semantics.

mod pool;
mod tesseract;

pub use pool::{EngineLease, EnginePool};
pub use tesseract::TesseractEngine;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Token;
use crate::raster::PageImage;

/// Recognition languages supported by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// French
    French,
    /// English
    English,
    /// German
    German,
    /// Spanish
    Spanish,
    /// Italian
    Italian,
}

impl Language {
    /// The Tesseract traineddata code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fra",
            Language::English => "eng",
            Language::German => "deu",
            Language::Spanish => "spa",
            Language::Italian => "ita",
        }
    }

    /// Parse a language code ("fra", "eng", ...).
    pub fn from_code(code: &str) -> Option<Language> {
        match code.to_ascii_lowercase().as_str() {
            "fra" | "fr" => Some(Language::French),
            "eng" | "en" => Some(Language::English),
            "deu" | "de" => Some(Language::German),
            "spa" | "es" => Some(Language::Spanish),
            "ita" | "it" => Some(Language::Italian),
            _ => None,
        }
    }

    /// Default language set: French primary with English secondary.
    pub fn default_set() -> Vec<Language> {
        vec![Language::French, Language::English]
    }
}

/// Join languages into a Tesseract `-l` argument ("fra+eng").
pub(crate) fn language_arg(langs: &[Language]) -> String {
    if langs.is_empty() {
        return Language::English.code().to_string();
    }
    langs
        .iter()
        .map(|l| l.code())
        .collect::<Vec<_>>()
        .join("+")
}

/// A text recognition engine operating on one page image at a time.
///
/// Implementations may hold per-session state; exclusivity is enforced
/// by [`EnginePool`] checkout, never by internal locking.
pub trait OcrEngine: Send {
    /// Recognize tokens on a page image.
    ///
    /// # Errors
    /// * `EngineUnavailable` - the engine cannot be invoked at all
    ///   (fatal for the whole request)
    /// * `PageRecognitionFailed` - this page only (recoverable)
    fn recognize(&self, page: &PageImage, langs: &[Language]) -> Result<Vec<Token>>;
}

/// Drop blank detections and tokens below the confidence floor.
///
/// Whitespace-only detections normalize to empty and are removed; the
/// floor is compared against the token's [0, 1] confidence.
pub fn filter_tokens(tokens: Vec<Token>, min_confidence: f32) -> Vec<Token> {
    tokens
        .into_iter()
        .filter(|t| !t.is_blank() && t.confidence >= min_confidence)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::French.code(), "fra");
        assert_eq!(Language::from_code("ENG"), Some(Language::English));
        assert_eq!(Language::from_code("fr"), Some(Language::French));
        assert_eq!(Language::from_code("klingon"), None);
    }

    #[test]
    fn test_language_arg() {
        assert_eq!(language_arg(&[Language::French, Language::English]), "fra+eng");
        assert_eq!(language_arg(&[]), "eng");
    }

    #[test]
    fn test_default_set() {
        assert_eq!(
            Language::default_set(),
            vec![Language::French, Language::English]
        );
    }

    #[test]
    fn test_filter_tokens() {
        let tokens = vec![
            Token::new("Facture", 0.0, 0.0, 50.0, 10.0, 0.92, 0),
            Token::new("   ", 60.0, 0.0, 10.0, 10.0, 0.95, 0),
            Token::new("n°", 80.0, 0.0, 15.0, 10.0, 0.05, 0),
        ];
        let kept = filter_tokens(tokens, 0.10);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Facture");
    }

    #[test]
    fn test_filter_tokens_zero_floor_keeps_nonblank() {
        let tokens = vec![Token::new("a", 0.0, 0.0, 5.0, 5.0, 0.0, 0)];
        assert_eq!(filter_tokens(tokens, 0.0).len(), 1);
    }
}
