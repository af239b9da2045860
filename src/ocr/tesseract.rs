//! Tesseract OCR adapter.
//!
//! Invokes the `tesseract` binary in TSV output mode, which reports one
//! row per detected element with geometry and a 0-100 confidence. Only
//! word-level rows (level 5) become tokens.

use std::path::PathBuf;
use std::process::Command;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::Token;
use crate::raster::PageImage;

use super::{language_arg, Language, OcrEngine};

/// TSV column layout produced by `tesseract ... tsv`.
const TSV_COLUMNS: usize = 12;
/// Row level for individual words.
const WORD_LEVEL: &str = "5";

/// OCR adapter backed by the `tesseract` command-line binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    /// Page segmentation mode passed as `--psm`
    psm: u8,
}

impl TesseractEngine {
    /// Create an engine using `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            psm: 3,
        }
    }

    /// Use a specific `tesseract` binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            psm: 3,
        }
    }

    /// Set the page segmentation mode.
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, page: &PageImage, langs: &[Language]) -> Result<Vec<Token>> {
        let staged = tempfile::Builder::new().suffix(".png").tempfile()?;
        page.image
            .save(staged.path())
            .map_err(|e| Error::PageRecognitionFailed {
                page: page.index,
                reason: format!("cannot stage page image: {}", e),
            })?;

        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(language_arg(langs))
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("tsv")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::EngineUnavailable(
                        "tesseract not found; install tesseract-ocr".to_string(),
                    )
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // A missing traineddata file means no request with these
            // languages can ever succeed.
            if stderr.contains("Failed loading language") {
                return Err(Error::EngineUnavailable(format!(
                    "tesseract language data missing: {}",
                    stderr.trim()
                )));
            }
            return Err(Error::PageRecognitionFailed {
                page: page.index,
                reason: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        Ok(parse_tsv(&tsv, page.index))
    }
}

/// Parse Tesseract TSV output into word tokens.
///
/// Rows with a negative confidence are structural (page/block/line
/// markers) and carry no text; they are skipped along with anything that
/// trims to empty. Text is NFC-normalized so accented characters compare
/// consistently.
pub(crate) fn parse_tsv(tsv: &str, page: u32) -> Vec<Token> {
    let mut tokens = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_COLUMNS || fields[0] != WORD_LEVEL {
            continue;
        }

        let conf: f32 = match fields[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }

        let text: String = fields[11].trim().nfc().collect();
        if text.is_empty() {
            continue;
        }

        let geom: Option<[f32; 4]> = fields[6..10]
            .iter()
            .map(|f| f.parse::<f32>().ok())
            .collect::<Option<Vec<f32>>>()
            .and_then(|v| v.try_into().ok());
        let Some([left, top, width, height]) = geom else {
            continue;
        };

        tokens.push(Token::new(text, left, top, width, height, conf / 100.0, page));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_tsv_words_only() {
        let tsv = format!(
            "{}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t800\t1100\t-1\t\n\
             5\t1\t1\t1\t1\t1\t72\t90\t120\t24\t96.5\tFacture\n\
             5\t1\t1\t1\t1\t2\t210\t92\t60\t22\t88.0\tn°42\n",
            HEADER
        );
        let tokens = parse_tsv(&tsv, 3);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Facture");
        assert_eq!(tokens[0].x, 72.0);
        assert_eq!(tokens[0].y, 90.0);
        assert!((tokens[0].confidence - 0.965).abs() < 1e-6);
        assert_eq!(tokens[0].page, 3);
        assert_eq!(tokens[1].text, "n°42");
    }

    #[test]
    fn test_parse_tsv_skips_blank_and_negative() {
        let tsv = format!(
            "{}\n\
             5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t-1\t\n\
             5\t1\t1\t1\t1\t2\t0\t0\t10\t10\t80\t   \n",
            HEADER
        );
        assert!(parse_tsv(&tsv, 0).is_empty());
    }

    #[test]
    fn test_parse_tsv_nfc_normalization() {
        // "é" as 'e' + combining acute accent normalizes to a single
        // precomposed code point.
        let decomposed = "e\u{0301}tiquette";
        let tsv = format!(
            "{}\n5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t90\t{}\n",
            HEADER, decomposed
        );
        let tokens = parse_tsv(&tsv, 0);
        assert_eq!(tokens[0].text, "étiquette");
    }

    #[test]
    fn test_parse_tsv_malformed_rows_skipped() {
        let tsv = format!("{}\n5\t1\t1\n5\t1\t1\t1\t1\t1\tx\ty\tw\th\t90\toops\n", HEADER);
        assert!(parse_tsv(&tsv, 0).is_empty());
    }

    #[test]
    fn test_missing_binary_is_engine_unavailable() {
        let engine = TesseractEngine::with_binary("tesseract-does-not-exist");
        let page = PageImage::blank(0, 8, 8);
        let result = engine.recognize(&page, &[Language::English]);
        assert!(matches!(result, Err(Error::EngineUnavailable(_))));
    }
}
