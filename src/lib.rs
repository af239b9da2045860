//! # unscan
//!
//! OCR-backed document extraction library for Rust.
//!
//! This library rasterizes PDFs and raster images, recognizes their text
//! through an OCR engine, and reconstructs the recognized words into
//! structured pages of text blocks and tables.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unscan::{extract_bytes, render};
//!
//! fn main() -> unscan::Result<()> {
//!     let data = std::fs::read("invoice.pdf")?;
//!     let result = extract_bytes(&data)?;
//!
//!     println!("{}", render::to_text(&result));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **PDF and image input**: PDF, PNG, JPEG, TIFF, BMP
//! - **Layout reconstruction**: words grouped into lines and blocks
//! - **Table detection**: column-aligned blocks become structured tables
//! - **Per-page degradation**: one bad page never fails the document
//! - **Parallel processing**: uses Rayon for multi-page documents
//! - **Invoice heuristics**: French invoice field extraction
//!
//! External tools `pdftoppm` (poppler-utils) and `tesseract` must be on
//! the `PATH`; their absence surfaces as [`Error::EngineUnavailable`].

pub mod analyze;
pub mod detect;
pub mod error;
pub mod invoice;
pub mod model;
pub mod ocr;
pub mod pipeline;
pub mod raster;
pub mod render;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, MediaType};
pub use error::{Error, Result};
pub use invoice::{extract_invoice_fields, InvoiceFields};
pub use model::{
    Block, ConfidenceSummary, ExtractionResult, Line, PageEntry, PageStatus, Table, TableCell,
    TableRow, TextBlock, Token,
};
pub use ocr::Language;
pub use pipeline::{CancelFlag, ExtractOptions, Extractor};
pub use render::JsonFormat;

/// Extract a document from bytes using default options.
///
/// Input format is sniffed from magic bytes.
///
/// # Example
///
/// ```no_run
/// use unscan::extract_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let result = extract_bytes(&data).unwrap();
/// println!("Pages: {}", result.page_count());
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<ExtractionResult> {
    Extractor::new(ExtractOptions::default()).extract(data)
}

/// Extract a document from bytes with custom options.
///
/// # Example
///
/// ```no_run
/// use unscan::{extract_bytes_with_options, ExtractOptions, Language};
///
/// let options = ExtractOptions::new()
///     .with_languages(vec![Language::French])
///     .with_dpi(300);
/// let data = std::fs::read("scan.png").unwrap();
/// let result = extract_bytes_with_options(&data, options).unwrap();
/// ```
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<ExtractionResult> {
    Extractor::new(options).extract(data)
}

/// Extract a document from bytes with a caller-asserted media type,
/// skipping magic byte sniffing.
pub fn extract_bytes_as(
    data: &[u8],
    media: MediaType,
    options: ExtractOptions,
) -> Result<ExtractionResult> {
    Extractor::new(options).extract_as(data, media)
}

/// Builder for configuring and running document extraction.
///
/// # Example
///
/// ```no_run
/// use unscan::{Language, Unscan};
///
/// let result = Unscan::new()
///     .with_languages(vec![Language::French, Language::English])
///     .with_dpi(300)
///     .without_tables()
///     .extract(&std::fs::read("invoice.pdf")?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Unscan {
    options: ExtractOptions,
}

impl Unscan {
    /// Create a new Unscan builder.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Set recognition languages.
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.options = self.options.with_languages(languages);
        self
    }

    /// Force a rasterization DPI instead of the per-page policy.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.options = self.options.with_dpi(dpi);
        self
    }

    /// Set the confidence floor below which tokens are dropped.
    pub fn with_min_confidence(mut self, floor: f32) -> Self {
        self.options = self.options.with_min_confidence(floor);
        self
    }

    /// Disable table detection; all blocks stay plain text.
    pub fn without_tables(mut self) -> Self {
        self.options = self.options.without_tables();
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.options = self.options.with_cancel_flag(cancel);
        self
    }

    /// Extract from bytes, sniffing the input format.
    pub fn extract(self, data: &[u8]) -> Result<ExtractionResult> {
        Extractor::new(self.options).extract(data)
    }

    /// Extract from bytes with a known media type.
    pub fn extract_as(self, data: &[u8], media: MediaType) -> Result<ExtractionResult> {
        Extractor::new(self.options).extract_as(data, media)
    }
}

impl Default for Unscan {
    fn default() -> Self {
        Self::new()
    }
}
