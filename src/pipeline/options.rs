//! Extraction options and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analyze::{LayoutConfig, TableConfig};
use crate::ocr::Language;

/// Cooperative cancellation flag for a single extraction request.
///
/// Clones share the same flag. Cancelling stops the pipeline from
/// dispatching further page work; in-flight buffers are discarded and
/// the request fails with `Error::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a fresh, uncancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for a single extraction request.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Recognition languages, in priority order
    pub languages: Vec<Language>,

    /// DPI override (None = per-page policy default)
    pub dpi: Option<u32>,

    /// Minimum token confidence in [0, 1]; lower detections are dropped
    pub min_confidence: f32,

    /// Whether to reproject aligned blocks into tables
    pub detect_tables: bool,

    /// Whether pages are processed on the worker pool
    pub parallel: bool,

    /// Line/block grouping thresholds
    pub layout: LayoutConfig,

    /// Table classification thresholds
    pub table: TableConfig,

    /// Cancellation flag for this request
    pub cancel: CancelFlag,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recognition languages.
    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    /// Override the rasterization DPI.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Set the minimum token confidence floor.
    pub fn with_min_confidence(mut self, floor: f32) -> Self {
        self.min_confidence = floor;
        self
    }

    /// Disable table detection; all blocks come back as plain text.
    pub fn without_tables(mut self) -> Self {
        self.detect_tables = false;
        self
    }

    /// Process pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set table thresholds.
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Attach a cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            languages: Language::default_set(),
            dpi: None,
            min_confidence: 0.10,
            detect_tables: true,
            parallel: true,
            layout: LayoutConfig::default(),
            table: TableConfig::default(),
            cancel: CancelFlag::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.languages, Language::default_set());
        assert_eq!(options.dpi, None);
        assert!((options.min_confidence - 0.10).abs() < 1e-6);
        assert!(options.detect_tables);
        assert!(options.parallel);
        assert!(!options.cancel.is_cancelled());
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_languages(vec![Language::German])
            .with_dpi(300)
            .with_min_confidence(0.25)
            .without_tables()
            .sequential();

        assert_eq!(options.languages, vec![Language::German]);
        assert_eq!(options.dpi, Some(300));
        assert_eq!(options.min_confidence, 0.25);
        assert!(!options.detect_tables);
        assert!(!options.parallel);
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }
}
