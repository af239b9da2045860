//! Extraction pipeline orchestration.
//!
//! Fans page work out over a bounded worker pool, folds the results
//! back in source order, and absorbs per-page recoverable failures as
//! degraded entries. Engine-level failures abort the whole request.

mod options;

pub use options::{CancelFlag, ExtractOptions};

use rayon::prelude::*;

use crate::analyze;
use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::model::{ExtractionResult, PageEntry};
use crate::ocr::{self, EnginePool, TesseractEngine};
use crate::raster::{DocumentRasterizer, PageRender, Rasterizer};

/// Document extraction pipeline.
///
/// Owns the rasterizer and a pool of OCR engines; both seams are
/// injectable so tests can substitute deterministic implementations.
pub struct Extractor {
    rasterizer: Box<dyn Rasterizer>,
    engines: EnginePool,
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the default rasterizer and a Tesseract
    /// pool sized to the worker thread count.
    pub fn new(options: ExtractOptions) -> Self {
        let pool_size = rayon::current_num_threads();
        Self {
            rasterizer: Box::new(DocumentRasterizer::new()),
            engines: EnginePool::new(pool_size, || Box::new(TesseractEngine::new())),
            options,
        }
    }

    /// Replace the rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Replace the engine pool.
    pub fn with_engine_pool(mut self, engines: EnginePool) -> Self {
        self.engines = engines;
        self
    }

    /// Extract a document, sniffing its media type from magic bytes.
    pub fn extract(&self, data: &[u8]) -> Result<ExtractionResult> {
        let media = MediaType::sniff(data)?;
        self.extract_as(data, media)
    }

    /// Extract a document with a declared media type.
    pub fn extract_as(&self, data: &[u8], media: MediaType) -> Result<ExtractionResult> {
        if self.options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let renders = self.rasterizer.rasterize(data, media, self.options.dpi)?;
        log::debug!("pipeline: planned {} pages", renders.len());

        let pages: Vec<PageEntry> = if self.options.parallel {
            renders
                .into_par_iter()
                .map(|page| self.process_page(page))
                .collect::<Result<_>>()?
        } else {
            renders
                .into_iter()
                .map(|page| self.process_page(page))
                .collect::<Result<_>>()?
        };

        // Discard everything from a cancelled request, even if some
        // pages completed before the flag was observed.
        if self.options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        Ok(ExtractionResult::from_pages(pages))
    }

    /// Render and process one page into a page entry.
    ///
    /// The deferred render runs here, inside the worker task, so at most
    /// one full-resolution page buffer exists per worker and a cancelled
    /// request stops rendering further pages. Recoverable failures
    /// (rasterization or recognition of this page) become degraded
    /// entries; `EngineUnavailable` propagates and fails the request.
    fn process_page(&self, page: PageRender) -> Result<PageEntry> {
        if self.options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let index = page.index();
        let image = match page.render() {
            Ok(image) => image,
            Err(e @ Error::EngineUnavailable(_)) => return Err(e),
            Err(e) => {
                log::warn!("pipeline: page {} degraded: {}", index, e);
                return Ok(PageEntry::degraded(index, e.to_string()));
            }
        };

        let lease = self.engines.checkout()?;
        let tokens = match lease.recognize(&image, &self.options.languages) {
            Ok(tokens) => tokens,
            Err(e @ Error::EngineUnavailable(_)) => return Err(e),
            Err(e @ Error::Cancelled) => return Err(e),
            Err(e) => {
                log::warn!("pipeline: page {} degraded: {}", index, e);
                return Ok(PageEntry::degraded(index, e.to_string()));
            }
        };
        drop(lease);

        let tokens = ocr::filter_tokens(tokens, self.options.min_confidence);
        log::debug!("pipeline: page {} retained {} tokens", index, tokens.len());

        let text_blocks = analyze::reconstruct(tokens, &self.options.layout);
        let blocks = if self.options.detect_tables {
            analyze::structure_blocks(text_blocks, &self.options.table)
        } else {
            text_blocks
                .into_iter()
                .map(crate::model::Block::Text)
                .collect()
        };

        Ok(PageEntry::new(
            index,
            image.width(),
            image.height(),
            blocks,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Token;
    use crate::ocr::{Language, OcrEngine};
    use crate::raster::PageImage;

    /// Engine returning a fixed token per page.
    struct FixedEngine;

    impl OcrEngine for FixedEngine {
        fn recognize(&self, page: &PageImage, _langs: &[Language]) -> Result<Vec<Token>> {
            Ok(vec![Token::new(
                format!("page-{}", page.index),
                10.0,
                10.0,
                40.0,
                12.0,
                0.9,
                page.index,
            )])
        }
    }

    struct BlankRasterizer {
        pages: u32,
    }

    impl Rasterizer for BlankRasterizer {
        fn rasterize(
            &self,
            _data: &[u8],
            _media: MediaType,
            _dpi: Option<u32>,
        ) -> Result<Vec<PageRender>> {
            Ok((0..self.pages)
                .map(|i| PageRender::ready(PageImage::blank(i, 100, 100)))
                .collect())
        }
    }

    fn extractor(pages: u32) -> Extractor {
        Extractor::new(ExtractOptions::default())
            .with_rasterizer(Box::new(BlankRasterizer { pages }))
            .with_engine_pool(EnginePool::new(2, || Box::new(FixedEngine)))
    }

    #[test]
    fn test_pages_in_source_order() {
        let result = extractor(8).extract_as(b"stub", MediaType::Pdf).unwrap();
        assert_eq!(result.page_count(), 8);
        for (i, page) in result.pages.iter().enumerate() {
            assert_eq!(page.index, i as u32);
            assert_eq!(page.plain_text(), format!("page-{}", i));
        }
    }

    #[test]
    fn test_cancel_before_start() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let ex = Extractor::new(ExtractOptions::default().with_cancel_flag(cancel))
            .with_rasterizer(Box::new(BlankRasterizer { pages: 3 }))
            .with_engine_pool(EnginePool::new(1, || Box::new(FixedEngine)));

        let result = ex.extract_as(b"stub", MediaType::Pdf);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let parallel = extractor(4).extract_as(b"stub", MediaType::Pdf).unwrap();

        let sequential = Extractor::new(ExtractOptions::default().sequential())
            .with_rasterizer(Box::new(BlankRasterizer { pages: 4 }))
            .with_engine_pool(EnginePool::new(1, || Box::new(FixedEngine)))
            .extract_as(b"stub", MediaType::Pdf)
            .unwrap();

        assert_eq!(parallel, sequential);
    }
}
