//! Document rasterization.
//!
//! Converts an input document (PDF or raster image) into a sequence of
//! grayscale page images at a controlled resolution. PDF pages are
//! rendered through poppler's `pdftoppm`; raster images pass through a
//! decode step. A failure confined to one page is carried as a per-page
//! error so the pipeline can return partial results.

mod poppler;

pub use poppler::PopplerRasterizer;

use image::GrayImage;

use crate::detect::MediaType;
use crate::error::{Error, Result};

/// A rasterized page ready for OCR.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Zero-based page index in the source document
    pub index: u32,

    /// Grayscale pixel buffer
    pub image: GrayImage,
}

impl PageImage {
    /// Create a page image from a grayscale buffer.
    pub fn new(index: u32, image: GrayImage) -> Self {
        Self { index, image }
    }

    /// Create a blank white page (useful in tests).
    pub fn blank(index: u32, width: u32, height: u32) -> Self {
        Self {
            index,
            image: GrayImage::from_pixel(width, height, image::Luma([255u8])),
        }
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A deferred page render.
///
/// Holds everything needed to produce one page image but no pixels yet;
/// [`PageRender::render`] does the actual work. Pages render inside
/// their worker task so a document never holds more full-resolution
/// buffers than there are workers.
pub struct PageRender {
    index: u32,
    render: Box<dyn FnOnce() -> Result<PageImage> + Send>,
}

impl PageRender {
    /// Defer a render to the given closure.
    pub fn new<F>(index: u32, render: F) -> Self
    where
        F: FnOnce() -> Result<PageImage> + Send + 'static,
    {
        Self {
            index,
            render: Box::new(render),
        }
    }

    /// Wrap an already-rendered page image.
    pub fn ready(image: PageImage) -> Self {
        let index = image.index;
        Self::new(index, move || Ok(image))
    }

    /// Wrap a per-page failure discovered before rendering.
    pub fn failed(index: u32, error: Error) -> Self {
        Self::new(index, move || Err(error))
    }

    /// Zero-based page index in the source document.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Produce the page image, consuming the deferred work.
    pub fn render(self) -> Result<PageImage> {
        (self.render)()
    }
}

impl std::fmt::Debug for PageRender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRender")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Converts document bytes into a sequence of deferred page renders.
pub trait Rasterizer: Send + Sync {
    /// Plan the rasterization at the requested DPI (None = policy
    /// default).
    ///
    /// Returns one deferred render per source page, in order, without
    /// rendering any pixels yet. Fails with `UnsupportedFormat` or
    /// `CorruptDocument` when the whole document cannot be processed.
    fn rasterize(
        &self,
        data: &[u8],
        media: MediaType,
        dpi: Option<u32>,
    ) -> Result<Vec<PageRender>>;
}

/// Default rasterizer: `image` decode for raster inputs, poppler for PDFs.
#[derive(Debug, Default)]
pub struct DocumentRasterizer {
    poppler: PopplerRasterizer,
}

impl DocumentRasterizer {
    /// Create a new rasterizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for DocumentRasterizer {
    fn rasterize(
        &self,
        data: &[u8],
        media: MediaType,
        dpi: Option<u32>,
    ) -> Result<Vec<PageRender>> {
        if media.is_image() {
            // A raster input is a single page; decoding doubles as the
            // corruption check, so it stays eager.
            let image = decode_image(data)?;
            Ok(vec![PageRender::ready(PageImage::new(0, image))])
        } else {
            self.poppler.rasterize(data, media, dpi)
        }
    }
}

/// Decode a raster image input into a grayscale buffer.
pub(crate) fn decode_image(data: &[u8]) -> Result<GrayImage> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| Error::CorruptDocument(format!("image decode failed: {}", e)))?;
    Ok(decoded.into_luma8())
}

/// Default rendering resolution in DPI.
pub const DEFAULT_DPI: u32 = 200;
/// Resolution used for small pages, where memory is not a concern.
pub const SMALL_PAGE_DPI: u32 = 300;
/// Pages whose longest side is below this (in points) count as small.
const SMALL_PAGE_PT: f32 = 350.0;
/// Cap on the longest rendered edge, in pixels.
const MAX_EDGE_PX: f32 = 4500.0;
/// Hard DPI bounds.
const MIN_DPI: u32 = 72;
const MAX_DPI: u32 = 600;

/// Pick the rendering DPI for a page.
///
/// Policy: the caller's override wins within bounds; otherwise small
/// pages are boosted for recognition accuracy and large pages are capped
/// so the longest rendered edge stays within [`MAX_EDGE_PX`].
pub(crate) fn effective_dpi(requested: Option<u32>, width_pt: f32, height_pt: f32) -> u32 {
    let longest_pt = width_pt.max(height_pt).max(1.0);

    let base = match requested {
        Some(dpi) => dpi,
        None if longest_pt < SMALL_PAGE_PT => SMALL_PAGE_DPI,
        None => DEFAULT_DPI,
    };

    // Keep the rendered long edge under the pixel cap.
    let cap = (MAX_EDGE_PX * 72.0 / longest_pt) as u32;

    base.min(cap.max(MIN_DPI)).clamp(MIN_DPI, MAX_DPI)
}
