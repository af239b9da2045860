//! PDF rasterization via poppler's `pdftoppm`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use image::GrayImage;
use lopdf::Document as LopdfDocument;

use crate::detect::MediaType;
use crate::error::{Error, Result};

use super::{effective_dpi, PageImage, PageRender, Rasterizer};

/// Rasterizes PDF pages by invoking `pdftoppm` per page.
///
/// The PDF is first validated with `lopdf` to obtain the page count and
/// per-page MediaBox dimensions feeding the DPI policy. The actual
/// render is deferred: each returned [`PageRender`] invokes `pdftoppm`
/// for its single page when the pipeline worker asks for it, so no more
/// page buffers exist at once than there are workers, and a failure on
/// one page does not abort the rest of the document.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    binary: PathBuf,
}

impl PopplerRasterizer {
    /// Create a rasterizer using `pdftoppm` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("pdftoppm"),
        }
    }

    /// Use a specific `pdftoppm` binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Render one page of a staged PDF file to a grayscale buffer.
fn render_page(binary: &Path, input: &Path, page_num: u32, dpi: u32) -> Result<GrayImage> {
    let out_dir = tempfile::tempdir()?;
    let prefix = out_dir.path().join("page");

    let output = Command::new(binary)
        .arg("-f")
        .arg(page_num.to_string())
        .arg("-l")
        .arg(page_num.to_string())
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-png")
        .arg("-q")
        .arg(input)
        .arg(&prefix)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::EngineUnavailable("pdftoppm not found; install poppler-utils".to_string())
            } else {
                Error::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CorruptDocument(format!(
            "pdftoppm failed on page {}: {}",
            page_num,
            stderr.trim()
        )));
    }

    // pdftoppm pads the page number in the output name; glob the
    // single PNG it produced instead of guessing the padding.
    let produced = std::fs::read_dir(out_dir.path())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .find(|p| p.extension().is_some_and(|ext| ext == "png"))
        .ok_or_else(|| {
            Error::CorruptDocument(format!("pdftoppm produced no output for page {}", page_num))
        })?;

    let decoded = image::open(&produced)
        .map_err(|e| Error::CorruptDocument(format!("cannot decode rendered page: {}", e)))?;
    Ok(decoded.into_luma8())
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for PopplerRasterizer {
    fn rasterize(
        &self,
        data: &[u8],
        _media: MediaType,
        dpi: Option<u32>,
    ) -> Result<Vec<PageRender>> {
        let doc = LopdfDocument::load_mem(data)
            .map_err(|e| Error::CorruptDocument(format!("invalid PDF: {}", e)))?;

        let page_ids = doc.get_pages();
        if page_ids.is_empty() {
            return Err(Error::CorruptDocument("PDF has no pages".to_string()));
        }

        let mut input = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        input.write_all(data)?;
        input.flush()?;

        // The staged file must outlive every deferred render; the last
        // render to finish drops it.
        let input = Arc::new(input);

        let mut pages = Vec::with_capacity(page_ids.len());
        for (index, (page_num, page_id)) in page_ids.iter().enumerate() {
            let index = index as u32;
            let (width_pt, height_pt) = page_dimensions(&doc, *page_id);
            let page_dpi = effective_dpi(dpi, width_pt, height_pt);

            let binary = self.binary.clone();
            let input = Arc::clone(&input);
            let page_num = *page_num;
            pages.push(PageRender::new(index, move || {
                match render_page(&binary, input.path(), page_num, page_dpi) {
                    Ok(buffer) => Ok(PageImage::new(index, buffer)),
                    Err(e @ Error::EngineUnavailable(_)) => Err(e),
                    Err(e) => {
                        log::warn!("rasterization failed for page {}: {}", index, e);
                        Err(Error::PageRecognitionFailed {
                            page: index,
                            reason: e.to_string(),
                        })
                    }
                }
            }));
        }

        Ok(pages)
    }
}

/// Read a page's MediaBox dimensions in points, defaulting to Letter.
fn page_dimensions(doc: &LopdfDocument, page_id: lopdf::ObjectId) -> (f32, f32) {
    if let Ok(page_dict) = doc.get_dictionary(page_id) {
        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = media_box.as_array() {
                if array.len() >= 4 {
                    let width = array[2].as_float().unwrap_or(612.0);
                    let height = array[3].as_float().unwrap_or(792.0);
                    return (width, height);
                }
            }
        }
    }

    (612.0, 792.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};

    /// Build a minimal single-page PDF in memory.
    fn minimal_pdf() -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_garbage_pdf_is_corrupt() {
        let rasterizer = PopplerRasterizer::new();
        let result = rasterizer.rasterize(b"%PDF-1.7 garbage", MediaType::Pdf, None);
        assert!(matches!(result, Err(Error::CorruptDocument(_))));
    }

    #[test]
    fn test_missing_binary_is_engine_unavailable() {
        let pdf = minimal_pdf();
        let rasterizer = PopplerRasterizer::with_binary("pdftoppm-does-not-exist");
        // Planning succeeds; the failure surfaces when a page renders.
        let mut pages = rasterizer.rasterize(&pdf, MediaType::Pdf, None).unwrap();
        assert_eq!(pages.len(), 1);
        let result = pages.remove(0).render();
        assert!(matches!(result, Err(Error::EngineUnavailable(_))));
    }

    #[test]
    fn test_rasterize_defers_rendering() {
        // Planning a document must not invoke the renderer at all; a
        // nonexistent binary would fail any eager render.
        let pdf = minimal_pdf();
        let rasterizer = PopplerRasterizer::with_binary("pdftoppm-does-not-exist");
        let pages = rasterizer.rasterize(&pdf, MediaType::Pdf, None).unwrap();
        assert_eq!(pages[0].index(), 0);
    }

    #[test]
    fn test_page_dimensions_default() {
        let doc = LopdfDocument::load_mem(&minimal_pdf()).unwrap();
        let pages = doc.get_pages();
        let (_, page_id) = pages.iter().next().unwrap();
        let (w, h) = page_dimensions(&doc, *page_id);
        assert_eq!((w, h), (612.0, 792.0));
    }
}
