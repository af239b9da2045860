//! Input format detection and validation.

use crate::error::{Error, Result};

/// Supported input media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// PDF document (rasterized page by page)
    Pdf,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl MediaType {
    /// Whether this is a single-page raster image type.
    pub fn is_image(&self) -> bool {
        !matches!(self, MediaType::Pdf)
    }

    /// The canonical MIME type.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Tiff => "image/tiff",
            MediaType::Bmp => "image/bmp",
        }
    }

    /// Map a declared MIME type to a supported media type.
    ///
    /// Parameters after `;` are ignored. Returns `None` for anything
    /// outside the supported set.
    pub fn from_mime(mime: &str) -> Option<MediaType> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            "image/png" => Some(MediaType::Png),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            "image/tiff" => Some(MediaType::Tiff),
            "image/bmp" => Some(MediaType::Bmp),
            _ => None,
        }
    }

    /// Sniff the media type from leading magic bytes.
    ///
    /// # Returns
    /// * `Err(Error::CorruptDocument)` for empty input
    /// * `Err(Error::UnsupportedFormat)` when no known magic matches
    pub fn sniff(data: &[u8]) -> Result<MediaType> {
        if data.is_empty() {
            return Err(Error::CorruptDocument("empty input".to_string()));
        }

        if data.starts_with(PDF_MAGIC) {
            return Ok(MediaType::Pdf);
        }
        if data.starts_with(PNG_MAGIC) {
            return Ok(MediaType::Png);
        }
        if data.starts_with(JPEG_MAGIC) {
            return Ok(MediaType::Jpeg);
        }
        if data.starts_with(TIFF_MAGIC_LE) || data.starts_with(TIFF_MAGIC_BE) {
            return Ok(MediaType::Tiff);
        }
        if data.starts_with(BMP_MAGIC) {
            return Ok(MediaType::Bmp);
        }

        Err(Error::UnsupportedFormat(
            "input matches no supported magic bytes".to_string(),
        ))
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const TIFF_MAGIC_LE: &[u8] = b"II*\x00";
const TIFF_MAGIC_BE: &[u8] = b"MM\x00*";
const BMP_MAGIC: &[u8] = b"BM";

/// Check if bytes look like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(MediaType::sniff(data).unwrap(), MediaType::Pdf);
    }

    #[test]
    fn test_sniff_png() {
        let data = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(MediaType::sniff(&data).unwrap(), MediaType::Png);
    }

    #[test]
    fn test_sniff_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(MediaType::sniff(&data).unwrap(), MediaType::Jpeg);
    }

    #[test]
    fn test_sniff_empty_is_corrupt() {
        let result = MediaType::sniff(&[]);
        assert!(matches!(result, Err(Error::CorruptDocument(_))));
    }

    #[test]
    fn test_sniff_unknown_magic() {
        let result = MediaType::sniff(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(MediaType::from_mime("application/pdf"), Some(MediaType::Pdf));
        assert_eq!(
            MediaType::from_mime("image/jpeg; charset=binary"),
            Some(MediaType::Jpeg)
        );
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("text/html"), None);
    }

    #[test]
    fn test_is_image() {
        assert!(!MediaType::Pdf.is_image());
        assert!(MediaType::Png.is_image());
        assert!(MediaType::Jpeg.is_image());
        assert!(MediaType::Tiff.is_image());
        assert!(MediaType::Bmp.is_image());
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
