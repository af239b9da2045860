//! HTTP routes for document extraction.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use unscan::invoice::InvoiceFields;
use unscan::{
    CancelFlag, ExtractOptions, ExtractionResult, Extractor, Language, MediaType,
};

use crate::error::{ApiError, ApiResult};
use crate::signature;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(webhook_secret: Option<String>) -> Self {
        Self { webhook_secret }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(extract))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
/// GET /healthz
async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query parameters for extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractParams {
    /// Comma-separated language codes, e.g. `fra,eng`
    pub lang: Option<String>,

    /// Forced rasterization DPI
    pub dpi: Option<u32>,

    /// Token confidence floor in [0, 1]
    pub min_confidence: Option<f32>,

    /// Enable table detection (default true)
    pub tables: Option<bool>,

    /// Run invoice field extraction on the recognized text
    pub invoice: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub result: ExtractionResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceFields>,
}

/// Document extraction endpoint.
/// POST /extract with the raw document as the request body.
async fn extract(
    State(state): State<AppState>,
    Query(params): Query<ExtractParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ExtractResponse>> {
    if let Some(secret) = &state.webhook_secret {
        let provided = headers
            .get("x-webhook-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing X-Webhook-Signature header"))?;
        if !signature::verify(&body, secret, provided) {
            return Err(ApiError::unauthorized("invalid webhook signature"));
        }
    }

    if body.is_empty() {
        return Err(ApiError::bad_request("empty request body"));
    }

    let media = declared_media(&headers);
    let options = build_options(&params)?;
    let want_invoice = params.invoice.unwrap_or(false);

    run_extraction(body, media, options, want_invoice).await
}

/// Run the blocking extraction with a cancel-on-drop guard: if the
/// client disconnects and the handler future is dropped, the in-flight
/// extraction observes the flag and bails.
async fn run_extraction(
    body: Bytes,
    media: Option<MediaType>,
    options: ExtractOptions,
    want_invoice: bool,
) -> ApiResult<Json<ExtractResponse>> {
    struct CancelOnDrop(CancelFlag);
    impl Drop for CancelOnDrop {
        fn drop(&mut self) {
            self.0.cancel();
        }
    }
    let cancel = CancelFlag::new();
    let _guard = CancelOnDrop(cancel.clone());

    let options = options.with_cancel_flag(cancel);
    let handle = tokio::task::spawn_blocking(move || {
        let extractor = Extractor::new(options);
        let result = match media {
            Some(media) => extractor.extract_as(&body, media)?,
            None => extractor.extract(&body)?,
        };

        let invoice = want_invoice.then(|| unscan::extract_invoice_fields(&result));
        Ok::<_, unscan::Error>(ExtractResponse { result, invoice })
    });

    let response = handle
        .await
        .map_err(|e| ApiError::internal(format!("extraction task failed: {}", e)))??;

    info!(
        pages = response.result.page_count(),
        degraded = response.result.degraded_pages().count(),
        "extraction complete"
    );
    Ok(Json(response))
}

/// Resolve the media type declared in Content-Type, if any.
///
/// A missing or unrecognized header falls back to magic byte sniffing;
/// `application/octet-stream` is treated as undeclared.
fn declared_media(headers: &HeaderMap) -> Option<MediaType> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(MediaType::from_mime)
}

/// Translate query parameters into extraction options.
fn build_options(params: &ExtractParams) -> ApiResult<ExtractOptions> {
    let mut options = ExtractOptions::new();

    if let Some(lang) = &params.lang {
        options = options.with_languages(parse_languages(lang)?);
    }
    if let Some(dpi) = params.dpi {
        options = options.with_dpi(dpi);
    }
    if let Some(floor) = params.min_confidence {
        if !(0.0..=1.0).contains(&floor) {
            return Err(ApiError::bad_request("min_confidence must be in [0, 1]"));
        }
        options = options.with_min_confidence(floor);
    }
    if params.tables == Some(false) {
        options = options.without_tables();
    }

    Ok(options)
}

fn parse_languages(codes: &str) -> ApiResult<Vec<Language>> {
    codes
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|code| {
            Language::from_code(code)
                .ok_or_else(|| ApiError::bad_request(format!("unknown language code: {}", code)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_languages() {
        let langs = parse_languages("fra,eng").unwrap();
        assert_eq!(langs, vec![Language::French, Language::English]);
    }

    #[test]
    fn test_parse_languages_unknown_code() {
        let err = parse_languages("fra,klingon").unwrap_err();
        assert_eq!(err.code, "BAD_REQUEST");
    }

    #[test]
    fn test_parse_languages_ignores_blanks() {
        let langs = parse_languages(" fra , ,eng ").unwrap();
        assert_eq!(langs.len(), 2);
    }

    #[test]
    fn test_declared_media_from_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/pdf".parse().unwrap());
        assert_eq!(declared_media(&headers), Some(MediaType::Pdf));
    }

    #[test]
    fn test_declared_media_falls_back_on_octet_stream() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/octet-stream".parse().unwrap(),
        );
        assert_eq!(declared_media(&headers), None);
    }

    #[test]
    fn test_build_options_rejects_bad_floor() {
        let params = ExtractParams {
            min_confidence: Some(1.5),
            ..Default::default()
        };
        assert!(build_options(&params).is_err());
    }

    #[test]
    fn test_build_options_disables_tables() {
        let params = ExtractParams {
            tables: Some(false),
            ..Default::default()
        };
        let options = build_options(&params).unwrap();
        assert!(!options.detect_tables);
    }
}
