//! Invoice field extraction heuristics.
//!
//! Pulls common French invoice fields (supplier, invoice number, date,
//! totals, VAT) out of recognized text. Extraction never fails: fields
//! that cannot be located stay `None`.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::ExtractionResult;

static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{2}[/\-.]\d{2}[/\-.]\d{4}|\d{4}[/\-.]\d{2}[/\-.]\d{2})\b")
        .unwrap_or_else(|e| panic!("invalid date regex: {e}"))
});

static RE_VAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)TVA[:\s]*([0-9.,]{1,20}%?)").unwrap_or_else(|e| panic!("invalid VAT regex: {e}"))
});

static RE_TOTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Total\s*(?:TTC|HT)?[:\s]*([0-9.,\s€]{1,30})")
        .unwrap_or_else(|e| panic!("invalid total regex: {e}"))
});

static RE_INVOICE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Facture\s*(?:n[o°]?)?[:\s\-]|N[°o]\s[:#\s-]*)([A-Za-z0-9\-/_.]+)")
        .unwrap_or_else(|e| panic!("invalid invoice number regex: {e}"))
});

static RE_SUPPLIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Fournisseur|Soci[eé]t[eé]|Vendeur|Émetteur)[:\s]*([A-Za-z0-9 \-.,&]+)")
        .unwrap_or_else(|e| panic!("invalid supplier regex: {e}"))
});

static RE_CLIENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Factur(?:é|ee)\s+à|Client)\s*:?\s*(.+)")
        .unwrap_or_else(|e| panic!("invalid client regex: {e}"))
});

static RE_NOISE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)facture|total|tva|client")
        .unwrap_or_else(|e| panic!("invalid noise regex: {e}"))
});

/// Fields recognized on an invoice. All optional; extraction degrades
/// to `None` rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    /// Billed client name
    pub client: Option<String>,

    /// Supplier / issuer name
    pub supplier: Option<String>,

    /// Invoice number
    pub invoice_number: Option<String>,

    /// Invoice date as printed (not parsed into a calendar date)
    pub invoice_date: Option<String>,

    /// Total excluding tax ("Total HT")
    pub total_excl_tax: Option<String>,

    /// Total including tax ("Total TTC")
    pub total_incl_tax: Option<String>,

    /// VAT amount or rate as printed
    pub vat: Option<String>,

    /// When the extraction ran
    pub extracted_at: DateTime<Utc>,
}

/// Extract invoice fields from an extraction result's plain text.
pub fn extract_invoice_fields(result: &ExtractionResult) -> InvoiceFields {
    extract_from_text(&result.plain_text())
}

/// Extract invoice fields from raw text.
pub fn extract_from_text(text: &str) -> InvoiceFields {
    let (total_excl_tax, total_incl_tax) = find_totals(text);

    InvoiceFields {
        client: find_client(text),
        supplier: find_supplier(text),
        invoice_number: RE_INVOICE_NUMBER
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string()),
        invoice_date: RE_DATE.find(text).map(|m| m.as_str().to_string()),
        total_excl_tax,
        total_incl_tax,
        vat: RE_VAT
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string()),
        extracted_at: Utc::now(),
    }
}

/// Locate "Total HT" and "Total TTC" amounts.
///
/// The label variant is decided from the text immediately before each
/// match; an unqualified "Total" counts as TTC when none was seen yet.
fn find_totals(text: &str) -> (Option<String>, Option<String>) {
    let mut total_ht = None;
    let mut total_ttc = None;

    for caps in RE_TOTAL.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let value = m.as_str().trim().to_string();
        if value.is_empty() {
            continue;
        }

        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or("").to_uppercase();
        if whole.contains("TTC") {
            total_ttc = Some(value);
        } else if whole.contains("HT") {
            total_ht = Some(value);
        } else if total_ttc.is_none() {
            total_ttc = Some(value);
        }
    }

    (total_ht, total_ttc)
}

fn find_supplier(text: &str) -> Option<String> {
    if let Some(caps) = RE_SUPPLIER.captures(text) {
        if let Some(m) = caps.get(1) {
            return Some(m.as_str().trim().to_string());
        }
    }

    // Fallback: the first substantial line that is not invoice noise is
    // usually the letterhead.
    text.lines()
        .map(str::trim)
        .find(|line| line.len() > 3 && !RE_NOISE_LINE.is_match(line))
        .map(str::to_string)
}

fn find_client(text: &str) -> Option<String> {
    let caps = RE_CLIENT.captures(text)?;
    let tail = caps.get(1)?.as_str().trim();
    tail.lines().next().map(|l| l.trim().to_string())
}
