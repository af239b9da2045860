//! Recognized token and line types.

use serde::{Deserialize, Serialize};

/// A single recognized text fragment with position and confidence.
///
/// Coordinates are in pixels of the rasterized page image, origin at the
/// top-left corner. Tokens are immutable once produced by the OCR
/// adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Recognized text
    pub text: String,

    /// Left edge in pixels
    pub x: f32,

    /// Top edge in pixels
    pub y: f32,

    /// Width in pixels
    pub width: f32,

    /// Height in pixels
    pub height: f32,

    /// Recognition confidence in [0, 1]
    pub confidence: f32,

    /// Zero-based index of the source page
    pub page: u32,
}

impl Token {
    /// Create a new token.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        confidence: f32,
        page: u32,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
            confidence: confidence.clamp(0.0, 1.0),
            page,
        }
    }

    /// Right edge in pixels.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge in pixels.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if the token carries only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A horizontal run of tokens sharing a vertical band.
///
/// Invariant: tokens are ordered left-to-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Tokens in reading order
    pub tokens: Vec<Token>,
}

impl Line {
    /// Create a line from tokens (caller guarantees ordering).
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Topmost edge of the line's tokens.
    pub fn top(&self) -> f32 {
        self.tokens
            .iter()
            .map(|t| t.y)
            .fold(f32::INFINITY, f32::min)
    }

    /// Bottommost edge of the line's tokens.
    pub fn bottom(&self) -> f32 {
        self.tokens
            .iter()
            .map(|t| t.bottom())
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Vertical extent of the line.
    pub fn height(&self) -> f32 {
        if self.tokens.is_empty() {
            0.0
        } else {
            self.bottom() - self.top()
        }
    }

    /// Leftmost edge of the line's tokens.
    pub fn left(&self) -> f32 {
        self.tokens
            .iter()
            .map(|t| t.x)
            .fold(f32::INFINITY, f32::min)
    }

    /// The line's text with single spaces between tokens.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the line has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
