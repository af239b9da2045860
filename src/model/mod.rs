//! Result model for OCR document extraction.
//!
//! This module defines the intermediate representation that bridges OCR
//! recognition and result rendering: recognized tokens, their grouping
//! into lines, blocks and tables, and the per-request aggregate.

mod page;
mod result;
mod table;
mod token;

pub use page::{Block, PageEntry, PageStatus, TextBlock};
pub use result::{ConfidenceSummary, ExtractionResult};
pub use table::{Table, TableCell, TableRow};
pub use token::{Line, Token};
