//! Layout analysis over recognized tokens.
//!
//! Two deterministic passes run per page: [`layout`] merges the flat
//! token list into reading-order lines and blocks, and
//! [`table_detector`] reprojects blocks with aligned token columns into
//! row/column grids.

pub mod layout;
pub mod table_detector;

pub use layout::{reconstruct, LayoutConfig};
pub use table_detector::{structure_block, structure_blocks, TableConfig};
