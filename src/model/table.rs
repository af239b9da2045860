//! Table types.

use serde::{Deserialize, Serialize};

use super::Token;

/// A rectangular grid of cells reconstructed from aligned token columns.
///
/// Invariant: every row has exactly `column_count` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in top-to-bottom order
    pub rows: Vec<TableRow>,

    /// Number of columns, consistent across all rows
    pub column_count: usize,
}

impl Table {
    /// Create a table from rows (caller guarantees consistent widths).
    pub fn new(rows: Vec<TableRow>, column_count: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.cells.len() == column_count));
        Self { rows, column_count }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row-major list of cell texts.
    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text()).collect())
            .collect()
    }

    /// Tab-separated plain text representation.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in left-to-right column order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell holding zero or more tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Tokens in left-to-right order; empty for a blank cell
    pub tokens: Vec<Token>,
}

impl TableCell {
    /// Create a cell from tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self { tokens: Vec::new() }
    }

    /// The cell's text with single spaces between tokens.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> TableCell {
        TableCell::new(vec![Token::new(text, 0.0, 0.0, 10.0, 10.0, 0.9, 0)])
    }

    #[test]
    fn test_table_shape() {
        let table = Table::new(
            vec![
                TableRow::new(vec![cell("Article"), cell("Prix")]),
                TableRow::new(vec![cell("Pommes"), cell("3,20")]),
                TableRow::new(vec![cell("Poires"), TableCell::empty()]),
            ],
            2,
        );

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count, 2);
        assert!(!table.is_empty());
        assert!(table.rows[2].cells[1].is_empty());
    }

    #[test]
    fn test_cell_texts_row_major() {
        let table = Table::new(
            vec![
                TableRow::new(vec![cell("a"), cell("b")]),
                TableRow::new(vec![cell("c"), cell("d")]),
            ],
            2,
        );
        assert_eq!(
            table.cell_texts(),
            vec![vec!["a".to_string(), "b".into()], vec!["c".into(), "d".into()]]
        );
    }

    #[test]
    fn test_plain_text() {
        let table = Table::new(vec![TableRow::new(vec![cell("x"), cell("y")])], 2);
        assert_eq!(table.plain_text(), "x\ty");
    }
}
