// ---------------------------------------------------------------------------
// Table – one year's dataset, all cells as text
// ---------------------------------------------------------------------------

/// A header plus rows of text cells.
///
/// Every row has exactly `columns.len()` cells; missing values are stored as
/// empty strings so lookups never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows and truncating long ones to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell text at (`row`, `col`), empty when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Keep only rows whose `column` equals `value` exactly.
    /// Returns `None` (and leaves the table alone) when the column is absent.
    pub fn retain_equal(&mut self, column: &str, value: &str) -> Option<usize> {
        let idx = self.column_index(column)?;
        self.rows.retain(|row| row[idx] == value);
        Some(self.rows.len())
    }
}
