use super::format::{format_brl, parse_decimal};
use super::model::Table;

/// Footer figures for the current view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub records: usize,
    /// Sum of the amount column; `None` when the column is absent.
    pub amount: Option<f64>,
}

impl Summary {
    /// "Registros: 2 | Valor Total: R$ 1.322,56"
    pub fn label(&self) -> String {
        match self.amount {
            Some(sum) => format!(
                "Registros: {} | Valor Total: R$ {}",
                self.records,
                format_brl(sum)
            ),
            None => format!("Registros: {}", self.records),
        }
    }
}

/// Count the rows of `view` and sum `amount_column` over them; cells that do
/// not parse as numbers are skipped.
pub fn summarize(table: &Table, view: &[usize], amount_column: &str) -> Summary {
    let amount = table.column_index(amount_column).map(|col| {
        view.iter()
            .filter_map(|&row| parse_decimal(table.cell(row, col)))
            .sum::<f64>()
    });
    Summary {
        records: view.len(),
        amount,
    }
}
