use chrono::{NaiveDate, NaiveDateTime};

use super::model::Table;
use crate::config::{FILTER_COLUMNS, UNIT_CODE, UNIT_COLUMN};

// ---------------------------------------------------------------------------
// Filter state: free-text field per column plus an optional exact date
// ---------------------------------------------------------------------------

/// One free-text filter input bound to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub column: String,
    /// Case-insensitive substring; empty means "no constraint".
    pub text: String,
    /// Fixed fields (the unit code) cannot be edited or cleared.
    pub read_only: bool,
}

/// Active filters of one year tab. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub fields: Vec<FilterField>,
    /// Exact match on the parsed date column; `None` means "no constraint".
    pub date: Option<NaiveDate>,
}

impl FilterState {
    /// One field per filter column present in `table`. The unit-code field is
    /// prefilled with the fixed code and locked.
    pub fn for_table(table: &Table) -> Self {
        let fields = FILTER_COLUMNS
            .iter()
            .filter(|col| table.has_column(col))
            .map(|&col| {
                let fixed = col == UNIT_COLUMN;
                FilterField {
                    column: col.to_string(),
                    text: if fixed { UNIT_CODE.to_string() } else { String::new() },
                    read_only: fixed,
                }
            })
            .collect();
        Self { fields, date: None }
    }

    pub fn field(&self, column: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// Whether `column` has a filter field the user may change.
    pub fn is_editable(&self, column: &str) -> bool {
        self.field(column).is_some_and(|f| !f.read_only)
    }

    /// Set an editable field's text. Returns `false` for locked or unknown columns.
    pub fn set_text(&mut self, column: &str, text: &str) -> bool {
        match self
            .fields
            .iter_mut()
            .find(|f| f.column == column && !f.read_only)
        {
            Some(field) => {
                field.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Reset every editable field and the date constraint.
    pub fn clear(&mut self) {
        for field in self.fields.iter_mut().filter(|f| !f.read_only) {
            field.text.clear();
        }
        self.date = None;
    }

    /// "Filter by this cell": drop every other editable constraint, then set
    /// exactly `column` to `value`.
    pub fn focus_on(&mut self, column: &str, value: &str) -> bool {
        if !self.is_editable(column) {
            return false;
        }
        self.clear();
        self.set_text(column, value)
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a day-first date (an optional time part is ignored).
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parsed dates of `column`, one per row. `None` when the column is absent.
pub fn parse_date_column(table: &Table, column: &str) -> Option<Vec<Option<NaiveDate>>> {
    let idx = table.column_index(column)?;
    Some(
        table
            .rows
            .iter()
            .map(|row| parse_day_first(&row[idx]))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Return indices of rows that satisfy every active constraint (AND).
///
/// * A text field passes when the cell contains its text, ignoring case.
/// * The date passes when the row's parsed date equals it; rows with an
///   unparseable date are excluded. Without a date column it is ignored.
pub fn filtered_indices(
    table: &Table,
    dates: Option<&[Option<NaiveDate>]>,
    filters: &FilterState,
) -> Vec<usize> {
    let needles: Vec<(usize, String)> = filters
        .fields
        .iter()
        .filter(|f| !f.text.is_empty())
        .filter_map(|f| {
            let idx = table.column_index(&f.column)?;
            Some((idx, f.text.to_lowercase()))
        })
        .collect();

    let date = filters.date.zip(dates);

    (0..table.len())
        .filter(|&i| {
            let row = &table.rows[i];
            let text_ok = needles
                .iter()
                .all(|(idx, needle)| row[*idx].to_lowercase().contains(needle.as_str()));
            let date_ok = match date {
                Some((wanted, parsed)) => parsed.get(i).copied().flatten() == Some(wanted),
                None => true,
            };
            text_ok && date_ok
        })
        .collect()
}

#[cfg(test)]
mod tests_filter {
    use super::*;

    fn table() -> Table {
        let rows = [
            ["250052", "Serviço X", "88,00", "15/03/2025"],
            ["250052", "serviço xy", "1.234,56", "16/03/2025"],
            ["250052", "Papel A4", "10,00", "15/03/2025"],
            ["250052", "Caneta", "5,00", "não informado"],
        ];
        Table::new(
            ["UASG", "Descrição do Item", "Valor Total Estimado (R$)", "Data Desejada"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn fields_follow_present_columns_and_lock_unit_code() {
        let filters = FilterState::for_table(&table());
        let columns: Vec<&str> = filters.fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(
            columns,
            vec!["UASG", "Descrição do Item", "Valor Total Estimado (R$)"]
        );
        let unit = filters.field("UASG").unwrap();
        assert!(unit.read_only);
        assert_eq!(unit.text, "250052");
        assert!(!filters.is_editable("UASG"));
        assert!(filters.is_editable("Descrição do Item"));
        assert!(!filters.is_editable("Data Desejada"));
    }

    #[test]
    fn unit_code_cannot_be_edited_or_cleared() {
        let mut filters = FilterState::for_table(&table());
        assert!(!filters.set_text("UASG", "999999"));
        filters.clear();
        assert_eq!(filters.field("UASG").unwrap().text, "250052");
        assert!(!filters.focus_on("UASG", "999999"));
    }

    #[test]
    fn substring_is_case_insensitive() {
        let t = table();
        let mut filters = FilterState::for_table(&t);
        filters.set_text("Descrição do Item", "SERVIÇO");
        assert_eq!(filtered_indices(&t, None, &filters), vec![0, 1]);
    }

    #[test]
    fn constraints_are_intersected() {
        let t = table();
        let dates = parse_date_column(&t, "Data Desejada").unwrap();
        let mut filters = FilterState::for_table(&t);
        filters.set_text("Descrição do Item", "serviço");
        filters.date = NaiveDate::from_ymd_opt(2025, 3, 15);

        let view = filtered_indices(&t, Some(dates.as_slice()), &filters);
        assert_eq!(view, vec![0]);
        for &i in &view {
            assert!(t.cell(i, 1).to_lowercase().contains("serviço"));
            assert_eq!(dates[i], filters.date);
        }
    }

    #[test]
    fn date_without_matches_yields_empty_view() {
        let t = table();
        let dates = parse_date_column(&t, "Data Desejada").unwrap();
        let mut filters = FilterState::for_table(&t);
        filters.date = NaiveDate::from_ymd_opt(1999, 1, 1);
        assert!(filtered_indices(&t, Some(dates.as_slice()), &filters).is_empty());
    }

    #[test]
    fn date_is_ignored_without_date_column() {
        let t = table();
        let mut filters = FilterState::for_table(&t);
        filters.date = NaiveDate::from_ymd_opt(1999, 1, 1);
        assert_eq!(filtered_indices(&t, None, &filters).len(), 4);
    }

    #[test]
    fn clear_restores_full_view() {
        let t = table();
        let dates = parse_date_column(&t, "Data Desejada").unwrap();
        let mut filters = FilterState::for_table(&t);
        filters.set_text("Valor Total Estimado (R$)", "00");
        filters.date = NaiveDate::from_ymd_opt(2025, 3, 16);
        assert!(filtered_indices(&t, Some(dates.as_slice()), &filters).is_empty());

        filters.clear();
        assert_eq!(
            filtered_indices(&t, Some(dates.as_slice()), &filters),
            (0..t.len()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn focus_on_replaces_other_constraints() {
        let t = table();
        let mut filters = FilterState::for_table(&t);
        filters.set_text("Valor Total Estimado (R$)", "1.234");
        filters.date = NaiveDate::from_ymd_opt(2025, 3, 16);

        assert!(filters.focus_on("Descrição do Item", "Papel A4"));
        assert_eq!(filters.date, None);
        assert_eq!(filters.field("Valor Total Estimado (R$)").unwrap().text, "");
        assert_eq!(filters.field("Descrição do Item").unwrap().text, "Papel A4");
        assert_eq!(filters.field("UASG").unwrap().text, "250052");
    }

    #[test]
    fn parses_day_first_dates() {
        let march_4 = NaiveDate::from_ymd_opt(2025, 3, 4);
        assert_eq!(parse_day_first("04/03/2025"), march_4);
        assert_eq!(parse_day_first(" 04/03/2025 10:30:00 "), march_4);
        assert_eq!(parse_day_first("2025-03-04"), march_4);
        assert_eq!(parse_day_first("31/02/2025"), None);
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("amanhã"), None);
    }
}
