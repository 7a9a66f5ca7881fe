//! Column sorting of a filtered view.

use std::cmp::Ordering;

use super::format::parse_decimal;
use super::model::Table;

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Header indicator.
    pub fn icon(self) -> &'static str {
        match self {
            SortDirection::Ascending => "⏶",
            SortDirection::Descending => "⏷",
        }
    }
}

/// The active sort criterion of a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub column: String,
    pub direction: SortDirection,
}

impl SortBy {
    /// State after a click on `column`'s header: the same column flips
    /// direction, any other column starts ascending.
    pub fn clicked(current: Option<&SortBy>, column: &str) -> SortBy {
        let direction = match current {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            },
            _ => SortDirection::Ascending,
        };
        SortBy {
            column: column.to_string(),
            direction,
        }
    }
}

/// Reorder `view` (row indices into `table`) by `sort`.
///
/// If at least one cell of the column in the view parses as a number, the
/// whole column is compared numerically and non-numeric cells go last in
/// either direction. Otherwise cells are compared as text. The sort is stable.
/// An unknown column leaves `view` unchanged.
pub fn sort_view(table: &Table, view: &mut Vec<usize>, sort: &SortBy) {
    let Some(col) = table.column_index(&sort.column) else {
        return;
    };
    let direction = sort.direction;

    let keys: Vec<Option<f64>> = view
        .iter()
        .map(|&row| parse_decimal(table.cell(row, col)))
        .collect();

    if keys.iter().any(Option::is_some) {
        let mut keyed: Vec<(usize, Option<f64>)> = view.iter().copied().zip(keys).collect();
        keyed.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => direction.apply(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        *view = keyed.into_iter().map(|(row, _)| row).collect();
    } else {
        view.sort_by(|&a, &b| direction.apply(table.cell(a, col).cmp(table.cell(b, col))));
    }
}

#[cfg(test)]
mod tests_sort {
    use super::*;

    fn single_column(name: &str, values: &[&str]) -> Table {
        Table::new(
            vec![name.to_string()],
            values.iter().map(|v| vec![v.to_string()]).collect(),
        )
    }

    fn sorted_values(table: &Table, sort: &SortBy) -> Vec<String> {
        let mut view: Vec<usize> = (0..table.len()).collect();
        sort_view(table, &mut view, sort);
        view.iter().map(|&i| table.cell(i, 0).to_string()).collect()
    }

    fn by(column: &str, direction: SortDirection) -> SortBy {
        SortBy {
            column: column.to_string(),
            direction,
        }
    }

    #[test]
    fn click_cycle_toggles_direction() {
        let first = SortBy::clicked(None, "a");
        assert_eq!(first.direction, SortDirection::Ascending);
        let second = SortBy::clicked(Some(&first), "a");
        assert_eq!(second.direction, SortDirection::Descending);
        let third = SortBy::clicked(Some(&second), "a");
        assert_eq!(third.direction, SortDirection::Ascending);
        let other = SortBy::clicked(Some(&second), "b");
        assert_eq!(other, by("b", SortDirection::Ascending));
    }

    #[test]
    fn amounts_sort_numerically() {
        let col = "Valor Total Estimado (R$)";
        let table = single_column(col, &["1.234,56", "88,00"]);
        assert_eq!(
            sorted_values(&table, &by(col, SortDirection::Ascending)),
            vec!["88,00", "1.234,56"]
        );
        assert_eq!(
            sorted_values(&table, &by(col, SortDirection::Descending)),
            vec!["1.234,56", "88,00"]
        );
    }

    #[test]
    fn mixed_column_sinks_text_in_both_directions() {
        let table = single_column("q", &["abc", "10", "", "9", "x1"]);
        assert_eq!(
            sorted_values(&table, &by("q", SortDirection::Ascending)),
            vec!["9", "10", "abc", "", "x1"]
        );
        assert_eq!(
            sorted_values(&table, &by("q", SortDirection::Descending)),
            vec!["10", "9", "abc", "", "x1"]
        );
    }

    #[test]
    fn text_column_sorts_lexicographically() {
        let table = single_column("d", &["banana", "Abacate", "", "caju"]);
        assert_eq!(
            sorted_values(&table, &by("d", SortDirection::Ascending)),
            vec!["", "Abacate", "banana", "caju"]
        );
        assert_eq!(
            sorted_values(&table, &by("d", SortDirection::Descending)),
            vec!["caju", "banana", "Abacate", ""]
        );
    }

    #[test]
    fn equal_keys_keep_view_order() {
        let table = Table::new(
            vec!["k".to_string(), "id".to_string()],
            vec![
                vec!["1".into(), "a".into()],
                vec!["0".into(), "b".into()],
                vec!["1".into(), "c".into()],
                vec!["0".into(), "d".into()],
            ],
        );
        let mut view = vec![0, 1, 2, 3];
        sort_view(&table, &mut view, &by("k", SortDirection::Descending));
        assert_eq!(view, vec![0, 2, 1, 3]);
    }

    #[test]
    fn toggling_keeps_row_set() {
        let table = single_column("q", &["3", "1", "2", "z"]);
        let mut view = vec![3, 1, 0];
        let asc = by("q", SortDirection::Ascending);
        sort_view(&table, &mut view, &asc);
        assert_eq!(view, vec![1, 0, 3]);
        sort_view(&table, &mut view, &SortBy::clicked(Some(&asc), "q"));
        assert_eq!(view, vec![0, 1, 3]);
    }

    #[test]
    fn unknown_column_is_a_no_op() {
        let table = single_column("q", &["2", "1"]);
        let mut view = vec![0, 1];
        sort_view(&table, &mut view, &by("missing", SortDirection::Ascending));
        assert_eq!(view, vec![0, 1]);
    }
}
