use chrono::NaiveDate;

use crate::busy::Busy;
use crate::config::{AppPaths, AMOUNT_COLUMN, DATE_COLUMN, DISPLAY_COLUMNS, ID_COLUMN, PAGE_SIZE};
use crate::data::aggregate::{summarize, Summary};
use crate::data::filter::{filtered_indices, parse_date_column, FilterState};
use crate::data::loader::load_all;
use crate::data::model::Table;
use crate::data::page::{clamp_page, page_info, page_range, PageInfo};
use crate::data::sort::{sort_view, SortBy};
use crate::downloader::{download_all, Fetcher};
use crate::error::{RemoveYearError, YearInputError};
use crate::preferences::{PreferenceStore, Preferences};

// ---------------------------------------------------------------------------
// Per-year tab state
// ---------------------------------------------------------------------------

/// Everything one year tab needs: the original table, its filters and the
/// derived view. The view is always recomputed, never patched.
#[derive(Debug, Clone)]
pub struct YearTab {
    pub year: String,
    /// Rows as loaded from disk.
    pub table: Table,
    /// Parsed date column, `None` when the table has no date column.
    dates: Option<Vec<Option<NaiveDate>>>,
    pub filters: FilterState,
    /// Row indices of `table` passing the filters, in sort order.
    pub view: Vec<usize>,
    pub sort: Option<SortBy>,
    /// 1-based.
    pub page: usize,
    /// Indices into `table.columns` shown in the grid.
    pub display_columns: Vec<usize>,
}

impl YearTab {
    pub fn new(year: &str, table: Table) -> Self {
        let dates = parse_date_column(&table, DATE_COLUMN);
        let filters = FilterState::for_table(&table);
        let display_columns = DISPLAY_COLUMNS
            .iter()
            .filter_map(|col| table.column_index(col))
            .collect();

        let mut tab = Self {
            year: year.to_string(),
            table,
            dates,
            filters,
            view: Vec::new(),
            sort: None,
            page: 1,
            display_columns,
        };
        tab.apply_filters();
        tab
    }

    /// Recompute the view from the original table and the current filters.
    /// The active sort is re-applied and the page returns to 1.
    pub fn apply_filters(&mut self) {
        self.view = filtered_indices(&self.table, self.dates.as_deref(), &self.filters);
        if let Some(sort) = &self.sort {
            sort_view(&self.table, &mut self.view, sort);
        }
        self.page = 1;
    }

    /// Change one editable filter field and refresh the view.
    pub fn set_filter_text(&mut self, column: &str, text: &str) {
        if self.filters.set_text(column, text) {
            self.apply_filters();
        }
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.filters.date = date;
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.apply_filters();
    }

    /// Replace every filter with "`column` contains `value`".
    pub fn filter_by_cell(&mut self, column: &str, value: &str) -> bool {
        if !self.filters.focus_on(column, value) {
            return false;
        }
        self.apply_filters();
        true
    }

    /// Header click: toggle or start sorting by `column`, back to page 1.
    pub fn sort_by_column(&mut self, column: &str) {
        let sort = SortBy::clicked(self.sort.as_ref(), column);
        sort_view(&self.table, &mut self.view, &sort);
        self.sort = Some(sort);
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        if self.page_info().has_next {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page_info().has_prev {
            self.page -= 1;
        }
    }

    pub fn page_info(&self) -> PageInfo {
        page_info(self.page, self.view.len(), PAGE_SIZE)
    }

    /// Row indices of the current page.
    pub fn page_rows(&self) -> &[usize] {
        let page = clamp_page(self.page, self.view.len(), PAGE_SIZE);
        &self.view[page_range(page, self.view.len(), PAGE_SIZE)]
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.table, &self.view, AMOUNT_COLUMN)
    }

    pub fn column_name(&self, col: usize) -> &str {
        self.table.columns.get(col).map(String::as_str).unwrap_or("")
    }

    /// Displayed cells of `row`, in display order.
    pub fn display_values(&self, row: usize) -> Vec<&str> {
        self.display_columns
            .iter()
            .map(|&col| self.table.cell(row, col))
            .collect()
    }

    /// Contract identifier of `row`, when the column is displayed.
    pub fn row_id(&self, row: usize) -> Option<&str> {
        let col = self.table.column_index(ID_COLUMN)?;
        self.display_columns
            .contains(&col)
            .then(|| self.table.cell(row, col))
    }
}

/// A user request coming from a tab's widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
    /// Filter text was edited in place.
    Refilter,
    ClearFilters,
    SetDate(Option<NaiveDate>),
    Sort(String),
    FilterByCell { column: String, value: String },
    NextPage,
    PrevPage,
    /// Something was put on the clipboard.
    Copied(String),
}

// ---------------------------------------------------------------------------
// User-visible notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Modal dialogs and deferred work
// ---------------------------------------------------------------------------

/// At most one dialog is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    ConfirmDownload,
    AddYear {
        year: String,
        url: String,
        error: Option<String>,
    },
    RemoveYear {
        selected: String,
        confirming: bool,
    },
}

/// Blocking work scheduled for the next frame so the busy indicator is drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Download,
    Reload,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub paths: AppPaths,
    pub store: PreferenceStore,
    pub prefs: Preferences,

    /// One tab per configured year with a non-empty table.
    pub tabs: Vec<YearTab>,
    pub active_tab: usize,

    pub notices: Vec<Notice>,
    pub dialog: Option<Dialog>,

    /// Scheduled blocking action and whether its busy frame was already shown.
    pub pending: Option<(Pending, bool)>,
    pub busy: Busy,
}

impl AppState {
    /// Load preferences and every local dataset under `paths`.
    pub fn new(paths: AppPaths) -> Self {
        if let Err(e) = paths.ensure_data_dir() {
            log::error!("Could not create {}: {e}", paths.data_dir.display());
        }
        let store = PreferenceStore::new(paths.prefs_path.clone());
        let prefs = store.load();

        let mut state = Self {
            paths,
            store,
            prefs,
            tabs: Vec::new(),
            active_tab: 0,
            notices: Vec::new(),
            dialog: None,
            pending: None,
            busy: Busy::default(),
        };
        state.reload_tables();
        state
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        let notice = Notice {
            kind,
            text: text.into(),
        };
        match kind {
            NoticeKind::Info => log::info!("{}", notice.text),
            NoticeKind::Warning => log::warn!("{}", notice.text),
            NoticeKind::Error => log::error!("{}", notice.text),
        }
        self.notices.push(notice);
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut YearTab> {
        self.tabs.get_mut(self.active_tab)
    }

    /// Rebuild every tab from the local files.
    pub fn reload_tables(&mut self) {
        let _busy = self.busy.acquire();
        let active_year = self.tabs.get(self.active_tab).map(|t| t.year.clone());

        let tables = load_all(&self.prefs.years(), &self.paths);
        self.tabs = tables
            .into_iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(year, table)| YearTab::new(&year, table))
            .collect();

        self.active_tab = active_year
            .and_then(|year| self.tabs.iter().position(|t| t.year == year))
            .unwrap_or(0);
    }

    /// Download every configured year, report per-year outcomes, then reload.
    pub fn download(&mut self, fetcher: &impl Fetcher) {
        let outcomes = {
            let _busy = self.busy.acquire();
            download_all(fetcher, &self.prefs.data_sources, &self.paths)
        };

        if outcomes.is_empty() {
            self.notify(
                NoticeKind::Warning,
                "Nenhuma fonte de dados encontrada nas preferências.",
            );
        }
        for outcome in outcomes {
            match outcome.result {
                Ok(rows) => self.notify(
                    NoticeKind::Info,
                    format!("{}: {rows} registros salvos.", outcome.year),
                ),
                Err(e) => self.notify(
                    NoticeKind::Error,
                    format!("Erro ao baixar dados de {}: {e}", outcome.year),
                ),
            }
        }
        self.reload_tables();
    }

    /// Register a year source and persist it. Invalid input changes nothing.
    pub fn add_year(&mut self, year: &str, url: &str) -> Result<(), YearInputError> {
        self.prefs.add_source(year, url)?;
        let year = year.trim();
        match self.store.try_save(&self.prefs) {
            Ok(()) => self.notify(
                NoticeKind::Info,
                format!(
                    "Ano {year} adicionado. Use 'Dados -> Atualizar' para baixar as informações."
                ),
            ),
            Err(e) => self.notify(
                NoticeKind::Error,
                format!("Erro ao salvar preferências: {e:#}"),
            ),
        }
        Ok(())
    }

    /// Delete a year's local file, then its preference entry, then reload.
    pub fn remove_year(&mut self, year: &str) -> Result<(), RemoveYearError> {
        let file = self.paths.year_file(year);
        if let Err(e) = self.prefs.remove_year(year, &file) {
            self.notify(NoticeKind::Error, e.to_string());
            return Err(e);
        }
        if let Err(e) = self.store.try_save(&self.prefs) {
            self.notify(
                NoticeKind::Error,
                format!("Erro ao salvar preferências: {e:#}"),
            );
        }
        self.notify(
            NoticeKind::Info,
            format!("Ano {year} excluído com sucesso."),
        );
        self.reload_tables();
        Ok(())
    }

    /// Apply a tab request to the active tab while the busy indicator is held.
    pub fn apply(&mut self, action: TabAction) {
        let _busy = self.busy.acquire();
        let action = match action {
            TabAction::Copied(text) => {
                self.notify(NoticeKind::Info, text);
                return;
            }
            other => other,
        };
        let Some(tab) = self.tabs.get_mut(self.active_tab) else {
            return;
        };
        match action {
            TabAction::Refilter => tab.apply_filters(),
            TabAction::ClearFilters => tab.clear_filters(),
            TabAction::SetDate(date) => tab.set_date(date),
            TabAction::Sort(column) => tab.sort_by_column(&column),
            TabAction::FilterByCell { column, value } => {
                tab.filter_by_cell(&column, &value);
            }
            TabAction::NextPage => tab.next_page(),
            TabAction::PrevPage => tab.prev_page(),
            TabAction::Copied(_) => {}
        }
    }

    /// Queue blocking work; it runs on a later frame via [`AppState::take_ready`].
    pub fn schedule(&mut self, action: Pending) {
        self.pending = Some((action, false));
    }

    /// Returns the queued action once its busy frame has been shown.
    pub fn take_ready(&mut self) -> Option<Pending> {
        match self.pending {
            Some((action, true)) => {
                self.pending = None;
                Some(action)
            }
            Some((action, false)) => {
                self.pending = Some((action, true));
                None
            }
            None => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.busy.is_busy()
    }
}

#[cfg(test)]
mod tests_state {
    use super::*;
    use crate::data::loader::write_table;
    use crate::data::page::total_pages;
    use crate::error::DownloadError;
    use tempfile::TempDir;

    const HEADER: [&str; 5] = [
        "UASG",
        "Identificador da Futura Contratação",
        "Descrição do Item",
        "Valor Total Estimado (R$)",
        "Data Desejada",
    ];

    fn table(rows: &[[&str; 5]]) -> Table {
        Table::new(
            HEADER.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn sample() -> Table {
        table(&[
            ["250052", "ID-1", "Serviço X", "1.234,56", "15/03/2025"],
            ["250052", "ID-2", "Papel A4", "88,00", "20/04/2025"],
            ["250052", "ID-3", "Serviço X", "10,00", "15/03/2025"],
            ["250052", "ID-4", "Caneta", "a definir", ""],
        ])
    }

    fn numbered(n: usize) -> Table {
        let rows: Vec<Vec<String>> = (0..n)
            .map(|i| {
                vec![
                    "250052".to_string(),
                    format!("ID-{i}"),
                    if i % 2 == 0 { "par" } else { "ímpar" }.to_string(),
                    format!("{i},00"),
                    "01/01/2025".to_string(),
                ]
            })
            .collect();
        Table::new(HEADER.iter().map(|s| s.to_string()).collect(), rows)
    }

    #[test]
    fn new_tab_shows_everything_of_the_unit() {
        let tab = YearTab::new("2025", sample());
        assert_eq!(tab.view, vec![0, 1, 2, 3]);
        assert_eq!(tab.page, 1);
        assert_eq!(tab.display_columns.len(), 5);
        assert_eq!(tab.filters.field("UASG").unwrap().text, "250052");
    }

    #[test]
    fn amount_sort_and_sum() {
        let only_two = table(&[
            ["250052", "A", "x", "1.234,56", ""],
            ["250052", "B", "y", "88,00", ""],
        ]);
        let mut tab = YearTab::new("2025", only_two);
        tab.sort_by_column("Valor Total Estimado (R$)");
        let amounts: Vec<&str> = tab.view.iter().map(|&r| tab.table.cell(r, 3)).collect();
        assert_eq!(amounts, vec!["88,00", "1.234,56"]);
        assert_eq!(
            tab.summary().label(),
            "Registros: 2 | Valor Total: R$ 1.322,56"
        );
    }

    #[test]
    fn unmatched_date_gives_single_empty_page() {
        let mut tab = YearTab::new("2025", numbered(120));
        tab.next_page();
        tab.next_page();
        assert_eq!(tab.page, 3);

        tab.set_date(NaiveDate::from_ymd_opt(2030, 12, 31));
        assert!(tab.view.is_empty());
        assert!(tab.page_rows().is_empty());
        let info = tab.page_info();
        assert_eq!((info.current, info.total), (1, 1));
        assert!(!info.has_prev && !info.has_next);
    }

    #[test]
    fn filter_by_cell_replaces_previous_filters() {
        let mut tab = YearTab::new("2025", sample());
        tab.set_filter_text("Valor Total Estimado (R$)", "88");
        tab.set_date(NaiveDate::from_ymd_opt(2025, 4, 20));
        assert_eq!(tab.view, vec![1]);

        assert!(tab.filter_by_cell("Descrição do Item", "Serviço X"));
        assert_eq!(tab.filters.date, None);
        assert_eq!(tab.view, vec![0, 2]);
        assert!(tab
            .view
            .iter()
            .all(|&r| tab.table.cell(r, 2) == "Serviço X"));

        assert!(!tab.filter_by_cell("UASG", "250052"));
    }

    #[test]
    fn clearing_restores_full_table() {
        let mut tab = YearTab::new("2025", sample());
        tab.set_filter_text("Descrição do Item", "caneta");
        assert_eq!(tab.view, vec![3]);
        tab.clear_filters();
        assert_eq!(tab.view.len(), tab.table.len());
    }

    #[test]
    fn sort_survives_refilter() {
        let mut tab = YearTab::new("2025", sample());
        tab.sort_by_column("Valor Total Estimado (R$)");
        tab.sort_by_column("Valor Total Estimado (R$)");
        assert_eq!(tab.view, vec![0, 1, 2, 3]);

        tab.set_filter_text("Descrição do Item", "a");
        // "Papel A4" and "Caneta", still descending with text last.
        assert_eq!(tab.view, vec![1, 3]);
        tab.set_filter_text("Descrição do Item", "serv");
        assert_eq!(tab.view, vec![0, 2]);
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut tab = YearTab::new("2025", numbered(120));
        assert_eq!(tab.page_rows().len(), 50);
        for _ in 0..10 {
            tab.next_page();
        }
        assert_eq!(tab.page, total_pages(120, PAGE_SIZE));
        assert_eq!(tab.page_rows().len(), 20);
        tab.prev_page();
        assert_eq!(tab.page, 2);

        tab.set_filter_text("Descrição do Item", "ímpar");
        assert_eq!(tab.page, 1);
        assert_eq!(tab.view.len(), 60);
        for _ in 0..5 {
            tab.prev_page();
        }
        assert_eq!(tab.page, 1);
    }

    #[test]
    fn row_helpers_follow_display_columns() {
        let tab = YearTab::new("2025", sample());
        assert_eq!(tab.row_id(1), Some("ID-2"));
        assert_eq!(
            tab.display_values(1),
            vec!["250052", "ID-2", "Papel A4", "88,00", "20/04/2025"]
        );
    }

    struct OfflineFetcher;

    impl Fetcher for OfflineFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
            if url.contains("2025") {
                Ok("UASG;Descrição do Item\n250052;Serviço X\n999999;Outro\n"
                    .as_bytes()
                    .to_vec())
            } else {
                Err(DownloadError::Request {
                    url: url.to_string(),
                    reason: "timeout".to_string(),
                })
            }
        }
    }

    #[test]
    fn startup_creates_defaults_and_skips_empty_years() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::under(dir.path());
        let state = AppState::new(paths.clone());

        assert!(paths.prefs_path.exists());
        assert!(paths.data_dir.is_dir());
        assert_eq!(state.prefs, Preferences::default());
        assert!(state.tabs.is_empty());
        assert!(!state.is_busy());
    }

    #[test]
    fn download_reports_each_year_and_builds_tabs() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(AppPaths::under(dir.path()));

        state.download(&OfflineFetcher);

        assert!(!state.busy.is_busy());
        let years: Vec<&str> = state.tabs.iter().map(|t| t.year.as_str()).collect();
        assert_eq!(years, vec!["2025"]);
        assert_eq!(state.tabs[0].table.len(), 1);

        let errors = state
            .notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Error)
            .count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn add_and_remove_year_persist() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::under(dir.path());
        let mut state = AppState::new(paths.clone());

        assert!(state.add_year("27", "https://example.org").is_err());
        assert!(!state.prefs.data_sources.contains_key("27"));

        state.add_year("2027", "https://example.org/2027.csv").unwrap();
        assert!(state.store.load().data_sources.contains_key("2027"));

        write_table(&paths.year_file("2027"), &sample()).unwrap();
        state.reload_tables();
        assert!(state.tabs.iter().any(|t| t.year == "2027"));

        state.remove_year("2027").unwrap();
        assert!(!paths.year_file("2027").exists());
        assert!(!state.store.load().data_sources.contains_key("2027"));
        assert!(state.tabs.iter().all(|t| t.year != "2027"));
    }

    #[test]
    fn actions_drive_the_active_tab() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::under(dir.path());
        paths.ensure_data_dir().unwrap();
        write_table(&paths.year_file("2025"), &sample()).unwrap();

        let mut state = AppState::new(paths);
        assert_eq!(state.tabs.len(), 1);

        state.apply(TabAction::SetDate(NaiveDate::from_ymd_opt(2025, 3, 15)));
        assert_eq!(state.tabs[0].view, vec![0, 2]);

        state.apply(TabAction::FilterByCell {
            column: "Descrição do Item".to_string(),
            value: "Papel A4".to_string(),
        });
        assert_eq!(state.tabs[0].view, vec![1]);

        state.apply(TabAction::ClearFilters);
        state.apply(TabAction::Sort("Valor Total Estimado (R$)".to_string()));
        assert_eq!(state.tabs[0].view, vec![2, 1, 0, 3]);

        state.apply(TabAction::Copied("O ID 'ID-1' foi copiado.".to_string()));
        assert_eq!(state.notices.last().unwrap().text, "O ID 'ID-1' foi copiado.");
        assert!(!state.busy.is_busy());
    }

    #[test]
    fn pending_action_waits_one_frame() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(AppPaths::under(dir.path()));

        state.schedule(Pending::Download);
        assert!(state.is_busy());
        assert_eq!(state.take_ready(), None);
        assert_eq!(state.take_ready(), Some(Pending::Download));
        assert_eq!(state.take_ready(), None);
        assert!(!state.is_busy());
    }
}
