use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Fixed constants
// ---------------------------------------------------------------------------

/// Organizational unit code every dataset is narrowed to.
pub const UNIT_CODE: &str = "250052";

/// Column holding the unit code in the remote and local CSV files.
pub const UNIT_COLUMN: &str = "UASG";

/// Column parsed as the "desired date" of each item (day-first).
pub const DATE_COLUMN: &str = "Data Desejada";

/// Currency-like column summed in the footer.
pub const AMOUNT_COLUMN: &str = "Valor Total Estimado (R$)";

/// Column copied to the clipboard on row double-click.
pub const ID_COLUMN: &str = "Identificador da Futura Contratação";

/// Rows per table page.
pub const PAGE_SIZE: usize = 50;

/// Timeout applied to every dataset download.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Field separator of remote and local CSV files.
pub const DELIMITER: u8 = b';';

pub const PREFERENCES_FILE: &str = "preferencias.json";
pub const DATA_DIR: &str = "data";

/// Columns that get a free-text filter field, in display order.
pub const FILTER_COLUMNS: [&str; 4] = [
    UNIT_COLUMN,
    ID_COLUMN,
    "Descrição do Item",
    AMOUNT_COLUMN,
];

/// Columns shown in the table, in display order. Missing ones are skipped.
pub const DISPLAY_COLUMNS: [&str; 13] = [
    "Unidade Responsável",
    UNIT_COLUMN,
    "Id do item no PCA",
    "Categoria do Item",
    ID_COLUMN,
    "Classificação do Catálogo",
    "Código da Classificação Superior (Classe/Grupo)",
    "Nome do PDM do Item",
    "Código do Item",
    "Descrição do Item",
    "Quantidade Estimada",
    AMOUNT_COLUMN,
    DATE_COLUMN,
];

/// Years configured on first run.
pub const DEFAULT_YEARS: [&str; 3] = ["2024", "2025", "2026"];

/// Remote source for a given year (first page of 10000 items only).
pub fn default_source_url(year: &str) -> String {
    format!(
        "https://pncp.gov.br/api/pncp/v1/orgaos/250106/planos-de-contratacao/{year}/itens?pagina=1&tamanhoPagina=10000"
    )
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Where the preferences document and the per-year CSV files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::under(Path::new("."))
    }
}

impl AppPaths {
    /// Layout rooted at `root`: `<root>/preferencias.json` and `<root>/data/`.
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.join(DATA_DIR),
            prefs_path: root.join(PREFERENCES_FILE),
        }
    }

    /// Local cache file for one year: `data/pca_<year>.csv`.
    pub fn year_file(&self, year: &str) -> PathBuf {
        self.data_dir.join(format!("pca_{year}.csv"))
    }

    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
