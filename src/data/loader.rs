use std::collections::BTreeMap;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;
use crate::config::{AppPaths, DELIMITER};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every configured year's local file.
///
/// A missing file or a file that fails to parse yields an empty table for
/// that year; the remaining years are still loaded.
pub fn load_all(years: &[String], paths: &AppPaths) -> BTreeMap<String, Table> {
    years
        .iter()
        .map(|year| {
            let path = paths.year_file(year);
            let table = match read_table(&path) {
                Ok(table) => {
                    log::info!(
                        "Loaded {} rows for {year} from {}",
                        table.len(),
                        path.display()
                    );
                    table
                }
                Err(e) if is_not_found(&e) => {
                    log::warn!("File {} not found, it will be ignored", path.display());
                    Table::default()
                }
                Err(e) => {
                    log::error!("Failed to load the file for {year}: {e:#}");
                    Table::default()
                }
            };
            (year.clone(), table)
        })
        .collect()
}

/// Read a `;`-separated UTF-8 CSV file with a header row. All cells are text.
pub fn read_table(path: &Path) -> Result<Table> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv(file).with_context(|| format!("parsing {}", path.display()))
}

/// Write `table` to `path` (header included), replacing any existing file.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, table).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV codec
// ---------------------------------------------------------------------------

/// Parse `;`-separated text. Short rows are padded with empty cells.
pub fn read_csv<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Some exports start with a UTF-8 byte-order mark.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Serialize `table` as `;`-separated text with a header row.
pub fn write_csv<W: Write>(output: W, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(output);

    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for row in &table.rows {
        writer.write_record(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::NotFound)
    })
}
