use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::{default_source_url, DEFAULT_YEARS};
use crate::error::{RemoveYearError, YearInputError};

// ---------------------------------------------------------------------------
// Preferences document
// ---------------------------------------------------------------------------

/// Persisted user preferences (`preferencias.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// year ("2025") → CSV download URL.
    #[serde(default)]
    pub data_sources: BTreeMap<String, String>,

    /// Per-year filter state. Kept for compatibility, active values are not persisted.
    #[serde(default)]
    pub filters: BTreeMap<String, JsonValue>,

    #[serde(
        rename = "ultima_verificacao_semanal",
        alias = "last_weekly_check",
        default = "default_weekly_check"
    )]
    pub last_weekly_check: String,
}

fn default_weekly_check() -> String {
    "2000-01-01".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        let data_sources = DEFAULT_YEARS
            .iter()
            .map(|year| (year.to_string(), default_source_url(year)))
            .collect();
        Self {
            data_sources,
            filters: BTreeMap::new(),
            last_weekly_check: default_weekly_check(),
        }
    }
}

impl Preferences {
    /// Configured years in ascending order.
    pub fn years(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }

    /// Register (or re-point) a year. Invalid input leaves `self` untouched.
    pub fn add_source(&mut self, year: &str, url: &str) -> Result<(), YearInputError> {
        let year = validate_year(year)?;
        let url = validate_url(url)?;
        self.data_sources.insert(year, url);
        Ok(())
    }

    /// Remove a year in two phases: delete its local file first, then drop
    /// the preference entries. A failed delete leaves `self` unchanged.
    pub fn remove_year(&mut self, year: &str, file: &Path) -> Result<(), RemoveYearError> {
        if !self.data_sources.contains_key(year) {
            return Err(RemoveYearError::UnknownYear(year.to_string()));
        }

        match std::fs::remove_file(file) {
            Ok(()) => log::info!("Removed {}", file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} already absent", file.display());
            }
            Err(source) => {
                return Err(RemoveYearError::DeleteFile {
                    path: file.to_path_buf(),
                    source,
                });
            }
        }

        self.data_sources.remove(year);
        self.filters.remove(year);
        Ok(())
    }
}

/// Accept exactly four ASCII digits (surrounding whitespace ignored).
pub fn validate_year(input: &str) -> Result<String, YearInputError> {
    let year = input.trim();
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        Ok(year.to_string())
    } else {
        Err(YearInputError::InvalidYear(input.to_string()))
    }
}

/// Accept absolute http(s) URLs only.
pub fn validate_url(input: &str) -> Result<String, YearInputError> {
    let url = input.trim();
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(YearInputError::InvalidUrl(input.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Reads and writes the preferences document at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. A missing, unreadable or corrupt file yields the
    /// built-in defaults, which are written back. Never fails.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            log::info!(
                "{} not found, creating default preferences",
                self.path.display()
            );
            return self.reset_to_defaults();
        }

        match self.read() {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Invalid preferences, falling back to defaults: {e:#}");
                self.reset_to_defaults()
            }
        }
    }

    /// Persist preferences; failures are logged, not raised.
    pub fn save(&self, prefs: &Preferences) {
        if let Err(e) = self.try_save(prefs) {
            log::error!("Failed to save preferences: {e:#}");
        }
    }

    /// Persist preferences as 4-space indented UTF-8 JSON.
    pub fn try_save(&self, prefs: &Preferences) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        prefs
            .serialize(&mut ser)
            .context("serializing preferences")?;
        std::fs::write(&self.path, buf)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn read(&self) -> Result<Preferences> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&text).context("parsing preferences JSON")
    }

    fn reset_to_defaults(&self) -> Preferences {
        let prefs = Preferences::default();
        self.save(&prefs);
        prefs
    }
}
