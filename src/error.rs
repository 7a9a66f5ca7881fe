use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Typed, user-facing failures
// ---------------------------------------------------------------------------

/// Failure while refreshing one year's dataset. Terminal for that year only.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("could not parse downloaded CSV: {0:#}")]
    Parse(anyhow::Error),

    #[error("could not write {path:?}: {cause:#}")]
    Write { path: PathBuf, cause: anyhow::Error },
}

/// Rejected "add year" input. Nothing is mutated when this is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum YearInputError {
    #[error("O ano deve ser um número de 4 dígitos.")]
    InvalidYear(String),

    #[error("URL inválida: {0}")]
    InvalidUrl(String),
}

/// Failure while removing a year. Preferences stay unchanged.
#[derive(Debug, Error)]
pub enum RemoveYearError {
    #[error("Ano {0} não está configurado.")]
    UnknownYear(String),

    #[error("Não foi possível excluir o arquivo {path:?}: {source}")]
    DeleteFile { path: PathBuf, source: io::Error },
}
