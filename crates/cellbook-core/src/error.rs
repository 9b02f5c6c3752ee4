//! Error types for Cellbook core.

use cellbook_engine::engine::{InvalidReference, StyleError};
use thiserror::Error;

/// Errors returned by workbook operations.
///
/// Formula failures are not errors at this level: they are stored in the
/// affected cell as its display value.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("a sheet named {0:?} already exists")]
    DuplicateName(String),

    #[error("sheet name must not be empty")]
    EmptyName,

    #[error("no sheet named {0:?}")]
    NotFound(String),

    #[error("cannot delete the only remaining sheet")]
    LastSheet,

    #[error(transparent)]
    InvalidReference(#[from] InvalidReference),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("Nothing selected")]
    NothingSelected,

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, WorkbookError>;
