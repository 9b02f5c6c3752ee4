//! cellbook-core - UI-agnostic workbook model, history and storage.

pub mod config;
pub mod document;
pub mod error;
pub mod storage;

pub use config::EngineConfig;
pub use document::{CellView, History, Sheet, Workbook};
pub use error::{Result, WorkbookError};

pub use cellbook_engine::engine::{Align, CellRef, CellStyle, StyleAttribute};
