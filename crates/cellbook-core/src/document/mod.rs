//! Workbook document model (UI-agnostic).

mod history;
mod io;
mod selection;
mod sheet;
mod workbook;

pub use history::{History, Snapshot};
pub use sheet::{CellView, Sheet};
pub use workbook::Workbook;
