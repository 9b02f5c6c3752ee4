//! Selected cell, formula bar text and a single-cell clipboard.

use cellbook_engine::engine::CellRef;
use log::debug;

use super::workbook::Workbook;
use crate::error::{Result, WorkbookError};

impl Workbook {
    /// Select a cell on the active sheet and return the formula bar text:
    /// the formula with its `=` when there is one, otherwise the display value.
    pub fn select(&mut self, cell_ref: CellRef) -> String {
        let sheet = self.active_sheet_mut();
        sheet.selected = cell_ref;
        let view = sheet.view(&cell_ref);
        if view.raw.starts_with('=') {
            view.raw
        } else {
            view.display
        }
    }

    pub fn selected(&self) -> CellRef {
        self.active_sheet().selected()
    }

    /// Copy the selected cell's display value. Returns the copied text.
    pub fn copy(&mut self) -> Result<String> {
        let sheet = self.active_sheet();
        let cell_ref = sheet.selected();
        let display = sheet.view(&cell_ref).display;
        if display.is_empty() {
            return Err(WorkbookError::NothingSelected);
        }
        debug!("copied {}!{}", sheet.name(), cell_ref);
        self.clipboard = Some(display.clone());
        Ok(display)
    }

    /// Write the clipboard into the selected cell as a literal value.
    pub fn paste(&mut self) -> Result<CellRef> {
        let text = self.clipboard.clone().ok_or(WorkbookError::EmptyClipboard)?;
        let sheet = self.active_sheet_mut();
        let cell_ref = sheet.selected();
        sheet.set_literal(cell_ref, &text);
        Ok(cell_ref)
    }
}
