//! Sheet management and the cell-level workbook API.

use cellbook_engine::engine::{CellRef, StyleAttribute};
use log::debug;

use super::sheet::{CellView, Sheet};
use crate::config::EngineConfig;
use crate::error::{Result, WorkbookError};

/// An ordered set of uniquely named sheets, one of them active.
///
/// There is always at least one sheet, and the active index always points at
/// an existing one.
#[derive(Clone, Debug)]
pub struct Workbook {
    pub(crate) sheets: Vec<Sheet>,
    pub(crate) active: usize,
    pub(crate) config: EngineConfig,
    /// Raw text of the last copied cell.
    pub(crate) clipboard: Option<String>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// A workbook holding a single empty `Sheet1`.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let first = Sheet::new("Sheet1", &config);
        Workbook {
            sheets: vec![first],
            active: 0,
            config,
            clipboard: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| WorkbookError::NotFound(name.to_string()))
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        let idx = self.position(name)?;
        Ok(&self.sheets[idx])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        let idx = self.position(name)?;
        Ok(&mut self.sheets[idx])
    }

    // Cell API

    /// Display value, raw content and style of one cell.
    pub fn read_cell(&self, sheet: &str, cell_ref: &CellRef) -> Result<CellView> {
        Ok(self.sheet(sheet)?.view(cell_ref))
    }

    /// Write user input: a leading `=` stores a formula, empty text clears,
    /// anything else is a literal. Dependents are recalculated before return.
    pub fn write_cell_value(&mut self, sheet: &str, cell_ref: CellRef, text: &str) -> Result<()> {
        self.sheet_mut(sheet)?.write_input(cell_ref, text);
        Ok(())
    }

    pub fn apply_style(
        &mut self,
        sheet: &str,
        cell_ref: CellRef,
        attribute: StyleAttribute,
    ) -> Result<()> {
        self.sheet_mut(sheet)?.set_style(cell_ref, attribute);
        Ok(())
    }

    pub fn clear_cell(&mut self, sheet: &str, cell_ref: CellRef) -> Result<()> {
        self.sheet_mut(sheet)?.clear(cell_ref);
        Ok(())
    }

    /// Returns whether the sheet's state moved.
    pub fn undo(&mut self, sheet: &str) -> Result<bool> {
        Ok(self.sheet_mut(sheet)?.undo())
    }

    pub fn redo(&mut self, sheet: &str) -> Result<bool> {
        Ok(self.sheet_mut(sheet)?.redo())
    }

    /// Grow a sheet's display row count; returns the new count.
    pub fn add_rows(&mut self, sheet: &str, count: usize) -> Result<usize> {
        Ok(self.sheet_mut(sheet)?.add_rows(count))
    }

    // Sheet management

    /// Add a sheet and make it active. Without a name the first free
    /// `Sheet<N>` is used, counting from the current sheet count plus one.
    pub fn add_sheet(&mut self, name: Option<&str>) -> Result<String> {
        let name = match name {
            Some(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(WorkbookError::EmptyName);
                }
                if self.contains(name) {
                    return Err(WorkbookError::DuplicateName(name.to_string()));
                }
                name.to_string()
            }
            None => self.next_default_name(),
        };

        self.sheets.push(Sheet::new(&name, &self.config));
        self.active = self.sheets.len() - 1;
        debug!("added sheet {name:?}");
        Ok(name)
    }

    fn next_default_name(&self) -> String {
        let mut n = self.sheets.len() + 1;
        loop {
            let candidate = format!("Sheet{n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    /// Rename in place; the sheet keeps its position and, if active, stays
    /// active under the new name.
    pub fn rename_sheet(&mut self, old: &str, new: &str) -> Result<()> {
        let idx = self.position(old)?;
        let new = new.trim();
        if new.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        if new == old {
            return Ok(());
        }
        if self.contains(new) {
            return Err(WorkbookError::DuplicateName(new.to_string()));
        }
        self.sheets[idx].name = new.to_string();
        debug!("renamed sheet {old:?} to {new:?}");
        Ok(())
    }

    /// Remove a sheet. The last remaining sheet cannot be deleted; deleting
    /// the active sheet activates the first remaining one.
    pub fn delete_sheet(&mut self, name: &str) -> Result<()> {
        let idx = self.position(name)?;
        if self.sheets.len() == 1 {
            return Err(WorkbookError::LastSheet);
        }
        self.sheets.remove(idx);
        if idx == self.active {
            self.active = 0;
        } else if idx < self.active {
            self.active -= 1;
        }
        debug!("deleted sheet {name:?}");
        Ok(())
    }

    /// Sheet names in workbook order.
    pub fn list_sheets(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn set_active_sheet(&mut self, name: &str) -> Result<()> {
        self.active = self.position(name)?;
        Ok(())
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    pub(crate) fn active_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.active]
    }

    pub fn active_sheet_name(&self) -> &str {
        &self.sheets[self.active].name
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbook_engine::engine::Align;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_new_workbook_has_sheet1_active() {
        let wb = Workbook::new();
        assert_eq!(wb.list_sheets(), vec!["Sheet1"]);
        assert_eq!(wb.active_sheet_name(), "Sheet1");
        assert_eq!(wb.active_sheet().rows(), 50);
    }

    #[test]
    fn test_write_and_read_cell() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("A1"), "10").unwrap();
        wb.write_cell_value("Sheet1", r("B1"), "=A1/4").unwrap();
        let view = wb.read_cell("Sheet1", &r("B1")).unwrap();
        assert_eq!(view.display, "2.5");
        assert_eq!(view.raw, "=A1/4");
    }

    #[test]
    fn test_operations_on_missing_sheet_fail() {
        let mut wb = Workbook::new();
        assert!(matches!(
            wb.write_cell_value("Nope", r("A1"), "1"),
            Err(WorkbookError::NotFound(name)) if name == "Nope"
        ));
        assert!(matches!(wb.undo("Nope"), Err(WorkbookError::NotFound(_))));
        assert!(matches!(
            wb.read_cell("Nope", &r("A1")),
            Err(WorkbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_sheets_are_independent() {
        let mut wb = Workbook::new();
        wb.add_sheet(Some("Data")).unwrap();
        wb.write_cell_value("Sheet1", r("A1"), "1").unwrap();
        wb.write_cell_value("Data", r("A1"), "2").unwrap();
        assert_eq!(wb.read_cell("Sheet1", &r("A1")).unwrap().display, "1");
        assert_eq!(wb.read_cell("Data", &r("A1")).unwrap().display, "2");

        assert!(wb.undo("Data").unwrap());
        assert_eq!(wb.read_cell("Sheet1", &r("A1")).unwrap().display, "1");
        assert_eq!(wb.read_cell("Data", &r("A1")).unwrap().display, "");
    }

    #[test]
    fn test_add_sheet_default_names_skip_taken() {
        let mut wb = Workbook::new();
        wb.add_sheet(Some("Sheet2")).unwrap();
        assert_eq!(wb.add_sheet(None).unwrap(), "Sheet3");
        wb.delete_sheet("Sheet2").unwrap();
        // Two sheets left, so counting starts at 3, which is taken.
        assert_eq!(wb.add_sheet(None).unwrap(), "Sheet4");
        assert_eq!(wb.active_sheet_name(), "Sheet4");
    }

    #[test]
    fn test_add_sheet_rejects_bad_names() {
        let mut wb = Workbook::new();
        assert!(matches!(wb.add_sheet(Some("   ")), Err(WorkbookError::EmptyName)));
        assert!(matches!(
            wb.add_sheet(Some(" Sheet1 ")),
            Err(WorkbookError::DuplicateName(name)) if name == "Sheet1"
        ));
        assert_eq!(wb.list_sheets(), vec!["Sheet1"]);
    }

    #[test]
    fn test_rename_keeps_position_and_active() {
        let mut wb = Workbook::new();
        wb.add_sheet(Some("Two")).unwrap();
        wb.set_active_sheet("Sheet1").unwrap();
        wb.rename_sheet("Sheet1", "  Budget ").unwrap();
        assert_eq!(wb.list_sheets(), vec!["Budget", "Two"]);
        assert_eq!(wb.active_sheet_name(), "Budget");

        wb.rename_sheet("Budget", "Budget").unwrap();
        assert!(matches!(
            wb.rename_sheet("Budget", "Two"),
            Err(WorkbookError::DuplicateName(_))
        ));
        assert!(matches!(wb.rename_sheet("Budget", ""), Err(WorkbookError::EmptyName)));
        assert!(matches!(
            wb.rename_sheet("Missing", "X"),
            Err(WorkbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_last_sheet_fails_and_changes_nothing() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("A1"), "7").unwrap();
        assert!(matches!(wb.delete_sheet("Sheet1"), Err(WorkbookError::LastSheet)));
        assert_eq!(wb.list_sheets(), vec!["Sheet1"]);
        assert_eq!(wb.read_cell("Sheet1", &r("A1")).unwrap().display, "7");
    }

    #[test]
    fn test_delete_active_sheet_activates_first() {
        let mut wb = Workbook::new();
        wb.add_sheet(None).unwrap();
        wb.add_sheet(None).unwrap();
        assert_eq!(wb.active_sheet_name(), "Sheet3");
        wb.delete_sheet("Sheet3").unwrap();
        assert_eq!(wb.active_sheet_name(), "Sheet1");
    }

    #[test]
    fn test_delete_before_active_keeps_active() {
        let mut wb = Workbook::new();
        wb.add_sheet(None).unwrap();
        wb.add_sheet(None).unwrap();
        wb.set_active_sheet("Sheet2").unwrap();
        wb.delete_sheet("Sheet1").unwrap();
        assert_eq!(wb.active_sheet_name(), "Sheet2");
        assert!(matches!(wb.set_active_sheet("Sheet1"), Err(WorkbookError::NotFound(_))));
    }

    #[test]
    fn test_apply_style_and_add_rows() {
        let mut wb = Workbook::new();
        wb.apply_style("Sheet1", r("A1"), StyleAttribute::Align(Align::Center))
            .unwrap();
        assert_eq!(
            wb.read_cell("Sheet1", &r("A1")).unwrap().style.align,
            Some(Align::Center)
        );
        assert_eq!(wb.add_rows("Sheet1", 25).unwrap(), 75);
    }
}
