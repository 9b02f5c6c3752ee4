//! Saving and loading whole workbooks.

use super::sheet::Sheet;
use super::workbook::Workbook;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::storage::{WorkbookData, parse_workbook, parse_workbook_content, write_workbook};
use log::debug;
use std::path::Path;

impl Workbook {
    /// Save every sheet, its row count and the active sheet.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_workbook(path, self)?;
        debug!("saved {} sheet(s) to {}", self.sheets.len(), path.display());
        Ok(())
    }

    /// Load a workbook file. Every formula is recomputed and each sheet's
    /// history starts at the loaded state.
    pub fn load(path: &Path, config: EngineConfig) -> Result<Self> {
        let data = parse_workbook(path)?;
        let workbook = Self::from_data(data, config);
        debug!(
            "loaded {} sheet(s) from {}",
            workbook.sheets.len(),
            path.display()
        );
        Ok(workbook)
    }

    /// Load from workbook text instead of a file.
    pub fn from_text(content: &str, config: EngineConfig) -> Result<Self> {
        Ok(Self::from_data(parse_workbook_content(content)?, config))
    }

    fn from_data(data: WorkbookData, config: EngineConfig) -> Self {
        if data.sheets.is_empty() {
            return Self::with_config(config);
        }

        let sheets: Vec<Sheet> = data
            .sheets
            .into_iter()
            .map(|sheet| {
                let rows = sheet.rows.unwrap_or(config.default_rows);
                Sheet::from_cells(&sheet.name, sheet.cells, rows, &config)
            })
            .collect();
        let active = data
            .active
            .and_then(|name| sheets.iter().position(|s| s.name == name))
            .unwrap_or(0);

        Workbook {
            sheets,
            active,
            config,
            clipboard: None,
        }
    }
}
