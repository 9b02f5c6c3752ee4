//! Engine configuration.
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! max_formula_len = 8192
//! max_chain_depth = 1024
//! history_limit = 100
//! default_rows = 50
//! ```

use cellbook_engine::engine::Limits;
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest accepted formula body, in bytes.
    pub max_formula_len: usize,
    /// Longest chain of formula cells evaluated in one recalculation pass.
    pub max_chain_depth: usize,
    /// Undo steps kept per sheet.
    pub history_limit: usize,
    /// Display row count of a new sheet.
    pub default_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let limits = Limits::default();
        EngineConfig {
            max_formula_len: limits.max_formula_len,
            max_chain_depth: limits.max_chain_depth,
            history_limit: 100,
            default_rows: 50,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_formula_len: self.max_formula_len,
            max_chain_depth: self.max_chain_depth,
        }
    }
}
