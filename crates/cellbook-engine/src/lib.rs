//! cellbook_engine - Spreadsheet engine: references, formulas, recalculation.

pub mod engine;
