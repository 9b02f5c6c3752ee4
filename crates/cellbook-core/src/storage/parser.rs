//! Parser for the workbook text format

use super::{SheetData, WorkbookData};
use crate::error::{Result, WorkbookError};
use cellbook_engine::engine::{Cell, CellRef, Grid, StyleAttribute};
use log::warn;
use std::fs;
use std::path::Path;

/// Parse a workbook file
pub fn parse_workbook(path: &Path) -> Result<WorkbookData> {
    let content = fs::read_to_string(path)?;
    parse_workbook_content(&content)
}

/// Parse workbook content from a string.
///
/// Cell lines before any `sheet:` line belong to an implicit `Sheet1`, so a
/// plain list of `REF: VALUE` lines is a valid one-sheet workbook.
pub fn parse_workbook_content(content: &str) -> Result<WorkbookData> {
    let mut data = WorkbookData::default();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(parse_error(line_num, "Expected 'KEY: VALUE' format"));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "active" => data.active = Some(parse_quoted(value, line_num)?),
            "sheet" => {
                let name = parse_quoted(value, line_num)?;
                if name.trim().is_empty() {
                    return Err(parse_error(line_num, "Sheet name must not be empty"));
                }
                if data.sheets.iter().any(|s| s.name == name) {
                    return Err(parse_error(line_num, format!("Duplicate sheet: {name}")));
                }
                data.sheets.push(SheetData::new(name));
            }
            "rows" => {
                let rows = value
                    .parse::<usize>()
                    .map_err(|_| parse_error(line_num, format!("Invalid row count: {value}")))?;
                current_sheet(&mut data).rows = Some(rows);
            }
            _ => match key.split_once('@') {
                Some((cell_key, attribute)) => {
                    let cell_ref = parse_ref(cell_key.trim(), line_num)?;
                    let attribute = parse_style(attribute.trim(), value, line_num)?;
                    current_sheet(&mut data)
                        .cells
                        .entry(cell_ref)
                        .or_insert_with(Cell::new_empty)
                        .style
                        .apply(attribute);
                }
                None => {
                    let cell_ref = parse_ref(key, line_num)?;
                    let Some(cell) = parse_cell_value(value, line_num)? else {
                        warn!("line {line_num}: empty value for {cell_ref}, skipped");
                        continue;
                    };
                    insert_content(&mut current_sheet(&mut data).cells, cell_ref, cell);
                }
            },
        }
    }

    if let Some(active) = &data.active
        && !data.sheets.iter().any(|s| &s.name == active)
    {
        return Err(WorkbookError::Parse {
            line: 0,
            message: format!("Active sheet {active:?} is not defined"),
        });
    }

    Ok(data)
}

fn parse_error(line: usize, message: impl Into<String>) -> WorkbookError {
    WorkbookError::Parse {
        line,
        message: message.into(),
    }
}

fn current_sheet(data: &mut WorkbookData) -> &mut SheetData {
    if data.sheets.is_empty() {
        data.sheets.push(SheetData::new("Sheet1".to_string()));
    }
    let last = data.sheets.len() - 1;
    &mut data.sheets[last]
}

/// Content lines may follow style lines for the same cell.
fn insert_content(cells: &mut Grid, cell_ref: CellRef, cell: Cell) {
    match cells.get_mut(&cell_ref) {
        Some(existing) => existing.set_content(cell.content),
        None => {
            cells.insert(cell_ref, cell);
        }
    }
}

fn parse_ref(text: &str, line_num: usize) -> Result<CellRef> {
    CellRef::parse(text)
        .map_err(|_| parse_error(line_num, format!("Invalid cell reference: {text}")))
}

fn parse_style(name: &str, value: &str, line_num: usize) -> Result<StyleAttribute> {
    let value = if is_quoted(value) {
        parse_quoted(value, line_num)?
    } else {
        value.to_string()
    };
    StyleAttribute::from_name_value(name, &value).map_err(|e| parse_error(line_num, e.to_string()))
}

/// Parse a cell value string into a Cell; `None` for an empty value.
fn parse_cell_value(value: &str, line_num: usize) -> Result<Option<Cell>> {
    if value.is_empty() {
        return Ok(None);
    }

    // Formula: starts with '='. The body is quoted when written by us; a bare
    // body is accepted too. Formulas never contain quotes themselves.
    if let Some(formula) = value.strip_prefix('=') {
        if is_quoted(formula) {
            let body = parse_quoted(formula, line_num)?;
            return Ok(Some(Cell::new_formula(&body)));
        }
        return Ok(Some(Cell::new_formula(formula)));
    }

    if is_quoted(value) {
        let text = parse_quoted(value, line_num)?;
        return Ok(Some(Cell::new_text(&text)));
    }

    if let Ok(n) = value.parse::<f64>()
        && n.is_finite()
    {
        return Ok(Some(Cell::new_literal(value)));
    }

    Err(parse_error(
        line_num,
        format!("Invalid value: {}. Use quotes for text.", value),
    ))
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

fn parse_quoted(value: &str, line_num: usize) -> Result<String> {
    if !is_quoted(value) {
        return Err(parse_error(line_num, format!("Expected quoted text: {value}")));
    }
    Ok(unescape_text(&value[1..value.len() - 1]))
}

fn unescape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
