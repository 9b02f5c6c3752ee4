//! Writer for the workbook text format

use crate::document::{Sheet, Workbook};
use crate::error::Result;
use cellbook_engine::engine::{CellContent, StyleAttribute};
use std::fs;
use std::path::Path;

/// Write a workbook to a file
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let content = write_workbook_content(workbook);
    fs::write(path, content)?;
    Ok(())
}

/// Write a workbook to a string. Cells are listed in row-major order, content
/// lines first, then style lines.
pub fn write_workbook_content(workbook: &Workbook) -> String {
    let mut lines = vec![
        "# Cellbook Workbook".to_string(),
        format!("active: {}", quote(workbook.active_sheet_name())),
    ];

    for sheet in workbook.sheets() {
        lines.push(String::new());
        write_sheet(&mut lines, sheet);
    }

    lines.join("\n") + "\n"
}

fn write_sheet(lines: &mut Vec<String>, sheet: &Sheet) {
    lines.push(format!("sheet: {}", quote(sheet.name())));
    lines.push(format!("rows: {}", sheet.rows()));

    let cells = sheet.cells();
    for (cell_ref, cell) in &cells {
        let value_str = match &cell.content {
            CellContent::Empty => continue,
            CellContent::Number { text, .. } => text.clone(),
            CellContent::Text(s) => quote(s),
            CellContent::Formula(f) => format!("={}", quote(f)),
        };
        lines.push(format!("{}: {}", cell_ref, value_str));
    }

    for (cell_ref, cell) in &cells {
        for attribute in cell.style.attributes() {
            lines.push(format!(
                "{} @{}: {}",
                cell_ref,
                attribute.name(),
                style_value(&attribute)
            ));
        }
    }
}

fn style_value(attribute: &StyleAttribute) -> String {
    match attribute {
        StyleAttribute::Bold(v) | StyleAttribute::Italic(v) | StyleAttribute::Underline(v) => {
            v.to_string()
        }
        StyleAttribute::Align(v) => v.to_string(),
        StyleAttribute::FontSize(v) => v.to_string(),
        StyleAttribute::FontFamily(s)
        | StyleAttribute::FontWeight(s)
        | StyleAttribute::BackgroundColor(s)
        | StyleAttribute::TextColor(s) => quote(s),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", escape_text(text))
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use cellbook_engine::engine::{Align, CellRef};
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_write_layout() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("B2"), "3").unwrap();
        wb.write_cell_value("Sheet1", r("A1"), "42").unwrap();
        wb.write_cell_value("Sheet1", r("A2"), "Hello").unwrap();
        wb.write_cell_value("Sheet1", r("A3"), "=A1 + A2").unwrap();
        wb.apply_style("Sheet1", r("A1"), StyleAttribute::Bold(true))
            .unwrap();
        wb.apply_style("Sheet1", r("A1"), StyleAttribute::FontFamily("Arial".into()))
            .unwrap();

        assert_eq!(
            write_workbook_content(&wb),
            "# Cellbook Workbook\n\
             active: \"Sheet1\"\n\
             \n\
             sheet: \"Sheet1\"\n\
             rows: 50\n\
             A1: 42\n\
             A2: \"Hello\"\n\
             B2: 3\n\
             A3: =\"A1 + A2\"\n\
             A1 @bold: true\n\
             A1 @font_family: \"Arial\"\n"
        );
    }

    #[test]
    fn test_write_escapes_text_and_skips_style_only_content() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("A1"), "say \"hi\"\nnow").unwrap();
        wb.apply_style("Sheet1", r("C1"), StyleAttribute::Align(Align::Right))
            .unwrap();
        let content = write_workbook_content(&wb);
        assert!(content.contains(r#"A1: "say \"hi\"\nnow""#));
        assert!(!content.contains("C1: "));
        assert!(content.contains("C1 @align: right"));
    }

    #[test]
    fn test_formula_with_line_break_reloads() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("A1"), "=1+\n2").unwrap();
        wb.write_cell_value("Sheet1", r("A2"), "=A1 * 2 ").unwrap();
        assert_eq!(wb.read_cell("Sheet1", &r("A1")).unwrap().display, "3");

        let content = write_workbook_content(&wb);
        assert!(content.contains(r#"A1: ="1+\n2""#));

        let loaded = Workbook::from_text(&content, EngineConfig::default()).unwrap();
        let a1 = loaded.read_cell("Sheet1", &r("A1")).unwrap();
        assert_eq!(a1.raw, "=1+\n2");
        assert_eq!(a1.display, "3");
        // Trailing whitespace inside the body survives the trimmed line.
        assert_eq!(loaded.read_cell("Sheet1", &r("A2")).unwrap().raw, "=A1 * 2 ");
    }

    #[test]
    fn test_number_literals_are_written_as_typed() {
        let mut wb = Workbook::new();
        wb.write_cell_value("Sheet1", r("A1"), "02139").unwrap();
        wb.write_cell_value("Sheet1", r("A2"), "1.50").unwrap();
        let content = write_workbook_content(&wb);
        assert!(content.contains("A1: 02139\n"));
        assert!(content.contains("A2: 1.50\n"));

        let loaded = Workbook::from_text(&content, EngineConfig::default()).unwrap();
        assert_eq!(loaded.read_cell("Sheet1", &r("A1")).unwrap().display, "02139");
        assert_eq!(loaded.read_cell("Sheet1", &r("A2")).unwrap().raw, "1.50");
    }

    #[test]
    fn test_write_every_sheet_in_order() {
        let mut wb = Workbook::new();
        wb.add_sheet(Some("Costs")).unwrap();
        wb.add_rows("Costs", 10).unwrap();
        wb.set_active_sheet("Sheet1").unwrap();
        let content = write_workbook_content(&wb);
        let sheet1 = content.find("sheet: \"Sheet1\"").unwrap();
        let costs = content.find("sheet: \"Costs\"").unwrap();
        assert!(sheet1 < costs);
        assert!(content.contains("rows: 60"));
        assert!(content.contains("active: \"Sheet1\""));
    }
}
