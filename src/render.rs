//! Markdown rendering of sheets and command results

use cellbook_core::{CellRef, Sheet};
use std::fmt::Write as _;
use std::path::Path;

/// Render the populated area of a sheet as a markdown table.
pub fn sheet_markdown(sheet: &Sheet) -> String {
    let cells: Vec<(CellRef, String)> = sheet
        .cells()
        .into_iter()
        .map(|(cell_ref, cell)| (*cell_ref, cell.value.clone()))
        .collect();
    markdown_table(sheet.name(), &cells)
}

/// Render `cells` inside their bounding box; missing cells are blank.
pub fn markdown_table(title: &str, cells: &[(CellRef, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", title);
    let _ = writeln!(out);

    let Some((min_row, min_col, max_row, max_col)) = bounds(cells) else {
        let _ = writeln!(out, "*Empty sheet*");
        return out;
    };

    out.push_str("|   |");
    for col in min_col..=max_col {
        let _ = write!(out, " {} |", CellRef::col_to_letters(col));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in min_col..=max_col {
        out.push_str("---|");
    }
    out.push('\n');

    for row in min_row..=max_row {
        let _ = write!(out, "| {} |", row + 1); // 1-based row numbers
        for col in min_col..=max_col {
            let cell_ref = CellRef::new(col, row);
            let display = cells
                .iter()
                .find(|(r, _)| *r == cell_ref)
                .map(|(_, v)| v.as_str())
                .unwrap_or("");
            let _ = write!(out, " {} |", escape_markdown(display));
        }
        out.push('\n');
    }
    out
}

pub fn write_markdown(path: &Path, content: &str) -> std::io::Result<()> {
    std::fs::write(path, content)
}

fn bounds(cells: &[(CellRef, String)]) -> Option<(usize, usize, usize, usize)> {
    let first = cells.first()?.0;
    Some(cells.iter().fold(
        (first.row, first.col, first.row, first.col),
        |(min_row, min_col, max_row, max_col), (r, _)| {
            (
                min_row.min(r.row),
                min_col.min(r.col),
                max_row.max(r.row),
                max_col.max(r.col),
            )
        },
    ))
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
