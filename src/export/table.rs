//! Plain-text materials table.

use crate::session::{MaterialRow, Summary};
use std::fmt::Write;

/// Render rows as a fixed-width table followed by a summary line.
pub fn render_table(rows: &[MaterialRow], summary: &Summary) -> String {
    let display_width = column_width("Material", rows.iter().map(|r| r.display_name.as_str()));
    let name_width = column_width("Name", rows.iter().map(|r| r.name.as_str()));
    let counts: Vec<String> = rows.iter().map(|r| r.count.to_string()).collect();
    let count_width = column_width("Count", counts.iter().map(String::as_str));

    let mut out = String::with_capacity(64 + rows.len() * (display_width + name_width + 24));

    writeln!(
        out,
        "    {:<dw$}  {:<nw$}  {:>cw$}  Type",
        "Material",
        "Name",
        "Count",
        dw = display_width,
        nw = name_width,
        cw = count_width
    )
    .unwrap();

    for row in rows {
        writeln!(
            out,
            "[{}] {:<dw$}  {:<nw$}  {:>cw$}  {}",
            if row.checked { 'x' } else { ' ' },
            row.display_name,
            row.name,
            row.count,
            row.category,
            dw = display_width,
            nw = name_width,
            cw = count_width
        )
        .unwrap();
    }

    if rows.is_empty() {
        writeln!(out, "(no materials)").unwrap();
    }

    writeln!(out).unwrap();
    writeln!(
        out,
        "Total: {}  Unique: {}",
        summary.total_count, summary.unique_count
    )
    .unwrap();

    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
