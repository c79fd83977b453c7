use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::reports::{ReportKind, ReportTable};

/// Plain-text rendering of a fetched report: a title line, the period, the
/// summary figures, then either the rows or the empty-period message.
pub fn format_report(
    kind: ReportKind,
    employee_id: i64,
    from: &str,
    to: &str,
    table: &ReportTable,
) -> String {
    let mut out = format!(
        "{}\nEmployee {employee_id}  ·  {from} to {to}\n",
        kind.title().bold()
    );

    if !table.summary.is_empty() {
        let width = table.summary.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        out.push('\n');
        for (label, value) in &table.summary {
            out.push_str(&format!("  {label:<width$}  {}\n", value.bold()));
        }
    }

    if let Some(msg) = table.empty_message {
        out.push_str(&format!("\n{}", msg.dimmed()));
        return out;
    }
    if table.rows.is_empty() {
        return out.trim_end().to_string();
    }

    let mut t = Table::new();
    t.set_header(table.header.clone());
    for row in &table.rows {
        t.add_row(row.iter().map(|v| {
            let cell = Cell::new(v);
            if looks_numeric(v) {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        }));
    }
    out.push_str(&format!("\n{t}"));
    out
}

fn looks_numeric(v: &str) -> bool {
    let trimmed = v.trim_start_matches('$');
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}
