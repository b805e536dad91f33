use dotclaude_core::link::{LinkAction, LinkReport};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// One audit line per link: what was done to which target.
pub fn describe(report: &LinkReport) -> String {
    let target = report.target.display();
    match &report.action {
        LinkAction::Linked => format!("  linked:   {target}"),
        LinkAction::AlreadyLinked => format!("  ok:       {target} (already linked correctly)"),
        LinkAction::Replaced { backup } => {
            format!("  replaced: {target} (backup: {})", backup.display())
        }
        LinkAction::Skipped => format!("  skipped:  {target} (kept existing)"),
        LinkAction::Removed => format!("  removed:  {target}"),
        LinkAction::NotALink => format!("  skipped:  {target} (not a symlink)"),
        LinkAction::NotFound => format!("  missing:  {target} (not found)"),
        LinkAction::Failed { error } => format!("  failed:   {target}: {error}"),
    }
}
