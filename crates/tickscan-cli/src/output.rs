//! Result rendering.
//!
//! JSON output goes to stdout as one object; warnings always go to stderr
//! so piped JSON stays parseable. Table output is a plain padded ASCII
//! table built from rows each command prepares itself.

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    match format {
        OutputFormat::Json => render_json(&result.data, pretty),
        OutputFormat::Table => {
            render_table(&result.table.header, &result.table.rows);
            Ok(())
        }
    }
}

fn render_json(data: &Value, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    println!("{rendered}");
    Ok(())
}

fn render_table(header: &[String], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if index < widths.len() {
                widths[index] = widths[index].max(cell.len());
            }
        }
    }

    print_row(header, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&separator, &widths);
    for row in rows {
        print_row(row, &widths);
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  "));
}
