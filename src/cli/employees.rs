use colored::Colorize;
use comfy_table::{Cell, Table};
use tokio::runtime::Runtime;

use crate::client::ApiClient;
use crate::error::{AppError, Result};
use crate::fmt::money_decimal;
use crate::loader::EmployeeLoader;
use crate::models::Employee;

pub fn run(runtime: &Runtime, client: ApiClient, pages: usize, json: bool) -> Result<()> {
    let loader = EmployeeLoader::new(client);
    runtime.block_on(async {
        loader.mount().await;
        for _ in 1..pages.max(1) {
            if loader.is_exhausted() || loader.last_error().is_some() {
                break;
            }
            loader.load_more().await;
        }
    });

    let items = loader.items();
    if let Some(err) = loader.last_error() {
        // Pages already fetched are still worth printing.
        if items.is_empty() {
            return Err(AppError::Other(format!("could not load employees: {err}")));
        }
        eprintln!("{} {err}", "Warning:".yellow().bold());
    }

    if json {
        let out = serde_json::to_string_pretty(&items).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{out}");
    } else if items.is_empty() {
        println!("No employees found.");
    } else {
        println!("{}", format_employees(&items, loader.is_exhausted()));
    }
    Ok(())
}

pub fn format_employees(items: &[Employee], complete: bool) -> String {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Area", "Shift", "Daily wage", "Status"]);
    for e in items {
        let status = if e.active {
            e.status_label().green()
        } else {
            e.status_label().red()
        };
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(e.full_name()),
            Cell::new(&e.area),
            Cell::new(&e.shift),
            Cell::new(money_decimal(e.daily_wage)),
            Cell::new(status),
        ]);
    }
    let more = if complete { "" } else { " (more available, use --pages)" };
    format!("Employees\n{table}\n{} shown{more}", items.len())
}
