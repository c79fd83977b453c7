pub mod browse;
pub mod config;
pub mod detail;
pub mod employees;
pub mod report;

use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::reports::ReportKind;
use crate::settings::{resolve_base_url, Settings, UrlSource, BASE_URL_ENV};

/// Build the session's client from the flag, the environment and settings.
pub(crate) fn connect(flag: Option<&str>, settings: &Settings) -> Result<(ApiClient, UrlSource)> {
    let env = std::env::var(BASE_URL_ENV).ok();
    let (url, source) = resolve_base_url(flag, env.as_deref(), settings);
    let config = ApiConfig::new(&url)?;
    let client = ApiClient::new(config, Duration::from_secs(settings.timeout_secs.max(1)))?;
    Ok((client, source))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// First day of the current month through today, as DD/MM/YYYY.
pub(crate) fn default_range() -> (String, String) {
    let today = Local::now().date_naive();
    let first = today.with_day(1).unwrap_or(today);
    (format_date(first), format_date(today))
}

#[derive(Parser)]
#[command(
    name = "empleados",
    version,
    about = "Browse employee records and attendance, payroll and production reports."
)]
pub struct Cli {
    /// API base URL, e.g. http://192.168.1.100:3000 (overrides EMPLEADOS_API_URL and settings)
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,
    /// Mirror log output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List employees.
    Employees {
        /// Number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: usize,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Fetch a report for one employee and date range.
    Report {
        /// Report to fetch
        #[arg(value_enum)]
        kind: ReportKind,
        /// Employee ID
        #[arg(long = "employee")]
        employee_id: i64,
        /// Start date: DD/MM/YYYY (default: first day of this month)
        #[arg(long = "from")]
        from_date: Option<String>,
        /// End date: DD/MM/YYYY (default: today)
        #[arg(long = "to")]
        to_date: Option<String>,
        /// Print the response body as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Interactively browse employees and their reports (default).
    Browse,
    /// Show or change the default API address.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective API address and where it came from.
    Show,
    /// Save a default API address to the settings file.
    SetUrl {
        /// Base URL, e.g. http://192.168.1.100:3000
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(format_date(d), "31/01/2025");
    }

    #[test]
    fn test_default_range_starts_on_the_first() {
        let (start, end) = default_range();
        assert!(start.starts_with("01/"));
        assert_eq!(start.len(), 10);
        assert_eq!(end.len(), 10);
        assert_eq!(&start[3..], &end[3..]);
    }

    #[test]
    fn test_parses_report_command() {
        let cli = Cli::try_parse_from([
            "empleados", "report", "units-produced", "--employee", "5", "--from", "01/01/2025",
            "--to", "31/01/2025",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Report { kind, employee_id, from_date, .. }) => {
                assert_eq!(kind, ReportKind::UnitsProduced);
                assert_eq!(employee_id, 5);
                assert_eq!(from_date.as_deref(), Some("01/01/2025"));
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_base_url_is_global() {
        let cli = Cli::try_parse_from(["empleados", "employees", "--base-url", "http://x:3000"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x:3000"));
    }
}
