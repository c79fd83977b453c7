mod browser;
mod cli;
mod client;
mod config;
mod error;
mod fmt;
mod loader;
mod logging;
mod models;
mod reports;
mod settings;
mod tui;

use clap::Parser;
use tracing::info;

use cli::report::ReportArgs;
use cli::{Cli, Commands, ConfigCommands};
use error::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init(&settings.log_dir(), cli.verbose) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let command = cli.command.unwrap_or(Commands::Browse);
    let flag = cli.base_url.as_deref();

    if let Commands::Config { command } = command {
        return match command {
            ConfigCommands::Show => cli::config::show(flag, &settings),
            ConfigCommands::SetUrl { url } => cli::config::set_url(&url),
        };
    }

    let (client, source) = cli::connect(flag, &settings)?;
    info!(base_url = %client.config().base_url(), source = source.label(), "session started");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match command {
        Commands::Employees { pages, json } => cli::employees::run(&runtime, client, pages, json),
        Commands::Report {
            kind,
            employee_id,
            from_date,
            to_date,
            json,
        } => cli::report::run(
            &runtime,
            client,
            ReportArgs {
                kind,
                employee_id,
                from_date,
                to_date,
                json,
            },
        ),
        Commands::Browse => cli::browse::run(runtime.handle().clone(), client),
        Commands::Config { .. } => Ok(()),
    }
}
