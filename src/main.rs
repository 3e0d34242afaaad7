//! now-export - dump scripts and update sets from a ServiceNow instance.
//!
//! Reads the first page of `sys_script_include`, `sys_ui_script` and
//! `sys_update_set` through the Table API and writes every record to
//! `<table>/<name><extension>` under the output directory.
//!
//!   now-export --instance dev123 --username admin --password secret
//!   now-export --instance dev123 --username admin --password secret -o dump
//!   now-export ... --update-set "Release 1"   # also fetch a remote update set

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{format_report, format_totals, Exporter};
use cli::{Cli, USAGE};
use domain::ExportTarget;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        if matches!(e, domain::AppError::MissingArguments { .. }) {
            tracing::debug!("{e}");
            println!("{USAGE}");
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}

/// Main application logic.
///
/// Only argument and client setup errors surface here; everything that goes
/// wrong during the export itself is logged and reported in the summary.
async fn run(cli: Cli) -> domain::Result<()> {
    let config = cli.export_config()?;
    let exporter = Exporter::new(&config)?;

    let mut report = exporter.run(&ExportTarget::builtin()).await;

    if let Some(name) = cli.update_set.as_deref() {
        report
            .outcomes
            .push(exporter.save_remote_update_set(name).await);
    }

    println!("{}", format_report(&report));
    println!();
    println!("{}", format_totals(&report));

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
