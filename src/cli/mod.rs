//! CLI interface using clap.
//!
//! The three connection flags are validated by hand so that a missing one
//! yields the short usage text and exit status 1 instead of clap's error.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{AppError, Credentials, ExportConfig, Result};

/// Usage text printed when a required flag is missing.
pub const USAGE: &str = "Please use the following command to use this application:\n\
now-export --instance <instancename> --username <username> --password <password>";

/// Export script includes, UI scripts and update sets from a ServiceNow instance.
#[derive(Parser, Debug)]
#[command(name = "now-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Instance name, as in <instance>.service-now.com.
    #[arg(long)]
    pub instance: Option<String>,

    /// User for basic authentication.
    #[arg(long)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long)]
    pub password: Option<String>,

    /// Directory the per-table directories are created in.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also download the XML export of the remote update set with this name.
    #[arg(long, value_name = "NAME")]
    pub update_set: Option<String>,
}

impl Cli {
    /// Builds the run configuration from the parsed flags.
    ///
    /// # Errors
    /// Returns `MissingArguments` if instance, username or password is absent
    /// or empty.
    pub fn export_config(&self) -> Result<ExportConfig> {
        match (
            non_empty(self.instance.as_deref()),
            non_empty(self.username.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(instance), Some(user), Some(password)) => Ok(ExportConfig::new(
                instance,
                Credentials::new(user, password),
                self.output_dir.clone(),
            )),
            (instance, user, password) => {
                let missing: Vec<&str> = [
                    ("--instance", instance.is_none()),
                    ("--username", user.is_none()),
                    ("--password", password.is_none()),
                ]
                .into_iter()
                .filter_map(|(flag, absent)| absent.then_some(flag))
                .collect();

                Err(AppError::MissingArguments {
                    missing: missing.join(", "),
                })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
