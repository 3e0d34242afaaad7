//! Domain models for exported platform records.
//!
//! These models represent the entities read from the instance's Table API and
//! the immutable configuration every operation receives.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Service domain hosting every instance.
pub const SERVICE_DOMAIN: &str = "service-now.com";

/// A whitespace character directly followed by a non-word character.
/// Word characters are ASCII only, so accented letters count as non-word.
const WHITESPACE_NON_WORD_PATTERN: &str = r"\s[^0-9A-Za-z_]";

fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!("Failed to compile regex pattern '{pattern}' in {context}: {e}. This is a programming error.")
    })
}

static WHITESPACE_NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(WHITESPACE_NON_WORD_PATTERN, "WHITESPACE_NON_WORD_RE"));

/// A table to export and how its records land on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    /// Table name, also used as the output directory name.
    pub table: String,
    /// Encoded query narrowing the table; empty means unfiltered.
    pub filter: String,
    /// Suffix appended to every file written for this table.
    pub extension: String,
}

impl ExportTarget {
    pub fn new(
        table: impl Into<String>,
        filter: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            filter: filter.into(),
            extension: extension.into(),
        }
    }

    /// The fixed set of tables exported on every run.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::new("sys_script_include", "", ".js"),
            Self::new("sys_ui_script", "", ".js"),
            Self::new("sys_update_set", "", ".html"),
        ]
    }
}

/// One row of a Table API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Display name; becomes the filename stem after sanitizing.
    pub name: String,
    /// Script body (script includes, UI scripts).
    #[serde(default)]
    pub script: Option<String>,
    /// Payload body (update sets).
    #[serde(default)]
    pub payload: Option<String>,
}

impl Record {
    /// First non-empty of `script` and `payload`.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        [self.script.as_deref(), self.payload.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }

    /// Filename for this record with the given extension.
    #[must_use]
    pub fn filename(&self, extension: &str) -> String {
        format!("{}{extension}", sanitize_name(&self.name))
    }
}

/// Removes every whitespace character that is directly followed by a
/// non-word character, together with that character.
///
/// Deliberately narrow: other characters unsafe on a filesystem survive, and
/// distinct names may collapse to the same result.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    WHITESPACE_NON_WORD_RE.replace_all(name, "").into_owned()
}

/// Basic-auth credentials shared by every request of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable run configuration, built once from the command line.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Scheme and host of the instance, without a trailing slash.
    pub base_url: String,
    pub credentials: Credentials,
    /// Directory under which per-table directories are created.
    pub base_dir: PathBuf,
}

impl ExportConfig {
    /// Configuration for `https://<instance>.service-now.com`.
    pub fn new(instance: &str, credentials: Credentials, base_dir: impl Into<PathBuf>) -> Self {
        Self::with_base_url(
            format!("https://{instance}.{SERVICE_DOMAIN}"),
            credentials,
            base_dir,
        )
    }

    /// Configuration against an explicit base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Credentials,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credentials,
            base_dir: base_dir.into(),
        }
    }

    /// Output directory for a table.
    #[must_use]
    pub fn table_dir(&self, table: &str) -> PathBuf {
        self.base_dir.join(table)
    }
}

/// What happened to one export target.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TargetOutcome {
    /// Table (or pseudo-table) name.
    pub table: String,
    /// Records returned by the instance.
    pub fetched: usize,
    /// Files successfully written.
    pub written: usize,
    /// Records that could not be written.
    pub failed: usize,
    /// Target-level failure, if the fetch or directory setup failed.
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none() && self.failed == 0
    }
}

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl ExportReport {
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.outcomes.iter().map(|o| o.written).sum()
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| o.failed + usize::from(o.error.is_some()))
            .sum()
    }
}
