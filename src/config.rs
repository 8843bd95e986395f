// Runtime configuration: service-account credentials from the environment
// and the command-line surface.
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_SERVICE_ACCOUNT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";

/// Everything needed to open the spreadsheet as a service account.
#[derive(Clone)]
pub struct Credentials {
    pub spreadsheet_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from raw values. Any missing or empty value means
    /// there is no live source configured.
    ///
    /// The private key is usually stored with literal `\n` sequences so it
    /// fits on one line; those are turned back into newlines here.
    pub fn from_parts(
        spreadsheet_id: Option<String>,
        client_email: Option<String>,
        private_key: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            spreadsheet_id: present(spreadsheet_id)?,
            client_email: present(client_email)?,
            private_key: present(private_key)?.replace("\\n", "\n"),
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_parts(
            std::env::var(ENV_SHEET_ID).ok(),
            std::env::var(ENV_SERVICE_ACCOUNT_EMAIL).ok(),
            std::env::var(ENV_PRIVATE_KEY).ok(),
        )
    }
}

#[derive(Parser, Debug)]
#[command(name = "highway_stats", about = "Holiday highway-safety statistics per district")]
pub struct Cli {
    /// Skip the spreadsheet and use generated data
    #[arg(long, global = true)]
    pub mock: bool,

    /// Pin "today" to the latest reported date on or before this day (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dashboard: status, comparisons, district summary and trend
    Summary,
    /// Print the daily table for one district (e.g. district-3)
    District { id: String },
    /// Write the summary, trend and daily tables as CSV plus a JSON payload
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}
