//! CLI parsing for websec

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "websec")]
#[command(about = "Terminal client for the WebSec vulnerability scanner", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend origin, overrides WEBSEC_API_URL and the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(commands::login::Args),

    /// Create a new account
    Register(commands::register::Args),

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List your scans, newest first
    Dashboard(commands::dashboard::Args),

    /// Start a new scan and follow its progress
    Scan(commands::scan::Args),

    /// Follow the progress of a scan until it completes or fails
    Progress(commands::progress::Args),

    /// Show or download the report of a scan
    Report(commands::report::Args),

    /// Show aggregate scan statistics
    Stats,

    /// Manage user accounts (administrators only)
    Admin(commands::admin::Args),

    /// Open a view by path, e.g. /dashboard or /reports/12
    Open(commands::open::Args),

    /// Inspect or change the client configuration
    Config(commands::config::Args),
}
