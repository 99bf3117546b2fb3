use clap::{Args as ClapArgs, Subcommand};

use crate::api::parse_base_url;
use crate::config::RootConfig;
use crate::notify::Notification;

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the effective configuration
    Show,

    /// Persist the backend origin
    SetUrl {
        /// Absolute http(s) URL of the backend
        url: String,
    },
}

/// Needs no backend client, so it still runs when the configured origin is
/// broken and has to be repaired.
pub fn run(args: Args, config: &RootConfig) -> miette::Result<()> {
    match args.command {
        Command::Show => {
            let path = crate::home::config_path()?;

            println!("config file:   {}", path.display());
            println!("session file:  {}", crate::home::session_path()?.display());
            println!("backend:       {}", config.api.url);
            println!("timeout:       {} ms", config.api.timeout_ms);
            println!("poll interval: {} ms", config.poll.interval_ms);
        }
        Command::SetUrl { url } => {
            let url = parse_base_url(&url)?;

            let path = crate::home::config_path()?;
            let mut stored = crate::config::ensure_global_config()?;
            stored.api.url = url.to_string();
            stored.save(&path)?;

            Notification::success(format!("Backend set to {url}")).emit();
        }
    }

    Ok(())
}
