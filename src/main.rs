use clap::Parser;
use tracing::Level;

use websec::cli::{Cli, Commands};
use websec::commands::{self, Context, Reported};

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Config(args)) => {
            let config = commands::load_config(cli.api_url)?;
            commands::config::run(args, &config)
        }
        command => {
            let mut ctx = Context::load(cli.api_url)?;
            commands::dispatch(command, &mut ctx).await
        }
    };

    // already shown as a notification
    if let Err(report) = &result {
        if report.downcast_ref::<Reported>().is_some() {
            std::process::exit(1);
        }
    }

    result
}
