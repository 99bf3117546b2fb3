use clap::Args as ClapArgs;

use crate::notify::Notification;
use crate::router::Route;
use crate::validation::validate_scan_url;

use super::{Context, progress, report_failure};

#[derive(ClapArgs)]
pub struct Args {
    /// Target URL, starting with http:// or https://
    pub url: String,

    /// Return right after the scan is accepted instead of following its progress
    #[arg(long)]
    pub no_watch: bool,
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::Dashboard).await?;

    let url = validate_scan_url(&args.url)?;

    let started = ctx
        .client
        .start_scan(&url)
        .await
        .map_err(|e| report_failure(&e, "Could not start the scan"))?;

    Notification::success(format!(
        "Scan #{} started for {url}",
        started.scan_result_id
    ))
    .emit();

    if args.no_watch {
        println!(
            "Follow it with `websec progress {}`.",
            started.scan_result_id
        );
        return Ok(());
    }

    progress::show(started.scan_result_id, ctx).await
}
