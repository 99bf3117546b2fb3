use std::sync::Arc;

use clap::Args as ClapArgs;
use tracing::info;

use crate::api::{ScanProgress, ScanStatus};
use crate::notify::Notification;
use crate::poller::{Phase, PollState, PollUpdate, ProgressPoller};
use crate::router::Route;
use crate::validation::parse_identifier;

use super::Context;

#[derive(ClapArgs)]
pub struct Args {
    /// Identifier of the scan to follow
    pub scan_id: String,
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    let id = parse_identifier(&args.scan_id)?;
    show(id, ctx).await
}

pub fn status_line(snapshot: &ScanProgress) -> String {
    format!(
        "[{}] {}% · {}",
        snapshot.status,
        snapshot.progress.round(),
        Phase::from_progress(snapshot.progress)
    )
}

/// Error indicator for a failed tick. Polling goes on regardless.
pub fn retry_notice(message: &str) -> Notification {
    Notification::error(format!("{message}, retrying"))
}

/// Terminal rendering of the progress view. Only changes are printed.
#[derive(Default)]
struct ProgressView {
    last_printed: Option<ScanProgress>,
}

impl ProgressView {
    fn render(&mut self, update: &PollUpdate, scan_id: u64) {
        match &update.state {
            PollState::Loading => {}
            PollState::Displaying(snapshot) | PollState::Terminal(snapshot) => {
                self.print_snapshot(snapshot);
            }
            PollState::Error { message, .. } => {
                // the last snapshot stays on screen; flag the failed tick
                retry_notice(message).emit();
            }
        }

        if let Some(notification) = &update.notification {
            notification.emit();
        }

        if let PollState::Terminal(snapshot) = &update.state {
            if snapshot.status == ScanStatus::Completed {
                println!("Report ready: run `websec report {scan_id}`.");
            }
        }
    }

    fn print_snapshot(&mut self, snapshot: &ScanProgress) {
        if self.last_printed.as_ref() == Some(snapshot) {
            return;
        }

        println!("{}", status_line(snapshot));

        let message_changed = self
            .last_printed
            .as_ref()
            .is_none_or(|last| last.message != snapshot.message);

        if let (Some(message), true) = (&snapshot.message, message_changed) {
            println!("  {message}");
        }

        self.last_printed = Some(snapshot.clone());
    }
}

/// Mounts the progress view for `id` until the scan ends or the user
/// interrupts it.
pub async fn show(id: u64, ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::ScanProgress(id)).await?;

    let poller = ProgressPoller::new(
        Arc::new(ctx.client.clone()),
        id,
        ctx.config.poll_interval(),
    );

    let (handle, mut updates) = poller.mount();
    let mut view = ProgressView::default();

    println!("Scan #{id} progress (Ctrl-C to stop watching)");

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(update) => view.render(&update, id),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!(scan = id, "progress view closed by user");
                Notification::info(format!(
                    "Stopped watching; resume with `websec progress {id}`"
                ))
                .emit();
                break;
            }
        }
    }

    handle.unmount().await;

    Ok(())
}
