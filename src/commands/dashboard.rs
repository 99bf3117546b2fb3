use askama::Template;
use clap::Args as ClapArgs;

use crate::api::ScanResult;
use crate::render::{print_template, table_cell};
use crate::router::Route;

use super::{Context, report_failure};

#[derive(ClapArgs, Default)]
pub struct Args {
    /// Only show scans whose URL contains this text (case-insensitive)
    #[arg(long, short)]
    pub filter: Option<String>,
}

pub(crate) struct ScanRow {
    pub id: u64,
    pub url: String,
    pub status: &'static str,
    pub severity: &'static str,
    pub created: String,
}

impl From<&ScanResult> for ScanRow {
    fn from(scan: &ScanResult) -> Self {
        Self {
            id: scan.id,
            url: table_cell(&scan.url),
            status: scan.status.label(),
            severity: scan.severity.label(),
            created: scan.created_display(),
        }
    }
}

pub(crate) struct ScanListView {
    pub title: String,
    pub note: Option<String>,
    pub empty_message: String,
    pub rows: Vec<ScanRow>,
}

#[derive(Template)]
#[template(path = "scan_list.md")]
pub(crate) struct ScanListTemplate {
    pub view: ScanListView,
}

/// Newest first by creation time.
pub fn sort_newest_first(scans: &mut [ScanResult]) {
    scans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Case-insensitive substring match on the URL, with the term taken as
/// typed. An empty term keeps everything.
pub fn filter_by_url<'a>(scans: &'a [ScanResult], term: &str) -> Vec<&'a ScanResult> {
    let term = term.to_lowercase();

    scans
        .iter()
        .filter(|scan| term.is_empty() || scan.url.to_lowercase().contains(&term))
        .collect()
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::Dashboard).await?;

    let mut scans = ctx
        .client
        .list_my_scans()
        .await
        .map_err(|e| report_failure(&e, "Could not load scans"))?;

    sort_newest_first(&mut scans);

    let term = args.filter.unwrap_or_default();
    let visible = filter_by_url(&scans, &term);

    let (note, empty_message) = if term.is_empty() {
        (
            None,
            "No scans yet. Start one with `websec scan <url>`.".to_string(),
        )
    } else {
        (
            Some(format!(
                "Showing {} of {} scans matching `{}`",
                visible.len(),
                scans.len(),
                term
            )),
            format!("No scan matches `{term}`."),
        )
    };

    let view = ScanListView {
        title: "My scans".to_string(),
        note,
        empty_message,
        rows: visible.into_iter().map(ScanRow::from).collect(),
    };

    print_template(&ScanListTemplate { view })
}
