use askama::Template;

use crate::api::{ScanStats, Severity};
use crate::render::{bar, percent, print_template};
use crate::router::Route;

use super::{Context, report_failure};

struct ChartRow {
    label: String,
    count: u64,
    bar: String,
    percent: u64,
}

struct StatsView {
    scan_count: u64,
    high_count: u64,
    type_count: usize,
    by_severity: Vec<ChartRow>,
    by_type: Vec<ChartRow>,
}

#[derive(Template)]
#[template(path = "stats.md")]
struct StatsTemplate {
    view: StatsView,
}

fn chart(entries: impl Iterator<Item = (String, u64)> + Clone) -> Vec<ChartRow> {
    let max = entries.clone().map(|(_, count)| count).max().unwrap_or(0);
    let total: u64 = entries.clone().map(|(_, count)| count).sum();

    entries
        .map(|(label, count)| ChartRow {
            label,
            count,
            bar: bar(count, max),
            percent: percent(count, total),
        })
        .collect()
}

fn build_view(stats: &ScanStats) -> StatsView {
    StatsView {
        scan_count: stats.scan_count,
        high_count: stats.count_for(Severity::High),
        type_count: stats.by_type.len(),
        by_severity: chart(
            stats
                .by_severity
                .iter()
                .map(|entry| (entry.label(), entry.count)),
        ),
        by_type: chart(
            stats
                .by_type
                .iter()
                .map(|entry| (entry.kind.clone(), entry.count)),
        ),
    }
}

pub async fn run(ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::Stats).await?;

    let stats = ctx
        .client
        .stats()
        .await
        .map_err(|e| report_failure(&e, "Could not load statistics"))?;

    print_template(&StatsTemplate {
        view: build_view(&stats),
    })
}
