use std::path::PathBuf;

use clap::Args as ClapArgs;
use miette::{Context as _, IntoDiagnostic as _};

use crate::notify::Notification;
use crate::router::Route;
use crate::validation::parse_identifier;

use super::{Context, report_failure};

#[derive(ClapArgs)]
pub struct Args {
    /// Identifier of the scan whose report to open
    pub report_id: String,

    /// Write the HTML report to this file instead of stdout
    #[arg(long, conflicts_with = "pdf")]
    pub html: Option<PathBuf>,

    /// Download the PDF rendition instead of showing the HTML
    #[arg(long)]
    pub pdf: bool,

    /// Where to save the PDF (default: websec-report-<id>.pdf)
    #[arg(long, short, requires = "pdf")]
    pub output: Option<PathBuf>,
}

/// Where the report view sends its content.
#[derive(Debug, Default)]
pub struct Output {
    pub html: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
}

pub fn default_pdf_name(id: u64) -> PathBuf {
    PathBuf::from(format!("websec-report-{id}.pdf"))
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    let id = parse_identifier(&args.report_id)?;

    let output = Output {
        html: args.html,
        pdf: args
            .pdf
            .then(|| args.output.unwrap_or_else(|| default_pdf_name(id))),
    };

    show(id, output, ctx).await
}

pub async fn show(id: u64, output: Output, ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::Report(id)).await?;

    if let Some(path) = output.pdf {
        return download_pdf(id, path, ctx).await;
    }

    let report = ctx
        .client
        .html_report(id)
        .await
        .map_err(|e| report_failure(&e, "Could not load the report"))?;

    // the markup is passed through untouched: sanitizing it is the backend's job
    match output.html {
        Some(path) => {
            std::fs::write(&path, report.content.as_bytes())
                .into_diagnostic()
                .with_context(|| format!("writing report to {}", path.display()))?;

            Notification::success(format!("HTML report saved to {}", path.display())).emit();
        }
        None => println!("{}", report.content),
    }

    Ok(())
}

async fn download_pdf(id: u64, path: PathBuf, ctx: &Context) -> miette::Result<()> {
    let bytes = ctx
        .client
        .pdf_report(id)
        .await
        .map_err(|e| report_failure(&e, "PDF download failed"))?;

    std::fs::write(&path, &bytes)
        .into_diagnostic()
        .with_context(|| format!("writing PDF to {}", path.display()))?;

    Notification::success(format!(
        "PDF report downloaded to {} ({} bytes)",
        path.display(),
        bytes.len()
    ))
    .emit();

    Ok(())
}
