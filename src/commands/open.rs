use clap::Args as ClapArgs;

use crate::router::Route;

use super::{Context, navigate};

#[derive(ClapArgs)]
pub struct Args {
    /// Path of the view to open, e.g. /dashboard or /scan/12/progress
    pub path: String,
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    let route = Route::parse(&args.path)?;
    navigate(route, ctx).await
}
