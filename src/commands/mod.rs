//! The views of the client. Each one guards itself, talks to the backend
//! through the shared [`Context`] and renders to the terminal.

use std::io::IsTerminal as _;

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::cli::Commands;
use crate::config::RootConfig;
use crate::guard::{Access, DenyReason};
use crate::notify::Notification;
use crate::router::{Route, RouteError};
use crate::session::SessionStore;

pub mod admin;
pub mod config;
pub mod dashboard;
pub mod index;
pub mod login;
pub mod logout;
pub mod open;
pub mod progress;
pub mod register;
pub mod report;
pub mod scan;
pub mod stats;
pub mod whoami;

/// Failure already shown to the user as a notification; the binary only
/// has to turn it into a non-zero exit status.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{0}")]
pub struct Reported(pub String);

/// Emits an error notification for `error` and returns the matching report.
pub(crate) fn report_failure(error: &ApiError, fallback: &str) -> miette::Report {
    let message = error.user_message(fallback);
    Notification::error(&message).emit();

    if error.is_auth_failure() {
        Notification::info("Your session may have expired, run `websec login`").emit();
    }

    debug!(error = ?error, "operation failed");

    Reported(message).into()
}

/// Effective configuration: the global file with `api_url` and the
/// environment applied on top.
pub fn load_config(api_url: Option<String>) -> miette::Result<RootConfig> {
    Ok(crate::config::ensure_global_config()?.with_overrides(api_url))
}

/// Session, configuration and client shared by every view of one run.
pub struct Context {
    pub config: RootConfig,
    pub session: SessionStore,
    pub client: ApiClient,
}

impl Context {
    pub fn new(config: RootConfig, session: SessionStore) -> miette::Result<Self> {
        let client =
            ApiClient::from_config(&config)?.with_token(session.token().map(str::to_string));

        Ok(Self {
            config,
            session,
            client,
        })
    }

    /// Builds the context from the state directory, applying `api_url`
    /// over the configured backend origin.
    pub fn load(api_url: Option<String>) -> miette::Result<Self> {
        let config = load_config(api_url)?;
        let session = SessionStore::open(crate::home::session_path()?);

        Self::new(config, session)
    }

    /// Keeps the client's bearer token in line with the session store.
    pub fn sync_token(&mut self) {
        self.client
            .set_token(self.session.token().map(str::to_string));
    }

    /// Runs the guard of `route`. An anonymous caller on an interactive
    /// terminal is redirected through the login view first.
    pub async fn authorize(&mut self, route: &Route) -> miette::Result<()> {
        let Some(guard) = route.guard() else {
            return Ok(());
        };

        let needs_login = matches!(
            guard.check(&self.session),
            Access::Redirect {
                reason: DenyReason::NotAuthenticated,
                ..
            }
        );

        if needs_login && std::io::stdin().is_terminal() {
            Notification::info(format!("{route} requires a session, redirecting to /login")).emit();
            login::run(login::Args::default(), self).await?;
        }

        guard.enforce(&self.session, route)?;

        Ok(())
    }
}

pub async fn dispatch(command: Option<Commands>, ctx: &mut Context) -> miette::Result<()> {
    let Some(command) = command else {
        return index::run(ctx);
    };

    match command {
        Commands::Login(args) => login::run(args, ctx).await,
        Commands::Register(args) => register::run(args, ctx).await,
        Commands::Logout => logout::run(ctx),
        Commands::Whoami => whoami::run(ctx),
        Commands::Dashboard(args) => dashboard::run(args, ctx).await,
        Commands::Scan(args) => scan::run(args, ctx).await,
        Commands::Progress(args) => progress::run(args, ctx).await,
        Commands::Report(args) => report::run(args, ctx).await,
        Commands::Stats => stats::run(ctx).await,
        Commands::Admin(args) => admin::run(args, ctx).await,
        Commands::Open(args) => open::run(args, ctx).await,
        Commands::Config(args) => config::run(args, &ctx.config),
    }
}

/// Renders the view behind `route` with its default options.
pub async fn navigate(route: Route, ctx: &mut Context) -> miette::Result<()> {
    debug!(%route, "navigate");

    match route {
        Route::Index => index::run(ctx),
        Route::Login => login::run(login::Args::default(), ctx).await,
        Route::Register => register::run(register::Args::default(), ctx).await,
        Route::Dashboard => dashboard::run(dashboard::Args::default(), ctx).await,
        Route::ScanProgress(id) => progress::show(id, ctx).await,
        Route::Report(id) => report::show(id, report::Output::default(), ctx).await,
        Route::Stats => stats::run(ctx).await,
        Route::Admin => admin::run(admin::Args::default(), ctx).await,
        Route::NotFound(path) => Err(RouteError::NotFound(path).into()),
    }
}
