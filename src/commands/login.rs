use clap::Args as ClapArgs;
use inquire::{Password, Text};
use miette::IntoDiagnostic as _;

use crate::api::LoginRequest;
use crate::notify::Notification;
use crate::session::SessionError;
use crate::validation::validate_login;

use super::{Context, report_failure};

#[derive(ClapArgs, Default)]
pub struct Args {
    /// Account email (prompted when omitted)
    #[arg(long, short)]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "WEBSEC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Text::new("Email:").prompt().into_diagnostic()?,
    };

    let password = match args.password {
        Some(password) => password,
        None => Password::new("Password:")
            .without_confirmation()
            .prompt()
            .into_diagnostic()?,
    };

    let email = email.trim().to_string();
    validate_login(&email, &password)?;

    let credentials = LoginRequest { email, password };

    let session = match ctx.session.login(&ctx.client, &credentials).await {
        Ok(session) => session,
        Err(SessionError::Api(e)) => {
            return Err(report_failure(&e, "Invalid email or password"));
        }
        Err(e) => return Err(e.into()),
    };

    Notification::success(format!("Signed in as {}", session.user.name)).emit();

    ctx.sync_token();

    println!("Run `websec dashboard` to see your scans.");

    Ok(())
}
