use clap::Args as ClapArgs;
use inquire::{Password, Text};
use miette::IntoDiagnostic as _;

use crate::api::RegisterRequest;
use crate::notify::Notification;
use crate::session::SessionError;
use crate::validation::validate_registration;

use super::{Context, report_failure};

#[derive(ClapArgs, Default)]
pub struct Args {
    /// Display name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Account email (prompted when omitted)
    #[arg(long, short)]
    pub email: Option<String>,

    /// Password, at least 8 characters (prompted when omitted)
    #[arg(long, env = "WEBSEC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Password confirmation (prompted when omitted)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

fn prompt_secret(message: &str) -> miette::Result<String> {
    Password::new(message)
        .without_confirmation()
        .prompt()
        .into_diagnostic()
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => Text::new("Name:").prompt().into_diagnostic()?,
    };

    let email = match args.email {
        Some(email) => email,
        None => Text::new("Email:").prompt().into_diagnostic()?,
    };

    let password = match args.password {
        Some(password) => password,
        None => prompt_secret("Password:")?,
    };

    let confirmation = match args.confirm_password {
        Some(confirmation) => confirmation,
        None => prompt_secret("Confirm password:")?,
    };

    let name = name.trim().to_string();
    let email = email.trim().to_string();

    validate_registration(&name, &email, &password, &confirmation)?;

    let payload = RegisterRequest {
        name,
        email: email.clone(),
        password,
    };

    match ctx.session.register(&ctx.client, &payload).await {
        Ok(()) => {}
        Err(SessionError::Api(e)) => {
            return Err(report_failure(&e, "Registration failed"));
        }
        Err(e) => return Err(e.into()),
    }

    Notification::success("Registration succeeded, you can now sign in").emit();
    println!("Run `websec login --email {email}` to sign in.");

    Ok(())
}
