use askama::Template;
use clap::{Args as ClapArgs, Subcommand};
use inquire::Confirm;
use miette::IntoDiagnostic as _;

use crate::api::{AdminUser, Role};
use crate::notify::Notification;
use crate::render::{print_template, table_cell};
use crate::router::Route;
use crate::validation::parse_identifier;

use super::dashboard::{ScanListTemplate, ScanListView, ScanRow, sort_newest_first};
use super::{Context, Reported, report_failure};

#[derive(ClapArgs, Default)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every account with its scan count (default)
    Users,

    /// Show the scans of one user
    Scans {
        /// User identifier
        user_id: String,
    },

    /// Delete a user account
    Delete {
        /// User identifier
        user_id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

struct UserRow {
    id: u64,
    name: String,
    email: String,
    role: Role,
    scan_count: u64,
}

struct UsersView {
    rows: Vec<UserRow>,
}

#[derive(Template)]
#[template(path = "admin/users.md")]
struct UsersTemplate {
    view: UsersView,
}

fn render_users(users: &[AdminUser]) -> miette::Result<()> {
    let rows = users
        .iter()
        .map(|u| UserRow {
            id: u.user.id,
            name: table_cell(&u.user.name),
            email: table_cell(&u.user.email),
            role: u.user.role,
            scan_count: u.scan_count,
        })
        .collect();

    print_template(&UsersTemplate {
        view: UsersView { rows },
    })
}

pub async fn run(args: Args, ctx: &mut Context) -> miette::Result<()> {
    ctx.authorize(&Route::Admin).await?;

    match args.command.unwrap_or(Command::Users) {
        Command::Users => list_users(ctx).await,
        Command::Scans { user_id } => show_user_scans(&user_id, ctx).await,
        Command::Delete { user_id, yes } => delete_user(&user_id, yes, ctx).await,
    }
}

async fn load_users(ctx: &Context) -> miette::Result<Vec<AdminUser>> {
    ctx.client
        .list_users()
        .await
        .map_err(|e| report_failure(&e, "Could not load users"))
}

async fn list_users(ctx: &Context) -> miette::Result<()> {
    let users = load_users(ctx).await?;
    render_users(&users)
}

async fn show_user_scans(raw_id: &str, ctx: &Context) -> miette::Result<()> {
    let user_id = parse_identifier(raw_id)?;

    let mut scans = ctx
        .client
        .user_scans(user_id)
        .await
        .map_err(|e| report_failure(&e, "Could not load the user's scans"))?;

    sort_newest_first(&mut scans);

    let view = ScanListView {
        title: format!("Scans of user #{user_id}"),
        note: None,
        empty_message: "This user has no scans.".to_string(),
        rows: scans.iter().map(ScanRow::from).collect(),
    };

    print_template(&ScanListTemplate { view })
}

/// Whether the delete action is available for this account.
pub fn can_delete(user: &AdminUser) -> bool {
    user.user.role != Role::Admin
}

/// Drops `user_id` from the held list once the backend confirmed the
/// deletion.
pub fn remove_user(users: &mut Vec<AdminUser>, user_id: u64) {
    users.retain(|u| u.user.id != user_id);
}

async fn delete_user(raw_id: &str, yes: bool, ctx: &Context) -> miette::Result<()> {
    let user_id = parse_identifier(raw_id)?;

    let mut users = load_users(ctx).await?;

    let Some(target) = users.iter().find(|u| u.user.id == user_id) else {
        let message = format!("No user with id {user_id}");
        Notification::error(&message).emit();
        return Err(Reported(message).into());
    };

    if !can_delete(target) {
        let message = format!("{} is an administrator and cannot be deleted", target.user.email);
        Notification::error(&message).emit();
        return Err(Reported(message).into());
    }

    let confirmed = yes
        || Confirm::new(&format!(
            "Delete {} <{}> and all of their scans?",
            target.user.name, target.user.email
        ))
        .with_default(false)
        .prompt()
        .into_diagnostic()?;

    if !confirmed {
        Notification::info("Deletion cancelled").emit();
        return Ok(());
    }

    ctx.client
        .delete_user(user_id)
        .await
        .map_err(|e| report_failure(&e, "Could not delete the user"))?;

    remove_user(&mut users, user_id);

    Notification::success("User deleted").emit();

    render_users(&users)
}
