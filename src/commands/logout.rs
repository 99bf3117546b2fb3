use crate::notify::Notification;

use super::Context;

pub fn run(ctx: &mut Context) -> miette::Result<()> {
    if !ctx.session.is_authenticated() {
        Notification::info("No active session").emit();
        return Ok(());
    }

    ctx.session.logout()?;
    ctx.sync_token();

    Notification::success("Signed out").emit();

    Ok(())
}
