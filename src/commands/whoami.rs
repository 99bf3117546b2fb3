use super::Context;

pub fn run(ctx: &Context) -> miette::Result<()> {
    match ctx.session.current_user() {
        Some(user) => println!("{} <{}> ({}, id {})", user.name, user.email, user.role, user.id),
        None => println!("Not signed in"),
    }

    Ok(())
}
