use askama::Template;

use crate::api::{Role, User};
use crate::render::print_template;

use super::Context;

struct IndexView<'a> {
    user: Option<&'a User>,
    is_admin: bool,
    backend: String,
}

#[derive(Template)]
#[template(path = "index.md")]
struct IndexTemplate<'a> {
    view: IndexView<'a>,
}

pub fn run(ctx: &Context) -> miette::Result<()> {
    let user = ctx.session.current_user();

    let view = IndexView {
        user,
        is_admin: user.is_some_and(|u| u.role == Role::Admin),
        backend: ctx.client.base_url().to_string(),
    };

    print_template(&IndexTemplate { view })
}
