//! Route surface of the client. Subcommands and `websec open <path>` both
//! resolve to a [`Route`] before anything is rendered.

use crate::api::Role;
use crate::guard::RequireAuth;
use crate::validation::{ValidationError, parse_identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Login,
    Register,
    Dashboard,
    ScanProgress(u64),
    Report(u64),
    Stats,
    Admin,
    NotFound(String),
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RouteError {
    #[error("404: no page at '{0}'")]
    #[diagnostic(code(websec::route::not_found), help("see `websec --help` for the available views"))]
    NotFound(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidIdentifier(#[from] ValidationError),
}

impl Route {
    /// Resolves a path. Unknown paths land on [`Route::NotFound`]; a
    /// known path with a malformed identifier is an error.
    pub fn parse(path: &str) -> Result<Route, RouteError> {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Index,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["scan", id, "progress"] => Route::ScanProgress(parse_identifier(id)?),
            ["reports", id] => Route::Report(parse_identifier(id)?),
            ["stats"] => Route::Stats,
            ["admin"] => Route::Admin,
            _ => Route::NotFound(path.to_string()),
        };

        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::ScanProgress(id) => format!("/scan/{id}/progress"),
            Route::Report(id) => format!("/reports/{id}"),
            Route::Stats => "/stats".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// The guard wrapping this route, if it is not public.
    pub fn guard(&self) -> Option<RequireAuth> {
        match self {
            Route::Dashboard | Route::ScanProgress(_) | Route::Report(_) | Route::Stats => {
                Some(RequireAuth::signed_in())
            }
            Route::Admin => Some(RequireAuth::with_role(Role::Admin)),
            Route::Index | Route::Login | Route::Register | Route::NotFound(_) => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
