//! Route guard. Pure and synchronous: it only reads the session store.

use crate::api::{Role, User};
use crate::router::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequireAuth {
    required_role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    InsufficientRole { required: Role, actual: Role },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<'a> {
    Granted(&'a User),
    Redirect { to: Route, reason: DenyReason },
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GuardError {
    #[error("you need to sign in to open {route}")]
    #[diagnostic(code(websec::guard::unauthenticated), help("run `websec login`"))]
    NotAuthenticated { route: Route },

    #[error("{route} requires the {required} role, current account is {actual}")]
    #[diagnostic(
        code(websec::guard::forbidden),
        help("run `websec login` with an account that has the {required} role")
    )]
    InsufficientRole {
        route: Route,
        required: Role,
        actual: Role,
    },
}

impl RequireAuth {
    pub fn signed_in() -> Self {
        Self {
            required_role: None,
        }
    }

    pub fn with_role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }

    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    pub fn check<'a>(&self, session: &'a SessionStore) -> Access<'a> {
        let Some(user) = session.current_user() else {
            return Access::Redirect {
                to: Route::Login,
                reason: DenyReason::NotAuthenticated,
            };
        };

        match self.required_role {
            Some(required) if user.role != required => Access::Redirect {
                to: Route::Login,
                reason: DenyReason::InsufficientRole {
                    required,
                    actual: user.role,
                },
            },
            _ => Access::Granted(user),
        }
    }

    /// Same as [`RequireAuth::check`], as an error for command boundaries.
    pub fn enforce<'a>(
        &self,
        session: &'a SessionStore,
        route: &Route,
    ) -> Result<&'a User, GuardError> {
        match self.check(session) {
            Access::Granted(user) => Ok(user),
            Access::Redirect {
                reason: DenyReason::NotAuthenticated,
                ..
            } => Err(GuardError::NotAuthenticated {
                route: route.clone(),
            }),
            Access::Redirect {
                reason: DenyReason::InsufficientRole { required, actual },
                ..
            } => Err(GuardError::InsufficientRole {
                route: route.clone(),
                required,
                actual,
            }),
        }
    }
}
