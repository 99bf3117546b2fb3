//! Transient user-visible notifications, the terminal counterpart of toasts.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
    Info(String),
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::Error(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification::Info(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(m) | Notification::Error(m) | Notification::Info(m) => m,
        }
    }

    /// Notifications go to stderr so stdout stays pipeable.
    pub fn emit(&self) {
        match self {
            Notification::Error(m) => debug!(notification = %m, "error"),
            other => debug!(notification = %other.message()),
        }

        eprintln!("{self}");
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Success(m) => write!(f, "✔ {m}"),
            Notification::Error(m) => write!(f, "✖ {m}"),
            Notification::Info(m) => write!(f, "ℹ {m}"),
        }
    }
}
