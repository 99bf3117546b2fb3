//! Session store: the signed-in identity and bearer credential.
//!
//! The store is created once at startup from the persisted session file and
//! handed to every view that needs it. It only changes through
//! [`SessionStore::login`] and [`SessionStore::logout`].

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest, Session, User};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SessionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session at {path}")]
    #[diagnostic(code(websec::session::storage))]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session")]
    #[diagnostic(code(websec::session::encode))]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Restores the session persisted at `path`, if any. An unreadable file
    /// counts as signed out.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = read_session(&path);

        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub async fn login(
        &mut self,
        client: &ApiClient,
        credentials: &LoginRequest,
    ) -> Result<&Session, SessionError> {
        let session = client.login(credentials).await?;
        self.establish(session)
    }

    pub async fn register(
        &self,
        client: &ApiClient,
        payload: &RegisterRequest,
    ) -> Result<(), SessionError> {
        client.register(payload).await?;
        Ok(())
    }

    /// Stores `session` as the current one and persists it.
    pub fn establish(&mut self, session: Session) -> Result<&Session, SessionError> {
        let encoded = serde_json::to_string_pretty(&session)?;

        write_private(&self.path, encoded.as_bytes()).map_err(|source| SessionError::Storage {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "session persisted");

        Ok(self.current.insert(session))
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;

        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Storage {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Writes `contents` readable by the owner only, since it holds the bearer
/// token.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // mode only applies on creation; tighten a file left by an older run
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)
}

fn read_session(path: &Path) -> Option<Session> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read session file");
            return None;
        }
    };

    match serde_json::from_str::<Session>(&content) {
        Ok(session) if !session.token.trim().is_empty() => Some(session),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
            None
        }
    }
}
