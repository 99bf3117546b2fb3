use reqwest::StatusCode;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ApiError {
    /// Missing or expired credential
    #[error("not authorized: {message}")]
    #[diagnostic(
        code(websec::api::unauthorized),
        help("run `websec login` to start a new session")
    )]
    Unauthorized { message: String },

    /// Credential is valid but lacks the required role
    #[error("access denied: {message}")]
    #[diagnostic(code(websec::api::forbidden))]
    Forbidden { message: String },

    #[error("not found: {message}")]
    #[diagnostic(code(websec::api::not_found))]
    NotFound { message: String },

    /// Any other non-2xx answer
    #[error("backend returned {status}: {message}")]
    #[diagnostic(code(websec::api::backend))]
    Backend { status: StatusCode, message: String },

    /// Error within reqwest library (connection refused, timeout, ...)
    #[error("request to the backend failed: {0}")]
    #[diagnostic(
        code(websec::api::transport),
        help("check that the backend is reachable or pass --api-url")
    )]
    Transport(#[from] reqwest::Error),

    /// 2xx answer whose body did not pass validation
    #[error("unexpected response from the backend: {reason}")]
    #[diagnostic(code(websec::api::invalid_payload))]
    InvalidPayload { reason: String },

    #[error("invalid backend url '{url}': {reason}")]
    #[diagnostic(code(websec::api::invalid_url))]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        ApiError::InvalidPayload {
            reason: reason.into(),
        }
    }

    /// Builds the categorized error for a non-2xx response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("no details").to_string());

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { message },
            StatusCode::FORBIDDEN => ApiError::Forbidden { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            status => ApiError::Backend { status, message },
        }
    }

    /// Message suitable for a notification. Backend-provided text is
    /// preferred; `fallback` covers transport and payload failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::NotFound { message }
            | ApiError::Backend { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }
}

// best effort: backends answer either {"message": ..} or {"error": ..}, or plain text
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();

    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return ["message", "error"]
            .iter()
            .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty());
    }

    if body.len() <= 200 && !body.starts_with('<') {
        return Some(body.to_string());
    }

    None
}
