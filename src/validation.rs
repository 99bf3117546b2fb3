//! Client-side checks run before any request leaves the process.

use reqwest::Url;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ValidationError {
    #[error("invalid email format: '{0}'")]
    #[diagnostic(code(websec::validation::email))]
    InvalidEmail(String),

    #[error("password is required")]
    #[diagnostic(code(websec::validation::password))]
    PasswordRequired,

    #[error("name must contain at least {min} characters")]
    #[diagnostic(code(websec::validation::name))]
    NameTooShort { min: usize },

    #[error("password must contain at least {min} characters")]
    #[diagnostic(code(websec::validation::password))]
    PasswordTooShort { min: usize },

    #[error("passwords do not match")]
    #[diagnostic(code(websec::validation::password))]
    PasswordMismatch,

    #[error("invalid URL '{url}': {reason}")]
    #[diagnostic(
        code(websec::validation::url),
        help("use an absolute URL, for example https://example.com")
    )]
    InvalidUrl { url: String, reason: String },

    #[error("URL must start with http:// or https://: '{0}'")]
    #[diagnostic(code(websec::validation::url))]
    UnsupportedScheme(String),

    #[error("invalid identifier '{0}'")]
    #[diagnostic(
        code(websec::validation::identifier),
        help("identifiers are positive integers")
    )]
    InvalidIdentifier(String),
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };

    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;

    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }

    Ok(())
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort { min: MIN_NAME_LEN });
    }

    validate_email(email)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }

    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Checks a scan target and returns it trimmed, ready to submit.
pub fn validate_scan_url(raw: &str) -> Result<String, ValidationError> {
    let candidate = raw.trim();

    if !(candidate.starts_with("http://") || candidate.starts_with("https://")) {
        return Err(ValidationError::UnsupportedScheme(candidate.to_string()));
    }

    let parsed = Url::parse(candidate).map_err(|e| ValidationError::InvalidUrl {
        url: candidate.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::InvalidUrl {
            url: candidate.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(candidate.to_string())
}

pub fn parse_identifier(raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidIdentifier(raw.to_string())),
    }
}
