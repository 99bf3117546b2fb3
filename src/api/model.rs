//! Payloads exchanged with the scanning backend.
//!
//! Responses are first deserialized into `*Wire` structs that mirror the JSON
//! exactly, then converted with `TryFrom` into the entities the views use.
//! Anything that fails those checks never reaches a view.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponseWire {
    pub token: String,
    pub user: User,
}

/// Credential and identity returned by a successful login.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl TryFrom<AuthResponseWire> for Session {
    type Error = ApiError;

    fn try_from(value: AuthResponseWire) -> Result<Self, Self::Error> {
        if value.token.trim().is_empty() {
            return Err(ApiError::invalid_payload("login response carries an empty token"));
        }

        Ok(Session {
            token: value.token,
            user: value.user,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ScanStatus {
    /// No further progress is expected once a scan reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanStatus::Pending => "Pending",
            ScanStatus::InProgress => "In progress",
            ScanStatus::Completed => "Completed",
            ScanStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Parses the backend's upper-case code, e.g. `HIGH`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "HIGH" => Some(Severity::High),
            "MEDIUM" => Some(Severity::Medium),
            "LOW" => Some(Severity::Low),
            "INFO" => Some(Severity::Info),
            "UNKNOWN" => Some(Severity::Unknown),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Information",
            Severity::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResultWire {
    pub id: u64,
    pub url: String,
    pub status: ScanStatus,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub id: u64,
    pub url: String,
    pub status: ScanStatus,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanResult {
    pub fn created_display(&self) -> String {
        self.created_at.format("%d/%m/%Y %H:%M").to_string()
    }
}

/// Accepts RFC 3339 as well as the offset-less ISO-8601 form many Java
/// backends emit; the latter is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::invalid_payload(format!("'{raw}' is not a timestamp")))
}

impl TryFrom<ScanResultWire> for ScanResult {
    type Error = ApiError;

    fn try_from(value: ScanResultWire) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&value.created_at)?;

        let completed_at = value
            .completed_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(ScanResult {
            id: value.id,
            url: value.url,
            status: value.status,
            severity: value.severity.unwrap_or_default(),
            created_at,
            completed_at,
        })
    }
}

pub fn convert_scans(wire: Vec<ScanResultWire>) -> Result<Vec<ScanResult>, ApiError> {
    wire.into_iter().map(ScanResult::try_from).collect()
}

#[derive(Debug, Serialize, Clone)]
pub struct StartScanRequest {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartScanResponse {
    pub site_id: u64,
    pub scan_result_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgressWire {
    pub scan_result_id: u64,
    pub progress: f64,
    pub status: ScanStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// One progress snapshot of a running scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    pub scan_result_id: u64,
    pub progress: f64,
    pub status: ScanStatus,
    pub message: Option<String>,
}

impl TryFrom<ScanProgressWire> for ScanProgress {
    type Error = ApiError;

    fn try_from(value: ScanProgressWire) -> Result<Self, Self::Error> {
        if !value.progress.is_finite() || !(0.0..=100.0).contains(&value.progress) {
            return Err(ApiError::invalid_payload(format!(
                "progress {} is outside 0..=100",
                value.progress
            )));
        }

        Ok(ScanProgress {
            scan_result_id: value.scan_result_id,
            progress: value.progress,
            status: value.status,
            message: value.message.filter(|m| !m.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportHtml {
    pub content: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
}

/// Aggregates keep the backend's severity code as is, so values outside the
/// known set still get a row of their own.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SeverityCount {
    pub severity: String,
    pub count: u64,
}

impl SeverityCount {
    pub fn label(&self) -> String {
        Severity::from_code(&self.severity)
            .map(|known| known.label().to_string())
            .unwrap_or_else(|| self.severity.clone())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    #[serde(default)]
    pub by_type: Vec<TypeCount>,
    #[serde(default)]
    pub by_severity: Vec<SeverityCount>,
    pub scan_count: u64,
}

impl ScanStats {
    pub fn count_for(&self, severity: Severity) -> u64 {
        self.by_severity
            .iter()
            .filter(|entry| Severity::from_code(&entry.severity) == Some(severity))
            .map(|entry| entry.count)
            .sum()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub scan_count: u64,
}
