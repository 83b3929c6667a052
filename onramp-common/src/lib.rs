//! Common types and utilities shared between onramp-api and onramp-cli

pub mod quota;
pub mod roles;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Errors shared between the API service and the CLI
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid role name: {0}")]
    InvalidRoleName(String),

    #[error("invalid project name: {name} (did you mean \"{suggestion}\"?)")]
    InvalidProjectName { name: String, suggestion: String },

    #[error("invalid quota file: {0}")]
    QuotaFile(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request to create a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub name: String,
    /// Defaults to `name` when not provided
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Request to create a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub requester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to set project quotas
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaRequest {
    pub multiplier: i64,
}

impl QuotaRequest {
    /// The multiplier must be a positive integer
    pub fn validate(&self) -> Result<(), Error> {
        if self.multiplier <= 0 {
            return Err(Error::Validation(format!(
                "multiplier must be a positive integer, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

/// Standard API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: Some(message.into()),
        }
    }
}

/// Role membership information returned by the role endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleStatus {
    pub user: String,
    pub project: String,
    pub role: String,
    pub has_role: bool,
}

/// Response envelope for role queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub error: bool,
    pub role: RoleStatus,
}

static PROJECT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Normalize a project name into a form valid for a namespace.
///
/// Runs of characters outside `[A-Za-z0-9_]` collapse to a single `-`,
/// the result is lowercased and stripped of leading/trailing dashes.
pub fn normalize_project_name(name: &str) -> String {
    PROJECT_NAME_REGEX
        .replace_all(name, "-")
        .to_lowercase()
        .trim_matches('-')
        .to_string()
}

/// Check that a project name is already in its normalized form.
///
/// A name that normalizes differently is rejected with the safe name
/// suggested in the error.
pub fn validate_project_name(name: &str) -> Result<(), Error> {
    let normalized = normalize_project_name(name);
    if name != normalized || normalized.is_empty() {
        return Err(Error::InvalidProjectName {
            name: name.to_string(),
            suggestion: normalized,
        });
    }
    Ok(())
}
