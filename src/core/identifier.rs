use uuid::Uuid;

use crate::core::{AppError, Result};

/// Generate a fresh record identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validate an identifier token and return its canonical form
///
/// Tokens that are not UUIDs can never match a stored row, so they are
/// rejected as `InvalidIdentifier` instead of reported as missing.
pub fn parse_id(token: &str) -> Result<String> {
    Uuid::parse_str(token.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidIdentifier(token.to_string()))
}
