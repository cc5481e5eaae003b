use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// Each variant is one caller-visible category; callers distinguish them by
/// variant (or by [`AppError::code`] over the wire), never by message text.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or malformed required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique-key violation on a farmer's mobile number
    #[error("Farmer with mobile number '{0}' already exists")]
    DuplicateFarmer(String),

    /// No farmer resolves for the given mobile number or id
    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),

    /// Any other referenced entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Write against a foreign key that does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Identifier token is not well-formed
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Bill ledger and farmer history could not be kept in agreement
    #[error("Consistency failure: {0}")]
    ConsistencyFailure(String),

    /// Unclassified store access failure (transient, retryable)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors (corrupt rows, failed migrations)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn farmer_not_found(what: impl Into<String>) -> Self {
        AppError::FarmerNotFound(what.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Stable machine-readable category name
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::DuplicateFarmer(_) => "duplicate_farmer",
            AppError::FarmerNotFound(_) => "farmer_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidReference(_) => "invalid_reference",
            AppError::InvalidIdentifier(_) => "invalid_identifier",
            AppError::ConsistencyFailure(_) => "consistency_failure",
            AppError::Storage(_) => "storage_error",
            AppError::Configuration(_) => "configuration_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Only unclassified storage failures are worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "category": self.code(),
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateFarmer(_) => StatusCode::CONFLICT,
            AppError::FarmerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidReference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::ConsistencyFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
