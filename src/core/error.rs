use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A trip selection the package cannot price (missing price field,
    /// round trip requested on a one-way-only package)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A package authored with unusable pricing data (negative amounts)
    #[error("Invalid package configuration: {0}")]
    InvalidConfig(String),

    /// An out-of-order lifecycle transition. State names are reported
    /// verbatim so a stale panel can be diagnosed from the message alone.
    #[error("Invalid transition: reservation is '{from}', requested '{requested}'")]
    InvalidTransition { from: String, requested: String },

    /// A transition that needs an assigned driver found none
    #[error("Missing driver: {0}")]
    MissingDriver(String),

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Actor role not allowed to perform the requested transition
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Payment provider errors
    #[error("Payment provider error: {0}")]
    Provider(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::MissingDriver(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        AppError::InvalidSelection(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        AppError::InvalidConfig(msg.into())
    }

    pub fn invalid_transition(from: impl Into<String>, requested: impl Into<String>) -> Self {
        AppError::InvalidTransition {
            from: from.into(),
            requested: requested.into(),
        }
    }

    pub fn missing_driver(msg: impl Into<String>) -> Self {
        AppError::MissingDriver(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        AppError::Provider(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
