use thiserror::Error;

/// Failures crossing the remote API boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Maps a non-success HTTP status and its body text onto the taxonomy.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => AppError::Auth(body),
            404 => AppError::NotFound(body),
            400 | 422 => AppError::BadRequest(body),
            409 => AppError::Conflict(body),
            _ => AppError::ExternalService(format!("({}) {}", status, body)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
