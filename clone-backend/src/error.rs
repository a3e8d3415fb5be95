use actix_web::HttpResponse;
use std::fmt;

/// Error taxonomy for the diary/clone pipelines.
///
/// `InvalidInput` and `NotFound` surface immediately to the caller.
/// `Dependency` covers every external collaborator failure (completion,
/// transcription, extraction); during best-effort enrichment it is logged
/// and swallowed, during a primary action it aborts the request. There are
/// no automatic retries anywhere.
#[derive(Debug)]
pub enum ServiceError {
    InvalidInput(String),
    NotFound(String),
    Dependency(String),
    Database(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "not found: {}", msg),
            ServiceError::Dependency(msg) => write!(f, "dependency failure: {}", msg),
            ServiceError::Database(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> Self {
        ServiceError::Database(e.to_string())
    }
}

impl ServiceError {
    /// Map to an HTTP response. Database details are logged, not leaked.
    pub fn http_response(&self) -> HttpResponse {
        match self {
            ServiceError::InvalidInput(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": msg
            })),
            ServiceError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "error": msg
            })),
            ServiceError::Dependency(msg) => {
                log::error!("Upstream dependency failure: {}", msg);
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "Upstream service failure"
                }))
            }
            ServiceError::Database(msg) => {
                log::error!("Database error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}
