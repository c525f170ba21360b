use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::RequestIdExt};

/// Maximum accepted JSON body size.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON extractor config: body limit, and malformed payloads reported as `{"error": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err: JsonPayloadError, req: &HttpRequest| {
            log::debug!(
                "Rejected JSON body (correlation_id={}): {}",
                req.correlation_id().unwrap_or_default(),
                err
            );
            AppError::bad_request(err.to_string()).into()
        })
}

pub async fn api_not_found() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::not_found("API endpoint not found"))
}
