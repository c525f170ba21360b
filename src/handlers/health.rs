use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::database;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reports healthy only if the store answers a ping.
pub async fn health(pool: web::Data<SqlitePool>) -> HttpResponse {
    match database::ping(&pool).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            database: "connected".to_string(),
            error: None,
        }),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                timestamp: Utc::now(),
                database: "disconnected".to_string(),
                error: Some(e.to_string()),
            })
        }
    }
}
