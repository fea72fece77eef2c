//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::{AppState, Storage};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

/// GET /api/health
///
/// `503` when the configured database does not answer.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = match &state.storage {
        Storage::Memory => true,
        #[cfg(feature = "postgres")]
        Storage::Database(db) => match db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Database ping failed: {}", e);
                false
            }
        },
    };

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage.name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
