use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::database::connection::DatabaseManager;
use crate::database::models::{Cinema, Film, User};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub catalog: CatalogCounts,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub films: i64,
    pub cinemas: i64,
    pub users: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    // Counting the catalog doubles as the database probe
    let catalog = match count_catalog(&state.db).await {
        Ok(counts) => counts,
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let response_time_ms = start.elapsed().as_millis() as u64;
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: "healthy".to_string(),
            connection_pool_size: state.db.pool.size(),
            response_time_ms,
        },
        catalog,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1")
        .fetch_one(&db.pool)
        .await?;

    Ok(())
}

async fn count_catalog(db: &DatabaseManager) -> Result<CatalogCounts, sqlx::Error> {
    Ok(CatalogCounts {
        films: Film::count(&db.pool).await?,
        cinemas: Cinema::count(&db.pool).await?,
        users: User::count(&db.pool).await?,
    })
}
