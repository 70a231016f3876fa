use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, FromRow, PgConnection};
use std::sync::Arc;
use tracing::debug;

/// One persisted row, as consumers of `weather_data` see it.
#[derive(Debug, Serialize, FromRow)]
pub struct StoredReading {
    pub created_at: DateTime<Utc>,
    pub outdoor_temp: f64,
    pub indoor_temp: f64,
    pub pressure_mmhg: f64,
    pub pressure_hpa: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub hours: Option<i32>,
}

const DEFAULT_WINDOW_HOURS: i32 = 3;
// One week
const MAX_WINDOW_HOURS: i32 = 168;

fn clamp_window(hours: Option<i32>) -> i32 {
    hours.unwrap_or(DEFAULT_WINDOW_HOURS).clamp(1, MAX_WINDOW_HOURS)
}

pub async fn latest_reading_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    debug!("Received latest-reading request");

    let mut conn = PgConnection::connect_with(&state.connect).await?;
    let row: Option<StoredReading> = sqlx::query_as(
        "SELECT created_at, outdoor_temp, indoor_temp, pressure_mmhg, pressure_hpa \
         FROM weather_data ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(&mut conn)
    .await?;

    let reading = row.ok_or(ApiError::NoReadings)?;
    Ok((StatusCode::OK, Json(reading)).into_response())
}

pub async fn recent_readings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> Result<Response, ApiError> {
    let hours = clamp_window(params.hours);
    debug!(hours, "Received recent-readings request");

    let mut conn = PgConnection::connect_with(&state.connect).await?;
    let rows: Vec<StoredReading> = sqlx::query_as(
        "SELECT created_at, outdoor_temp, indoor_temp, pressure_mmhg, pressure_hpa \
         FROM weather_data \
         WHERE created_at >= NOW() - make_interval(hours => $1) \
         ORDER BY created_at",
    )
    .bind(hours)
    .fetch_all(&mut conn)
    .await?;

    Ok((StatusCode::OK, Json(rows)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DatabaseConfig};

    fn unreachable_state() -> Arc<AppState> {
        let cfg = Config {
            listen: None,
            database: DatabaseConfig {
                host: "127.0.0.1".to_string(),
                port: Some(1),
                dbname: "weather".to_string(),
                user: "station".to_string(),
                password: "secret".to_string(),
            },
            max_request_body_bytes: None,
        };
        Arc::new(AppState::from_config(&cfg).expect("state"))
    }

    #[test]
    fn window_defaults_to_three_hours() {
        assert_eq!(clamp_window(None), 3);
    }

    #[test]
    fn window_is_clamped_to_bounds() {
        assert_eq!(clamp_window(Some(0)), 1);
        assert_eq!(clamp_window(Some(-5)), 1);
        assert_eq!(clamp_window(Some(12)), 12);
        assert_eq!(clamp_window(Some(10_000)), MAX_WINDOW_HOURS);
    }

    #[tokio::test]
    async fn latest_surfaces_database_errors_as_500() {
        let resp = latest_reading_handler(State(unreachable_state()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = hyper::body::to_bytes(resp.into_body()).await.expect("bytes");
        let v: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(v["status"], "error");
    }

    #[tokio::test]
    async fn recent_surfaces_database_errors_as_500() {
        let resp = recent_readings_handler(
            State(unreachable_state()),
            Query(RecentParams { hours: Some(6) }),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn stored_reading_serializes_column_names() {
        let reading = StoredReading {
            created_at: DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            outdoor_temp: 5.2,
            indoor_temp: 21.0,
            pressure_mmhg: 760.1,
            pressure_hpa: 1013.5,
        };
        let v = serde_json::to_value(&reading).expect("serialize");
        assert_eq!(v["outdoor_temp"], 5.2);
        assert_eq!(v["pressure_hpa"], 1013.5);
        assert!(v["created_at"].is_string());
    }
}
