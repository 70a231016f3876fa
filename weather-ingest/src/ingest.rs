use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use sqlx::{Connection, PgConnection};
use std::sync::Arc;
use tracing::{debug, error, info};

/// One submitted reading. Field names match what the station firmware sends;
/// extra fields in the payload are ignored.
#[derive(Debug, Deserialize)]
pub struct NewReading {
    pub outdoor: f64,
    pub indoor: f64,
    pub pressure_mmhg: f64,
    pub pressure_hpa: f64,
}

pub async fn submit_reading_handler(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
) -> Result<Response, ApiError> {
    debug!("Received reading submission");

    let mut req = req;
    let body_bytes = to_bytes(req.body_mut(), state.max_request_body_bytes).await?;

    // Malformed JSON, a missing field and a non-numeric field are all the
    // same client error.
    let reading: NewReading =
        serde_json::from_slice(&body_bytes).map_err(|_| ApiError::MissingFields)?;

    insert_reading(&state, &reading).await.map_err(|e| {
        error!("Failed to persist reading: {}", e);
        ApiError::Database(e)
    })?;

    info!(
        outdoor = reading.outdoor,
        indoor = reading.indoor,
        pressure_mmhg = reading.pressure_mmhg,
        pressure_hpa = reading.pressure_hpa,
        "Reading stored"
    );
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))).into_response())
}

async fn insert_reading(state: &AppState, reading: &NewReading) -> sqlx::Result<()> {
    // One connection per request, dropped right after the statement.
    let mut conn = PgConnection::connect_with(&state.connect).await?;
    sqlx::query(
        "INSERT INTO weather_data (outdoor_temp, indoor_temp, pressure_mmhg, pressure_hpa) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(reading.outdoor)
    .bind(reading.indoor)
    .bind(reading.pressure_mmhg)
    .bind(reading.pressure_hpa)
    .execute(&mut conn)
    .await?;
    Ok(())
}

// Helper to read the full body with size limit
async fn to_bytes(body: &mut Body, max_size: usize) -> Result<Bytes, ApiError> {
    use axum::body::HttpBody;
    use bytes::BytesMut;

    let mut buf = BytesMut::new();
    let mut total_size: usize = 0;

    while let Some(chunk_res) = body.data().await {
        let chunk = chunk_res.map_err(|_| ApiError::MissingFields)?;

        // Check for overflow and size limit
        total_size = match total_size.checked_add(chunk.len()) {
            Some(new_size) if new_size <= max_size => new_size,
            _ => return Err(ApiError::BodyTooLarge),
        };

        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}
