// GET /api/health handler

use crate::models::HealthResponse;
use chrono::Utc;
use std::convert::Infallible;
use warp::http::StatusCode;

pub async fn health_handler() -> Result<impl warp::Reply, Infallible> {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::OK,
    ))
}
