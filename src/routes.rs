// Route definitions and handlers

use crate::handlers;
use crate::handlers::UnsupportedContentType;
use crate::rate_limit::{with_rate_limit, RateLimiter};
use crate::sos::Dispatcher;
use std::convert::Infallible;
use warp::Filter;

/// Largest accepted request body, in bytes
pub const MAX_BODY_BYTES: u64 = 10 * 1024;

pub fn configure_routes(
    dispatcher: Dispatcher,
    limiter: RateLimiter,
    allowed_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let api = warp::path("api");

    // GET /api/health
    let health = api
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // POST /api/send-sos
    let send_sos = api
        .and(warp::path("send-sos"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_rate_limit(limiter))
        .and(require_json())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_dispatcher(dispatcher))
        .and_then(handlers::send_sos_handler);

    let cors = warp::cors()
        .allow_origins(allowed_origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type"]);

    // Combine routes
    health
        .or(send_sos)
        .with(cors)
        .recover(handlers::handle_rejection)
}

fn with_dispatcher(
    dispatcher: Dispatcher,
) -> impl Filter<Extract = (Dispatcher,), Error = Infallible> + Clone {
    warp::any().map(move || dispatcher.clone())
}

/// Reject bodies whose `content-type` is missing or not `application/json`.
fn require_json() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("content-type")
        .and_then(|content_type: Option<String>| async move {
            match content_type {
                Some(value) if is_json_media_type(&value) => Ok(()),
                _ => Err(warp::reject::custom(UnsupportedContentType)),
            }
        })
        .untuple_one()
}

fn is_json_media_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
