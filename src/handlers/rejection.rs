// Rejection recovery: every error leaves the server as a JSON body

use crate::models::ErrorResponse;
use crate::rate_limit::RateLimited;
use std::convert::Infallible;
use tracing::error;
use warp::http::StatusCode;
use warp::Rejection;

/// Unexpected fault while handling a request.
///
/// The detail is logged and never sent to the client.
#[derive(Debug)]
pub struct InternalFault(pub String);

impl warp::reject::Reject for InternalFault {}

/// Body sent without a JSON `content-type`.
#[derive(Debug)]
pub struct UnsupportedContentType;

impl warp::reject::Reject for UnsupportedContentType {}

pub async fn handle_rejection(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = rejection_body(&err);

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Map a rejection to its status and JSON body.
pub fn rejection_body(err: &Rejection) -> (StatusCode, ErrorResponse) {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::new("Not found"))
    } else if err.find::<RateLimited>().is_some() {
        (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse::new("Too many requests, please try again later."),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("Request body too large"),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            ErrorResponse::new("Content-Length header required"),
        )
    } else if err.find::<UnsupportedContentType>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new("Content-Type must be application/json"),
        )
    } else if err.find::<warp::body::BodyDeserializeError>().is_some() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("Invalid JSON body"))
    } else if err.find::<warp::filters::cors::CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, ErrorResponse::new("Origin not allowed"))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("Method not allowed"),
        )
    } else {
        match err.find::<InternalFault>() {
            Some(InternalFault(detail)) => error!(detail = %detail, "Internal error"),
            None => error!(rejection = ?err, "Unhandled rejection"),
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Internal server error").with_message("An unexpected error occurred"),
        )
    }
}
