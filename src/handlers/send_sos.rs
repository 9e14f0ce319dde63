// POST /api/send-sos handler

use crate::handlers::InternalFault;
use crate::models::{SendSosRequest, SendSosResponse};
use crate::sos::{validate, Dispatcher};
use tracing::{error, info};
use uuid::Uuid;
use warp::http::StatusCode;

pub async fn send_sos_handler(
    request: SendSosRequest,
    dispatcher: Dispatcher,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request_id = Uuid::new_v4();

    // Nothing is sent unless the whole request is valid
    let alert = match validate(request) {
        Ok(alert) => alert,
        Err(e) => {
            info!(%request_id, error = %e, "Rejected SOS request");
            return Ok(warp::reply::with_status(
                warp::reply::json(&e.to_response()),
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    info!(
        %request_id,
        contacts = alert.contacts.len(),
        "Dispatching SOS alert"
    );

    // A panic inside dispatch surfaces here as a JoinError
    let result = match tokio::spawn(async move { dispatcher.dispatch(&alert).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!(%request_id, error = %e, "SOS dispatch aborted");
            return Err(warp::reject::custom(InternalFault(e.to_string())));
        }
    };

    info!(
        %request_id,
        total = result.total,
        successful = result.success_count,
        failed = result.failure_count,
        "SOS alert dispatched"
    );

    Ok(warp::reply::with_status(
        warp::reply::json(&SendSosResponse::from(result)),
        StatusCode::OK,
    ))
}
