use async_trait::async_trait;
use serde_json::Value;
use sos_relay::gateway::{GatewayAck, GatewayError, SmsGateway};
use sos_relay::routes::configure_routes;
use sos_relay::{Dispatcher, RateLimiter};
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warp::Filter;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// In-process gateway that records calls and fails chosen numbers
#[derive(Default)]
pub struct RecordingGateway {
    pub calls: Mutex<Vec<(String, String)>>,
    pub failing: HashSet<String>,
}

impl RecordingGateway {
    pub fn failing(phones: &[&str]) -> Self {
        Self {
            failing: phones.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl SmsGateway for RecordingGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<GatewayAck, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));

        if self.failing.contains(phone) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(GatewayAck(Value::Null))
    }
}

/// Full route tree over the given gateway, with a generous rate limit
pub fn routes_with(
    gateway: Arc<dyn SmsGateway>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    routes_with_limit(gateway, 1000)
}

pub fn routes_with_limit(
    gateway: Arc<dyn SmsGateway>,
    max_requests: u32,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let dispatcher = Dispatcher::new(gateway).with_timeout(Duration::from_millis(500));
    let limiter = RateLimiter::new(Duration::from_secs(60), max_requests);
    configure_routes(dispatcher, limiter, &[ALLOWED_ORIGIN.to_string()])
}

pub fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is not JSON")
}
