//! Concurrent fan-out of one alert to every contact

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::gateway::{GatewayError, SmsGateway};
use crate::models::{AlertRequest, AlertResult, DeliveryFailure, DeliveryOutcome};

/// Budget for each individual gateway call
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends an already-validated alert to every contact in parallel.
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn SmsGateway>,
    delivery_timeout: Duration,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn SmsGateway>) -> Self {
        Self {
            gateway,
            delivery_timeout: DELIVERY_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, delivery_timeout: Duration) -> Self {
        self.delivery_timeout = delivery_timeout;
        self
    }

    /// Deliver `request.message` to every contact and aggregate the outcomes.
    ///
    /// Every delivery runs in its own task with its own timeout. A failing,
    /// hanging or panicking delivery becomes a [`DeliveryFailure`] and never
    /// affects its siblings. Returns once every delivery has resolved.
    pub async fn dispatch(&self, request: &AlertRequest) -> AlertResult {
        let message: Arc<str> = Arc::from(request.message.as_str());

        let handles: Vec<_> = request
            .contacts
            .iter()
            .map(|contact| {
                let gateway = Arc::clone(&self.gateway);
                let message = Arc::clone(&message);
                let phone = contact.phone.clone();
                let budget = self.delivery_timeout;
                let task = tokio::spawn(async move {
                    match timeout(budget, gateway.send(&phone, &message)).await {
                        Ok(result) => result.map(|_ack| ()),
                        Err(_elapsed) => Err(GatewayError::Timeout(budget)),
                    }
                });
                (contact.phone.clone(), task)
            })
            .collect();

        let (phones, tasks): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
        let joined = join_all(tasks).await;

        let outcomes = phones
            .into_iter()
            .zip(joined)
            .map(|(phone, joined)| {
                let result = joined.unwrap_or_else(|e| Err(GatewayError::TaskFailed(e.to_string())));
                match result {
                    Ok(()) => {
                        debug!(phone = %phone, "SMS delivered");
                        DeliveryOutcome::Success
                    }
                    Err(e) => {
                        warn!(phone = %phone, error = %e, "SMS delivery failed");
                        DeliveryOutcome::Failure(DeliveryFailure {
                            phone,
                            error: e.to_string(),
                        })
                    }
                }
            })
            .collect();

        AlertResult::from_outcomes(outcomes)
    }
}
