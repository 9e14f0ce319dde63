//! Fixed-window request limiter keyed by client address

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;
use warp::Filter;

/// Rejection raised when a client exceeds its request budget.
#[derive(Debug)]
pub struct RateLimited;

impl warp::reject::Reject for RateLimited {}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Counts requests per client IP in fixed windows.
///
/// Cheap to clone; clones share the same counters. Requests without a known
/// remote address share a single bucket.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<Option<IpAddr>, Window>>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Record one request from `client` and report whether it is allowed.
    pub fn check(&self, client: Option<IpAddr>) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: Option<IpAddr>, now: Instant) -> bool {
        let mut windows = match self.windows.lock() {
            Ok(windows) => windows,
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = windows.entry(client).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            *entry = Window {
                started_at: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            return false;
        }

        entry.count += 1;
        true
    }

    /// Drop windows that have already expired.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        if let Ok(mut windows) = self.windows.lock() {
            windows.retain(|_, w| now.duration_since(w.started_at) < self.window);
        }
    }

    /// Number of tracked clients (including expired windows).
    pub fn len(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filter that rejects with [`RateLimited`] once the caller's budget is spent.
pub fn with_rate_limit(
    limiter: RateLimiter,
) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::addr::remote()
        .and_then(move |remote: Option<SocketAddr>| {
            let limiter = limiter.clone();
            async move {
                let client = remote.map(|addr| addr.ip());
                if limiter.check(client) {
                    Ok(())
                } else {
                    warn!(client = ?client, "Rate limit exceeded");
                    Err(warp::reject::custom(RateLimited))
                }
            }
        })
        .untuple_one()
}
