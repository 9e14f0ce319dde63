use anyhow::Result;
use sos_relay::routes::configure_routes;
use sos_relay::{BulkSmsGateway, Config, Dispatcher, RateLimiter};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Missing credentials are fatal
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(?config, "Configuration loaded");

    let gateway = BulkSmsGateway::from_config(&config)?;
    let dispatcher = Dispatcher::new(Arc::new(gateway));

    let limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max);
    spawn_limiter_cleanup(limiter.clone());

    let routes = configure_routes(dispatcher, limiter, &config.allowed_origins);

    let addr = SocketAddr::new(config.host, config.port);
    info!("Starting server on http://{}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}

fn spawn_limiter_cleanup(limiter: RateLimiter) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            limiter.cleanup_expired();
        }
    });
}
