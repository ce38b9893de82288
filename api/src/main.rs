use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use hc_api::middleware::create_cors;
use hc_api::telemetry::init_tracing;
use hc_api::{configure, json_config, ServerState};
use hc_core::services::{
    GreetingSession, RegistryServiceConfig, StaticTokenProvider, TokenRegistryService,
};
use hc_infra::{config::InfrastructureConfig, SharedDispatcher, SharedTokenStore};
use hc_shared::AppConfig;

/// Extra time a dispatch may take on top of the HTTP client timeout
const DISPATCH_GRACE_SECS: u64 = 5;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("heartcast").context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to install tracing subscriber")?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting HeartCast API server"
    );

    let infra = InfrastructureConfig {
        store: config.store.clone(),
        push: config.push.clone(),
    };
    let (store, dispatcher) = hc_infra::initialize(&infra).await;

    let registry = Arc::new(TokenRegistryService::new(
        Arc::new(store),
        Arc::new(dispatcher),
        RegistryServiceConfig {
            dispatch_timeout: Duration::from_secs(
                config.push.request_timeout_secs + DISPATCH_GRACE_SECS,
            ),
            ..RegistryServiceConfig::default()
        },
    ));

    let provider = StaticTokenProvider::new(config.device.push_token.clone());
    let session = if provider.is_configured() {
        let session = Arc::new(GreetingSession::new(registry.clone(), Arc::new(provider)));
        // Registration runs in the background; failures are logged and counted
        let _ = session.start();
        Some(session)
    } else {
        tracing::info!("DEVICE_PUSH_TOKEN not set, /api/v1/press is disabled");
        None
    };

    let state = web::Data::new(ServerState::new(registry, session));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let server_config = config.server.clone();
    let environment = config.environment;

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config())
            .wrap(TracingLogger::default())
            .wrap(create_cors(&server_config, environment))
            .configure(configure::<SharedTokenStore, SharedDispatcher, StaticTokenProvider>)
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")
}
