use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_api::{
    background_task::start_eviction_task,
    constants::set_expose_error_details,
    graceful_shutdown::shutdown_signal,
    limiter::redis_limiter::ping,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    web::build_cors,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    set_expose_error_details(config.is_development());

    let app_state = web::Data::new(AppState::from_config(config.clone())?);

    if let Some(pool) = &app_state.redis_pool {
        match ping(pool).await {
            Ok(()) => tracing::info!("Redis reachable; rate limits are shared"),
            Err(e) => tracing::warn!("Redis not reachable yet, limiter will fail open: {}", e),
        }
    }

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting Portfolio API v{} on {} (limiter: {})",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.rate_limiter.backend()
    );

    let eviction = tokio::spawn(start_eviction_task(
        app_state.rate_limiter.clone(),
        std::time::Duration::from_secs(config.rate_limit_evict_interval_secs.max(1)),
    ));

    let server_state = app_state.clone();
    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .wrap(build_cors(&cors_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    };

    eviction.abort();
    result.map_err(Into::into)
}
