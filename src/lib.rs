use std::{sync::Arc, time::Duration};

use deadpool_redis::Pool as RedisPool;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, mock_data, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, limiter, relay, telemetry, utils, web};

use limiter::{rate_limiter::{InMemoryRateLimiter, RateLimiter}, redis_limiter::RedisRateLimiter};
use relay::form_relay::{ContactRelay, HttpFormRelay};
use repositories::{
    contact::ContactRepository, local_file::LocalContactStore, projects::ProjectCatalog,
    sqlx_repo::SqlxContactRepo,
};
use use_cases::{contact::ContactHandler, demo::DemoHandler, scrape::ScrapeHandler, sms::SmsHandler};
use utils::latency::MockLatency;

pub struct AppState {
    pub config: settings::AppConfig,
    pub contact_handler: ContactHandler,
    pub sms_handler: SmsHandler,
    pub scrape_handler: ScrapeHandler,
    pub demo_handler: DemoHandler,
    pub project_catalog: ProjectCatalog,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub redis_pool: Option<RedisPool>,
    pub mock_latency: MockLatency,
}

/// The swappable collaborators; everything else is derived from config.
#[derive(Default)]
pub struct AppParts {
    pub contact_repo: Option<Arc<dyn ContactRepository>>,
    pub relay: Option<Arc<dyn ContactRelay>>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(config: settings::AppConfig, parts: AppParts) -> Self {
        let mock_latency = MockLatency::from(&config);

        let rate_limiter = parts.rate_limiter.unwrap_or_else(|| match &parts.redis_pool {
            Some(pool) => Arc::new(RedisRateLimiter::new(pool.clone())) as Arc<dyn RateLimiter>,
            None => Arc::new(InMemoryRateLimiter::new()) as Arc<dyn RateLimiter>,
        });

        let contact_handler = ContactHandler::new(
            parts.contact_repo,
            LocalContactStore::new(config.contacts_file.clone()),
            parts.relay,
        );

        AppState {
            contact_handler,
            sms_handler: SmsHandler::new(mock_latency, config.integrations.twilio_configured()),
            scrape_handler: ScrapeHandler::new(
                config.admin_password.clone(),
                config.scraping_enabled,
                Duration::from_millis(config.scrape_review_delay_ms),
            ),
            demo_handler: DemoHandler::new(mock_latency, config.integrations.clone()),
            project_catalog: ProjectCatalog::new(config.projects_file.clone()),
            rate_limiter,
            redis_pool: parts.redis_pool,
            mock_latency,
            config,
        }
    }

    /// Wires real backends from config. Unreachable stores are not fatal:
    /// the contact route falls back per request.
    pub fn from_config(config: settings::AppConfig) -> anyhow::Result<Self> {
        let contact_repo = match config.database_url() {
            Some(url) => {
                let pool = db::postgres::lazy_pool(url)?;
                Some(Arc::new(SqlxContactRepo::new(pool)) as Arc<dyn ContactRepository>)
            }
            None => {
                tracing::info!("No database configured; contacts go to {}", config.contacts_file.display());
                None
            }
        };

        let redis_pool = match config.redis_url() {
            Some(url) => match limiter::redis_limiter::create_redis_pool(url) {
                Ok(pool) => Some(pool),
                Err(e) => {
                    tracing::error!("Redis pool creation error, using in-memory rate limiting: {}", e);
                    None
                }
            },
            None => None,
        };

        let relay = HttpFormRelay::from_config(&config)
            .map_err(|e| anyhow::anyhow!("relay client: {}", e))?
            .map(|relay| Arc::new(relay) as Arc<dyn ContactRelay>);

        Ok(AppState::new(config, AppParts { contact_repo, relay, rate_limiter: None, redis_pool }))
    }
}
