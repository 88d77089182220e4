pub mod analysis;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notification;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

use database::create_pool;
use notification::LogNotifier;
use repository::{PgAnalysisRepository, PgQuoteRepository};
use services::QuoteService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quote_service: QuoteService,
}

impl AppState {
    pub fn new(config: Config, quote_service: QuoteService) -> Self {
        Self {
            config,
            quote_service,
        }
    }

    /// In-memory stores unless `DATABASE_URL` is set.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let notifier = Arc::new(LogNotifier);

        let quote_service = match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = create_pool(database_url).await?;
                QuoteService::new(
                    Arc::new(PgQuoteRepository::new(pool.clone())),
                    Arc::new(PgAnalysisRepository::new(pool)),
                    notifier,
                    config.app_url.clone(),
                )
            }
            None => QuoteService::in_memory(notifier, config.app_url.clone()),
        };

        tracing::info!(
            storage = quote_service.storage_backend(),
            "Quote storage ready"
        );

        Ok(Self::new(config, quote_service))
    }
}
