//! Storage for quote requests and their analysis results.
//!
//! Handlers and services only see the traits; the in-memory backend is the
//! default and the Postgres backend is wired in when a database is configured.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{QuoteId, QuoteRequest, SolarAnalysisResult};

pub use memory::{InMemoryAnalysisRepository, InMemoryQuoteRepository};
pub use postgres::{PgAnalysisRepository, PgQuoteRepository};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert or overwrite the record with the same id.
    async fn put(&self, quote: &QuoteRequest) -> AppResult<()>;

    async fn get(&self, id: &QuoteId) -> AppResult<Option<QuoteRequest>>;

    /// Every stored quote, oldest first.
    async fn list_all(&self) -> AppResult<Vec<QuoteRequest>>;

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn put(&self, result: &SolarAnalysisResult) -> AppResult<()>;

    async fn get(&self, id: &QuoteId) -> AppResult<Option<SolarAnalysisResult>>;
}
