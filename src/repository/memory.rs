use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::AppResult;
use crate::models::{QuoteId, QuoteRequest, SolarAnalysisResult};

use super::{AnalysisRepository, QuoteRepository};

/// Process-lifetime quote store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryQuoteRepository {
    quotes: Arc<RwLock<HashMap<QuoteId, QuoteRequest>>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    #[instrument(name = "store.quote.put", skip(self, quote), fields(quote_id = %quote.id, status = %quote.status))]
    async fn put(&self, quote: &QuoteRequest) -> AppResult<()> {
        self.quotes
            .write()
            .await
            .insert(quote.id.clone(), quote.clone());
        Ok(())
    }

    #[instrument(name = "store.quote.get", skip(self))]
    async fn get(&self, id: &QuoteId) -> AppResult<Option<QuoteRequest>> {
        Ok(self.quotes.read().await.get(id).cloned())
    }

    #[instrument(name = "store.quote.list_all", skip(self))]
    async fn list_all(&self) -> AppResult<Vec<QuoteRequest>> {
        let mut quotes: Vec<QuoteRequest> = self.quotes.read().await.values().cloned().collect();
        quotes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(quotes)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAnalysisRepository {
    results: Arc<RwLock<HashMap<QuoteId, SolarAnalysisResult>>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    #[instrument(name = "store.analysis.put", skip(self, result), fields(quote_id = %result.quote_id))]
    async fn put(&self, result: &SolarAnalysisResult) -> AppResult<()> {
        self.results
            .write()
            .await
            .insert(result.quote_id.clone(), result.clone());
        Ok(())
    }

    #[instrument(name = "store.analysis.get", skip(self))]
    async fn get(&self, id: &QuoteId) -> AppResult<Option<SolarAnalysisResult>> {
        Ok(self.results.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::generate_analysis;
    use crate::models::{Location, PersonalInfo, QuoteStatus};

    fn quote(id: &str) -> QuoteRequest {
        QuoteRequest::processing(
            QuoteId::from(id),
            "1 Solar Way".to_string(),
            Location {
                latitude: 50.0,
                longitude: 3.0,
            },
            PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_quote() {
        let repo = InMemoryQuoteRepository::new();
        let processing = quote("q0000001");
        repo.put(&processing).await.unwrap();

        let result = generate_analysis(
            &processing.id,
            &processing.address,
            processing.location,
            &processing.personal_info,
        );
        let completed = processing.clone().complete(&result).unwrap();
        repo.put(&completed).await.unwrap();

        let stored = repo.get(&processing.id).await.unwrap().expect("quote should exist");
        assert_eq!(stored.status, QuoteStatus::Completed);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_quote_returns_none() {
        let repo = InMemoryQuoteRepository::new();
        assert!(repo.get(&QuoteId::from("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_creation() {
        let repo = InMemoryQuoteRepository::new();
        let first = quote("zzzz0001");
        let second = QuoteRequest {
            created_at: first.created_at + time::Duration::seconds(1),
            ..quote("aaaa0002")
        };

        repo.put(&second).await.unwrap();
        repo.put(&first).await.unwrap();

        let ids: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id.to_string())
            .collect();
        assert_eq!(ids, vec!["zzzz0001", "aaaa0002"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryAnalysisRepository::new();
        let handle = repo.clone();
        let q = quote("shared01");
        let result = generate_analysis(&q.id, &q.address, q.location, &q.personal_info);

        repo.put(&result).await.unwrap();

        assert_eq!(handle.get(&q.id).await.unwrap(), Some(result));
    }

    #[test]
    fn test_backend_name() {
        tokio_test::block_on(async {
            let repo = InMemoryQuoteRepository::new();
            assert_eq!(repo.backend(), "memory");
            assert!(repo.ping().await.is_ok());
        });
    }
}
