use std::sync::Arc;

use tracing::instrument;

use crate::{
    analysis::{AgentReport, generate_analysis, solar_agent_report},
    error::{AppError, AppResult, PipelineStep},
    models::{
        Location, PersonalInfo, PersonalInfoForm, QuoteId, QuoteRequest, SolarAnalysisResult,
        StepData, StepQuery, UploadedDocument,
    },
    notification::{Notifier, quote_ready_email},
    repository::{
        AnalysisRepository, InMemoryAnalysisRepository, InMemoryQuoteRepository, QuoteRepository,
    },
    telemetry::{
        ANALYSES_GENERATED, NOTIFICATIONS_FAILED, QUOTES_COMPLETED, QUOTES_REJECTED,
        QUOTES_SUBMITTED, UPLOADS_RECEIVED,
    },
};

/// Owns the quote lifecycle: the only writer of quote requests and analyses.
#[derive(Clone)]
pub struct QuoteService {
    quotes: Arc<dyn QuoteRepository>,
    analyses: Arc<dyn AnalysisRepository>,
    notifier: Arc<dyn Notifier>,
    app_url: String,
}

impl QuoteService {
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        analyses: Arc<dyn AnalysisRepository>,
        notifier: Arc<dyn Notifier>,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            quotes,
            analyses,
            notifier,
            app_url: app_url.into(),
        }
    }

    pub fn in_memory(notifier: Arc<dyn Notifier>, app_url: impl Into<String>) -> Self {
        Self::new(
            Arc::new(InMemoryQuoteRepository::new()),
            Arc::new(InMemoryAnalysisRepository::new()),
            notifier,
            app_url,
        )
    }

    pub fn storage_backend(&self) -> &'static str {
        self.quotes.backend()
    }

    pub async fn storage_ping(&self) -> AppResult<()> {
        self.quotes.ping().await
    }

    /// Final wizard step. Nothing is stored unless the form and the carried
    /// step data are both valid.
    #[instrument(name = "quote.submit", skip_all)]
    pub async fn submit(&self, step: &StepQuery, form: &PersonalInfoForm) -> AppResult<QuoteId> {
        let (step_data, personal_info) = match validate_submission(step, form) {
            Ok(valid) => valid,
            Err(e) => {
                QUOTES_REJECTED.add(1, &[]);
                tracing::info!(error = %e, "Quote submission rejected");
                return Err(e);
            }
        };

        let quote_id = QuoteId::generate();

        self.process(
            quote_id.clone(),
            step_data.address,
            step_data.location,
            personal_info,
        )
        .await?;

        Ok(quote_id)
    }

    /// Runs the pipeline to completion: store the request as processing,
    /// generate and store the analysis, mark the request completed, then
    /// notify. There is no rollback; a failure part-way leaves earlier writes
    /// in place.
    #[instrument(
        name = "quote.process",
        skip(self, address, personal_info),
        fields(quote_id = %quote_id)
    )]
    pub async fn process(
        &self,
        quote_id: QuoteId,
        address: String,
        location: Location,
        personal_info: PersonalInfo,
    ) -> AppResult<QuoteRequest> {
        let request = QuoteRequest::processing(quote_id, address, location, personal_info);

        self.quotes
            .put(&request)
            .await
            .map_err(|e| AppError::pipeline(PipelineStep::StoreRequest, e))?;

        QUOTES_SUBMITTED.add(1, &[]);

        let result = generate_analysis(
            &request.id,
            &request.address,
            request.location,
            &request.personal_info,
        );

        ANALYSES_GENERATED.add(1, &[]);

        self.analyses
            .put(&result)
            .await
            .map_err(|e| AppError::pipeline(PipelineStep::StoreAnalysis, e))?;

        let completed = request
            .complete(&result)
            .map_err(|e| AppError::pipeline(PipelineStep::CompleteRequest, e))?;

        self.quotes
            .put(&completed)
            .await
            .map_err(|e| AppError::pipeline(PipelineStep::CompleteRequest, e))?;

        QUOTES_COMPLETED.add(1, &[]);

        tracing::info!(
            quote_id = %completed.id,
            system_size = result.system_size,
            annual_production = result.production.annual,
            "Quote completed"
        );

        let email = quote_ready_email(&completed.personal_info, &completed.id, &self.app_url);
        if let Err(e) = self.notifier.send(&email).await {
            NOTIFICATIONS_FAILED.add(1, &[]);
            tracing::warn!(
                quote_id = %completed.id,
                step = %PipelineStep::Notify,
                error = %e,
                "Failed to send quote notification"
            );
        }

        Ok(completed)
    }

    #[instrument(name = "quote.get", skip(self))]
    pub async fn get_quote(&self, quote_id: &QuoteId) -> AppResult<QuoteRequest> {
        self.quotes
            .get(quote_id)
            .await?
            .ok_or(AppError::NotFound("Quote not found".to_string()))
    }

    #[instrument(name = "quote.get_analysis", skip(self))]
    pub async fn get_analysis(&self, quote_id: &QuoteId) -> AppResult<SolarAnalysisResult> {
        self.analyses
            .get(quote_id)
            .await?
            .ok_or(AppError::NotFound("Analysis not found".to_string()))
    }

    /// Every known quote. `user_id` is accepted for future scoping but no
    /// filtering happens: quotes carry no owner.
    #[instrument(name = "quote.list", skip(self))]
    pub async fn list_quotes(&self, user_id: Option<&str>) -> AppResult<Vec<QuoteRequest>> {
        let quotes = self.quotes.list_all().await?;
        tracing::debug!(user_id = ?user_id, count = quotes.len(), "Listed quotes");
        Ok(quotes)
    }

    /// Upload step. Documents are counted and then dropped.
    #[instrument(name = "quote.record_uploads", skip_all, fields(documents = documents.len()))]
    pub fn record_uploads(&self, step_data: &StepData, documents: &[UploadedDocument]) {
        UPLOADS_RECEIVED.add(documents.len() as u64, &[]);

        for document in documents {
            tracing::debug!(
                file_name = %document.file_name,
                kind = ?document.kind,
                size_bytes = document.size_bytes,
                "Document received"
            );
        }

        tracing::info!(
            address = %step_data.address,
            documents = documents.len(),
            "Upload step completed"
        );
    }

    /// Stand-alone agent analysis. Nothing is persisted.
    #[instrument(name = "quote.run_solar_analysis", skip_all, fields(documents = documents.len()))]
    pub fn run_solar_analysis(
        &self,
        step_data: &StepData,
        documents: &[UploadedDocument],
        personal_info: &PersonalInfo,
    ) -> AgentReport {
        let report = solar_agent_report(
            &step_data.address,
            step_data.location.latitude,
            step_data.location.longitude,
            documents.len(),
        );

        tracing::info!(
            email = %personal_info.email,
            annual_production = report.annual_production,
            coverage_percent = report.coverage_percent,
            "Solar analysis completed"
        );

        report
    }
}

fn validate_submission(
    step: &StepQuery,
    form: &PersonalInfoForm,
) -> AppResult<(StepData, PersonalInfo)> {
    let personal_info = form.validate()?;
    let step_data = step.validate()?;
    Ok((step_data, personal_info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::QuoteStatus;
    use crate::notification::{Email, LogNotifier};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Email>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, email: &Email) -> AppResult<()> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _email: &Email) -> AppResult<()> {
            Err(AppError::Notification("smtp unavailable".to_string()))
        }
    }

    /// Records the status of every write so intermediate states are visible.
    #[derive(Default)]
    struct RecordingQuoteRepository {
        inner: InMemoryQuoteRepository,
        writes: Mutex<Vec<(QuoteStatus, bool)>>,
    }

    #[async_trait]
    impl QuoteRepository for RecordingQuoteRepository {
        async fn put(&self, quote: &QuoteRequest) -> AppResult<()> {
            self.writes
                .lock()
                .unwrap()
                .push((quote.status, quote.summary.is_some()));
            self.inner.put(quote).await
        }

        async fn get(&self, id: &QuoteId) -> AppResult<Option<QuoteRequest>> {
            self.inner.get(id).await
        }

        async fn list_all(&self) -> AppResult<Vec<QuoteRequest>> {
            self.inner.list_all().await
        }

        fn backend(&self) -> &'static str {
            "recording"
        }
    }

    struct FailingAnalysisRepository;

    #[async_trait]
    impl AnalysisRepository for FailingAnalysisRepository {
        async fn put(&self, _result: &SolarAnalysisResult) -> AppResult<()> {
            Err(AppError::Internal("write refused".to_string()))
        }

        async fn get(&self, _id: &QuoteId) -> AppResult<Option<SolarAnalysisResult>> {
            Ok(None)
        }
    }

    fn paris_step() -> StepQuery {
        StepQuery {
            address: Some("10 Rue de Paris, Paris".to_string()),
            latitude: Some("48.85".to_string()),
            longitude: Some("2.35".to_string()),
        }
    }

    fn personal_form(consent: bool) -> PersonalInfoForm {
        PersonalInfoForm {
            first_name: Some("Camille".to_string()),
            last_name: Some("Durand".to_string()),
            email: Some("camille@example.com".to_string()),
            phone: Some("0123456789".to_string()),
            consent: consent.then(|| "on".to_string()),
        }
    }

    fn personal_info() -> PersonalInfo {
        personal_form(true).validate().unwrap()
    }

    fn paris() -> Location {
        Location {
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    #[tokio::test]
    async fn test_process_moves_from_processing_to_completed() {
        let quotes = Arc::new(RecordingQuoteRepository::default());
        let service = QuoteService::new(
            quotes.clone(),
            Arc::new(InMemoryAnalysisRepository::new()),
            Arc::new(LogNotifier),
            "http://localhost:3000",
        );

        let completed = service
            .process(
                QuoteId::from("life0001"),
                "10 Rue de Paris, Paris".to_string(),
                paris(),
                personal_info(),
            )
            .await
            .expect("processing should succeed");

        let writes = quotes.writes.lock().unwrap().clone();
        assert_eq!(
            writes,
            vec![
                (QuoteStatus::Processing, false),
                (QuoteStatus::Completed, true)
            ]
        );
        assert!(completed.is_completed());

        let summary = completed.summary.expect("summary should be present");
        assert!((summary.system_size - 3.385).abs() < 1e-9);
        assert!((summary.co2_reduction - 1489.4).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_process_stores_analysis_for_completed_quote() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");
        let id = QuoteId::from("both0001");

        service
            .process(id.clone(), "1 Rue".to_string(), paris(), personal_info())
            .await
            .unwrap();

        let quote = service.get_quote(&id).await.unwrap();
        let analysis = service.get_analysis(&id).await.unwrap();

        assert_eq!(quote.status, QuoteStatus::Completed);
        assert_eq!(analysis.quote_id, id);
        assert_eq!(
            quote.summary.unwrap().annual_production,
            analysis.production.annual
        );
    }

    #[tokio::test]
    async fn test_process_sends_quote_ready_email() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = QuoteService::in_memory(notifier.clone(), "https://solar.example.com");

        service
            .process(
                QuoteId::from("mail0001"),
                "1 Rue".to_string(),
                paris(),
                personal_info(),
            )
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "camille@example.com");
        assert!(
            sent[0]
                .body
                .contains("https://solar.example.com/quote/results?id=mail0001")
        );
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_quote_completed() {
        let service = QuoteService::in_memory(Arc::new(FailingNotifier), "http://localhost:3000");
        let id = QuoteId::from("fail0001");

        let completed = service
            .process(id.clone(), "1 Rue".to_string(), paris(), personal_info())
            .await
            .expect("notification failure should not fail the pipeline");

        assert!(completed.is_completed());
        assert!(service.get_quote(&id).await.unwrap().is_completed());
        assert!(service.get_analysis(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_names_step_and_leaves_processing() {
        let quotes = Arc::new(InMemoryQuoteRepository::new());
        let service = QuoteService::new(
            quotes.clone(),
            Arc::new(FailingAnalysisRepository),
            Arc::new(LogNotifier),
            "http://localhost:3000",
        );
        let id = QuoteId::from("stuck001");

        let err = service
            .process(id.clone(), "1 Rue".to_string(), paris(), personal_info())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Pipeline {
                step: PipelineStep::StoreAnalysis,
                ..
            }
        ));

        let stored = quotes.get(&id).await.unwrap().expect("request was written");
        assert_eq!(stored.status, QuoteStatus::Processing);
        assert!(stored.summary.is_none());
    }

    #[tokio::test]
    async fn test_submit_returns_generated_id() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");

        let id = service
            .submit(&paris_step(), &personal_form(true))
            .await
            .expect("submission should succeed");

        assert_eq!(id.as_str().len(), QuoteId::LEN);
        assert!(service.get_quote(&id).await.unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_submit_without_consent_creates_nothing() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");

        let err = service
            .submit(&paris_step(), &personal_form(false))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(service.list_quotes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_step_data_creates_nothing() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");
        let step = StepQuery {
            latitude: None,
            ..paris_step()
        };

        let err = service.submit(&step, &personal_form(true)).await.unwrap_err();

        assert_eq!(err.to_string(), "Validation error: latitude is required");
        assert!(service.list_quotes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_analysis_is_not_found() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");

        let err = service
            .get_analysis(&QuoteId::from("nope0000"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reading_analysis_twice_is_stable() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");
        let id = service
            .submit(&paris_step(), &personal_form(true))
            .await
            .unwrap();

        let first = service.get_analysis(&id).await.unwrap();
        let second = service.get_analysis(&id).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_ignores_user_scope() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");
        service
            .submit(&paris_step(), &personal_form(true))
            .await
            .unwrap();
        service
            .submit(&paris_step(), &personal_form(true))
            .await
            .unwrap();

        assert_eq!(service.list_quotes(None).await.unwrap().len(), 2);
        assert_eq!(service.list_quotes(Some("someone")).await.unwrap().len(), 2);
    }

    #[test]
    fn test_run_solar_analysis_counts_documents() {
        let service = QuoteService::in_memory(Arc::new(LogNotifier), "http://localhost:3000");
        let step_data = paris_step().validate().unwrap();
        let documents = vec![UploadedDocument {
            file_name: "bill.pdf".to_string(),
            kind: crate::models::DocumentKind::Pdf,
            size_bytes: 1024,
        }];

        let report = service.run_solar_analysis(&step_data, &documents, &personal_info());

        assert_eq!(report.inputs.document_count, 1);
        assert_eq!(report.inputs.address, "10 Rue de Paris, Paris");
        assert_eq!(report.annual_production, 4750.0);
    }
}
