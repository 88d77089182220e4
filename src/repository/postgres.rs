use async_trait::async_trait;
use sqlx::{FromRow, PgPool, types::Json};
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::models::{
    Location, PersonalInfo, QuoteId, QuoteRequest, QuoteSummary, SolarAnalysisResult,
};

use super::{AnalysisRepository, QuoteRepository};

#[derive(Debug, FromRow)]
struct QuoteRow {
    id: String,
    address: String,
    latitude: f64,
    longitude: f64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    system_size: Option<f64>,
    annual_production: Option<f64>,
    co2_reduction: Option<f64>,
    annual_savings: Option<f64>,
    payback_period: Option<f64>,
}

impl TryFrom<QuoteRow> for QuoteRequest {
    type Error = AppError;

    fn try_from(row: QuoteRow) -> Result<Self, Self::Error> {
        let summary = match (
            row.system_size,
            row.annual_production,
            row.co2_reduction,
            row.annual_savings,
            row.payback_period,
        ) {
            (
                Some(system_size),
                Some(annual_production),
                Some(co2_reduction),
                Some(annual_savings),
                Some(payback_period),
            ) => Some(QuoteSummary {
                system_size,
                annual_production,
                co2_reduction,
                annual_savings,
                payback_period,
            }),
            _ => None,
        };

        Ok(QuoteRequest {
            id: QuoteId::from(row.id),
            address: row.address,
            location: Location {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            personal_info: PersonalInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
            },
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            summary,
        })
    }
}

const QUOTE_COLUMNS: &str = "id, address, latitude, longitude, first_name, last_name, email, phone, \
     status, created_at, updated_at, system_size, annual_production, co2_reduction, \
     annual_savings, payback_period";

#[derive(Clone)]
pub struct PgQuoteRepository {
    pool: PgPool,
}

impl PgQuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    #[instrument(name = "db.quote.put", skip(self, quote), fields(quote_id = %quote.id, status = %quote.status))]
    async fn put(&self, quote: &QuoteRequest) -> AppResult<()> {
        let summary = quote.summary;

        sqlx::query(
            r#"
            INSERT INTO quote_requests (
                id, address, latitude, longitude, first_name, last_name, email, phone,
                status, created_at, updated_at, system_size, annual_production,
                co2_reduction, annual_savings, payback_period
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE SET
                address = EXCLUDED.address,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                system_size = EXCLUDED.system_size,
                annual_production = EXCLUDED.annual_production,
                co2_reduction = EXCLUDED.co2_reduction,
                annual_savings = EXCLUDED.annual_savings,
                payback_period = EXCLUDED.payback_period
            "#,
        )
        .bind(quote.id.as_str())
        .bind(&quote.address)
        .bind(quote.location.latitude)
        .bind(quote.location.longitude)
        .bind(&quote.personal_info.first_name)
        .bind(&quote.personal_info.last_name)
        .bind(&quote.personal_info.email)
        .bind(&quote.personal_info.phone)
        .bind(quote.status.as_str())
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .bind(summary.map(|s| s.system_size))
        .bind(summary.map(|s| s.annual_production))
        .bind(summary.map(|s| s.co2_reduction))
        .bind(summary.map(|s| s.annual_savings))
        .bind(summary.map(|s| s.payback_period))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(name = "db.quote.get", skip(self))]
    async fn get(&self, id: &QuoteId) -> AppResult<Option<QuoteRequest>> {
        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quote_requests WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuoteRequest::try_from).transpose()
    }

    #[instrument(name = "db.quote.list_all", skip(self))]
    async fn list_all(&self) -> AppResult<Vec<QuoteRequest>> {
        let rows = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quote_requests ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(QuoteRequest::try_from).collect()
    }

    #[instrument(name = "db.ping", skip(self))]
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[derive(Clone)]
pub struct PgAnalysisRepository {
    pool: PgPool,
}

impl PgAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisRepository for PgAnalysisRepository {
    #[instrument(name = "db.analysis.put", skip(self, result), fields(quote_id = %result.quote_id))]
    async fn put(&self, result: &SolarAnalysisResult) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO analysis_results (quote_id, payload)
            VALUES ($1, $2)
            ON CONFLICT (quote_id) DO UPDATE SET payload = EXCLUDED.payload
            "#,
        )
        .bind(result.quote_id.as_str())
        .bind(Json(result))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(name = "db.analysis.get", skip(self))]
    async fn get(&self, id: &QuoteId) -> AppResult<Option<SolarAnalysisResult>> {
        let payload = sqlx::query_scalar::<_, Json<SolarAnalysisResult>>(
            "SELECT payload FROM analysis_results WHERE quote_id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(payload.map(|Json(result)| result))
    }
}
