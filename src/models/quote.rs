use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::SolarAnalysisResult;

/// Short opaque token identifying one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    pub const LEN: usize = 8;

    /// Truncated v4 UUID. Collisions are not checked.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().to_string();
        id.truncate(Self::LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QuoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for QuoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Processing,
    Completed,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Processing => "processing",
            QuoteStatus::Completed => "completed",
        }
    }

    /// Only the immediate successor is reachable.
    pub fn can_advance_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (*self, next),
            (QuoteStatus::Pending, QuoteStatus::Processing)
                | (QuoteStatus::Processing, QuoteStatus::Completed)
        )
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QuoteStatus::Pending),
            "processing" => Ok(QuoteStatus::Processing),
            "completed" => Ok(QuoteStatus::Completed),
            other => Err(AppError::Internal(format!("unknown quote status: {other}"))),
        }
    }
}

/// Headline figures copied from the analysis once a quote completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub system_size: f64,
    pub annual_production: f64,
    pub co2_reduction: f64,
    pub annual_savings: f64,
    pub payback_period: f64,
}

impl From<&SolarAnalysisResult> for QuoteSummary {
    fn from(result: &SolarAnalysisResult) -> Self {
        Self {
            system_size: result.system_size,
            annual_production: result.production.annual,
            co2_reduction: result.co2_reduction,
            annual_savings: result.financial.annual_savings,
            payback_period: result.financial.payback_period,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: QuoteId,
    pub address: String,
    pub location: Location,
    pub personal_info: PersonalInfo,
    pub status: QuoteStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(flatten)]
    pub summary: Option<QuoteSummary>,
}

impl QuoteRequest {
    pub fn processing(
        id: QuoteId,
        address: String,
        location: Location,
        personal_info: PersonalInfo,
    ) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id,
            address,
            location,
            personal_info,
            status: QuoteStatus::Processing,
            created_at: now,
            updated_at: now,
            summary: None,
        }
    }

    pub fn complete(self, result: &SolarAnalysisResult) -> AppResult<Self> {
        if !self.status.can_advance_to(QuoteStatus::Completed) {
            return Err(AppError::InvalidTransition {
                from: self.status,
                to: QuoteStatus::Completed,
            });
        }

        Ok(Self {
            status: QuoteStatus::Completed,
            updated_at: OffsetDateTime::now_utc(),
            summary: Some(QuoteSummary::from(result)),
            ..self
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuoteStatus::Completed
    }
}

#[derive(Debug, Serialize)]
pub struct QuotesResponse {
    pub quotes: Vec<QuoteRequest>,
}
