use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::{Location, PersonalInfo, QuoteId};

pub const TOTAL_STEPS: u8 = 3;

/// Step 1 form body.
#[derive(Debug, Default, Deserialize)]
pub struct AddressForm {
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl AddressForm {
    pub fn into_query(self) -> StepQuery {
        StepQuery {
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Address and coordinates carried from page to page in the query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StepQuery {
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepData {
    pub address: String,
    pub location: Location,
}

impl StepQuery {
    pub fn validate(&self) -> AppResult<StepData> {
        let address = required(&self.address, "address")?;
        let latitude = coordinate(&self.latitude, "latitude")?;
        let longitude = coordinate(&self.longitude, "longitude")?;

        Ok(StepData {
            address,
            location: Location {
                latitude,
                longitude,
            },
        })
    }
}

impl StepData {
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("address", &self.address)
            .append_pair("latitude", &self.location.latitude.to_string())
            .append_pair("longitude", &self.location.longitude.to_string())
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub step: u8,
    pub total_steps: u8,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StepDescriptor {
    pub fn new(step: u8, data: &StepData) -> Self {
        Self {
            step,
            total_steps: TOTAL_STEPS,
            address: data.address.clone(),
            latitude: data.location.latitude,
            longitude: data.location.longitude,
        }
    }
}

/// Step 3 form body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub consent: Option<String>,
}

impl PersonalInfoForm {
    pub fn has_consent(&self) -> bool {
        matches!(self.consent.as_deref(), Some("on") | Some("true"))
    }

    pub fn validate(&self) -> AppResult<PersonalInfo> {
        if !self.has_consent() {
            return Err(AppError::Validation(
                "You must consent to receive your quote analysis".to_string(),
            ));
        }

        Ok(PersonalInfo {
            first_name: required(&self.first_name, "firstName")?,
            last_name: required(&self.last_name, "lastName")?,
            email: required(&self.email, "email")?,
            phone: required(&self.phone, "phone")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    pub id: Option<String>,
}

/// Outcome of the final wizard step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<QuoteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn accepted(quote_id: QuoteId) -> Self {
        Self {
            success: true,
            quote_id: Some(quote_id),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            quote_id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouQuery {
    pub name: Option<String>,
    pub quote_id: Option<String>,
}

/// Confirmation shown after the final step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThankYouView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<QuoteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_url: Option<String>,
}

impl From<ThankYouQuery> for ThankYouView {
    fn from(query: ThankYouQuery) -> Self {
        let quote_id = required(&query.quote_id, "quoteId").ok().map(QuoteId::from);

        Self {
            name: required(&query.name, "name").unwrap_or_else(|_| "there".to_string()),
            results_url: quote_id
                .as_ref()
                .map(|id| format!("/quote/results?id={id}")),
            quote_id,
        }
    }
}

pub(crate) fn required(value: &Option<String>, field: &str) -> AppResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

pub(crate) fn coordinate(value: &Option<String>, field: &str) -> AppResult<f64> {
    let raw = required(value, field)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{field} must be a number")))
}
