use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{PersonalInfoForm, StepQuery},
};

use super::multipart::MultipartForm;

const ANALYSIS_FAILED: &str = "Failed to process solar analysis";

/// One-shot analysis over a multipart form carrying the address, coordinates,
/// contact details and any documents. Nothing is persisted.
pub async fn solar_analysis(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let outcome = match multipart {
        Ok(multipart) => run(&state, multipart).await,
        Err(rejection) => Err(AppError::from(rejection)),
    };

    match outcome {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            let status = match e.status_code() {
                status if status.is_client_error() => status,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = e.public_message(ANALYSIS_FAILED);

            (status, Json(json!({ "success": false, "error": message }))).into_response()
        }
    }
}

async fn run(state: &AppState, multipart: Multipart) -> AppResult<serde_json::Value> {
    let form = MultipartForm::read(multipart).await?;

    let step_data = StepQuery {
        address: form.field("address"),
        latitude: form.field("latitude"),
        longitude: form.field("longitude"),
    }
    .validate()?;

    // The agent runs without asking for consent.
    let personal_info = PersonalInfoForm {
        first_name: form.field("firstName"),
        last_name: form.field("lastName"),
        email: form.field("email"),
        phone: form.field("phone"),
        consent: Some("true".to_string()),
    }
    .validate()?;

    let report = state
        .quote_service
        .run_solar_analysis(&step_data, &form.documents, &personal_info);

    Ok(json!({ "success": true, "data": report }))
}
