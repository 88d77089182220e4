use axum::{
    Form, Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::FormRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    error::AppError,
    models::{
        AddressForm, PersonalInfoForm, StepDescriptor, StepQuery, SubmitResponse, ThankYouQuery,
        ThankYouView,
    },
};

use super::multipart::MultipartForm;

pub const ADDRESS_PAGE: &str = "/quote/address";
pub const UPLOAD_PAGE: &str = "/quote/upload";
pub const PERSONAL_PAGE: &str = "/quote/personal";

const SUBMIT_FAILED: &str = "Failed to process your request";

/// Step 1: confirm the geocoded address and carry it forward in the query string.
/// An unreadable body is treated like an incomplete one.
pub async fn submit_address(form: Result<Form<AddressForm>, FormRejection>) -> Redirect {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::info!(error = %rejection, "Address form rejected");
            AddressForm::default()
        }
    };

    match form.into_query().validate() {
        Ok(data) => Redirect::to(&format!("{UPLOAD_PAGE}?{}", data.to_query_string())),
        Err(e) => {
            tracing::info!(error = %e, "Address step incomplete");
            Redirect::to(ADDRESS_PAGE)
        }
    }
}

pub async fn upload_page(Query(query): Query<StepQuery>) -> Response {
    step_page(2, &query)
}

pub async fn personal_page(Query(query): Query<StepQuery>) -> Response {
    step_page(3, &query)
}

fn step_page(step: u8, query: &StepQuery) -> Response {
    match query.validate() {
        Ok(data) => Json(StepDescriptor::new(step, &data)).into_response(),
        Err(_) => Redirect::to(ADDRESS_PAGE).into_response(),
    }
}

/// Step 2: accept supporting documents. They are never stored or parsed.
pub async fn submit_upload(
    State(state): State<AppState>,
    Query(query): Query<StepQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(step_data) = query.validate() else {
        return Redirect::to(ADDRESS_PAGE).into_response();
    };

    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return rejected(rejection.into(), SUBMIT_FAILED),
    };

    let form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return rejected(e, SUBMIT_FAILED),
    };

    state
        .quote_service
        .record_uploads(&step_data, &form.documents);

    Redirect::to(&format!("{PERSONAL_PAGE}?{}", step_data.to_query_string())).into_response()
}

/// Step 3: collect contact details and run the quote pipeline.
pub async fn submit_personal_info(
    State(state): State<AppState>,
    Query(query): Query<StepQuery>,
    form: Result<Form<PersonalInfoForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected(rejection.into(), SUBMIT_FAILED),
    };

    match state.quote_service.submit(&query, &form).await {
        Ok(quote_id) => Json(SubmitResponse::accepted(quote_id)).into_response(),
        Err(e) => rejected(e, SUBMIT_FAILED),
    }
}

pub async fn thank_you_page(Query(query): Query<ThankYouQuery>) -> Json<ThankYouView> {
    Json(ThankYouView::from(query))
}

pub(crate) fn rejected(error: AppError, fallback: &str) -> Response {
    let status: StatusCode = error.status_code();
    let message = error.public_message(fallback);

    (status, Json(SubmitResponse::rejected(message))).into_response()
}
