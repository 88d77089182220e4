use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    analysis::REFERENCE_CONSUMPTION_KWH,
    error::{AppError, AppResult},
    models::{
        QuoteId, QuoteRequest, QuotesQuery, QuotesResponse, ResultsQuery, ResultsView,
        SolarAnalysisResult,
    },
};

pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> AppResult<Json<QuotesResponse>> {
    let quotes = state
        .quote_service
        .list_quotes(query.user_id.as_deref())
        .await?;

    Ok(Json(QuotesResponse { quotes }))
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<QuoteRequest>> {
    let quote = state.quote_service.get_quote(&QuoteId::from(id)).await?;

    Ok(Json(quote))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SolarAnalysisResult>> {
    let analysis = state.quote_service.get_analysis(&QuoteId::from(id)).await?;

    Ok(Json(analysis))
}

pub async fn results_page(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> AppResult<Json<ResultsView>> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation("id is required".to_string()))?;

    let analysis = state.quote_service.get_analysis(&QuoteId::from(id)).await?;

    Ok(Json(ResultsView::new(analysis, REFERENCE_CONSUMPTION_KWH)))
}
