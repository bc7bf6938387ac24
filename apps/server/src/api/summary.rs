use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const SUMARIO_ERROR: &str = "Não foi possível buscar os dados de dividendos.";

/// The fixed module set the sumário endpoint always requests.
const SUMMARY_MODULES: [&str; 5] = [
    "summaryDetail",
    "summaryProfile",
    "financialData",
    "incomeStatementHistory",
    "cashflowStatementHistory",
];

async fn get_sumario(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Value>> {
    let summary = state
        .market_data
        .quote_summary(&ticker, &SUMMARY_MODULES)
        .await
        .map_err(|e| {
            tracing::error!("Erro ao buscar sumário de {}: {}", ticker, e);
            ApiError::upstream(SUMARIO_ERROR)
        })?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sumario/{ticker}", get(get_sumario))
}
